//! DOCX package model: the main document part held as an owned XML tree.

use crate::paragraph::paragraph_text;
use crate::walker::walk_body;
use doctrans_core::{Error, Result, UnitVisitor, WalkOutcome};
use doctrans_ooxml::rels::resolve_target;
use doctrans_ooxml::{Package, XmlDocument, XmlElement};

/// Main part used when the package relationships do not name one.
const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// An opened word-processing document.
#[derive(Debug)]
pub struct DocxDocument {
    package: Package,
    path: String,
    doc: XmlDocument,
    dirty: bool,
}

impl DocxDocument {
    /// Parse a document from package bytes.
    pub fn open(bytes: &[u8]) -> Result<Self> {
        Self::from_package(Package::open(bytes)?)
    }

    pub fn from_package(package: Package) -> Result<Self> {
        let path = package
            .relationships("")?
            .into_iter()
            .find(|rel| rel.is_type("officeDocument"))
            .map(|rel| resolve_target("", &rel.target))
            .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string());

        let doc = package.read_xml(&path)?;
        let has_body = doc
            .root()
            .filter(|root| root.is("document"))
            .is_some_and(|root| root.child("body").is_some());
        if !has_body {
            return Err(Error::CorruptedFile(format!(
                "'{}' is not a document part with a body",
                path
            )));
        }
        log::debug!("Opened document part '{}'", path);

        Ok(Self {
            package,
            path,
            doc,
            dirty: false,
        })
    }

    /// Name of the main document part.
    pub fn main_part(&self) -> &str {
        &self.path
    }

    fn body(&self) -> Option<&XmlElement> {
        self.doc.root()?.child("body")
    }

    /// Visit every text unit, rewriting replaced paragraphs in place.
    pub fn walk<V: UnitVisitor + ?Sized>(&mut self, visitor: &mut V) -> WalkOutcome {
        let Some(body) = self.doc.root_mut().and_then(|root| root.child_mut("body")) else {
            return WalkOutcome::default();
        };
        let outcome = walk_body(body, visitor);
        self.dirty |= outcome.replaced > 0;
        outcome
    }

    /// Body structure: top-level paragraph count, then each top-level table
    /// as rows of per-cell paragraph counts, e.g. `table(1,2;1,1)`.
    pub fn outline(&self) -> Vec<String> {
        let Some(body) = self.body() else {
            return Vec::new();
        };

        let mut outline = vec![format!("paragraphs({})", body.children_named("p").count())];
        for tbl in body.children_named("tbl") {
            let rows: Vec<String> = tbl
                .children_named("tr")
                .map(|tr| {
                    tr.children_named("tc")
                        .map(|tc| tc.children_named("p").count().to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                })
                .collect();
            outline.push(format!("table({})", rows.join(";")));
        }
        outline
    }

    /// Text of every top-level paragraph, in order.
    pub fn paragraph_texts(&self) -> Vec<String> {
        self.body()
            .map(|body| body.children_named("p").map(paragraph_text).collect())
            .unwrap_or_default()
    }

    /// Serialize; the package is untouched when nothing was rewritten.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        if self.dirty {
            self.package.write_xml(&self.path, &self.doc)?;
            self.dirty = false;
        }
        self.package.to_bytes()
    }
}
