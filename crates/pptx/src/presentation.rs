//! PPTX package model: ordered slides (and their notes pages) held as owned
//! XML trees for one translate-and-serialize pass.

use crate::shape::{self, ShapeKind};
use crate::text::TextStyle;
use crate::walker::{walk_shape_tree, Page};
use doctrans_core::{Error, Result, UnitVisitor, WalkOutcome};
use doctrans_ooxml::rels::resolve_target;
use doctrans_ooxml::{Package, XmlDocument, XmlElement};
use std::collections::HashMap;

/// Main part used when the package relationships do not name one.
const DEFAULT_MAIN_PART: &str = "ppt/presentation.xml";

/// Options for walking a presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PptxOptions {
    /// Also walk each slide's speaker-notes page.
    pub include_notes: bool,
    /// Formatting applied to rewritten text bodies.
    pub style: TextStyle,
}

/// A slide-like part (slide or notes page) and its parsed tree.
#[derive(Debug)]
struct PagePart {
    path: String,
    /// `None` when the part could not be parsed; it is then left untouched.
    doc: Option<XmlDocument>,
    dirty: bool,
}

impl PagePart {
    fn load(package: &Package, path: String) -> Self {
        let doc = match package.read_xml(&path) {
            Ok(doc) => Some(doc),
            Err(e) => {
                log::warn!("Skipping unreadable part '{}': {}", path, e);
                None
            }
        };
        Self {
            path,
            doc,
            dirty: false,
        }
    }

    fn shape_tree(&self) -> Option<&XmlElement> {
        self.doc.as_ref()?.root()?.find(&["cSld", "spTree"])
    }

    fn walk<V: UnitVisitor + ?Sized>(
        &mut self,
        page: Page,
        style: &TextStyle,
        visitor: &mut V,
    ) -> WalkOutcome {
        let Some(tree) = self
            .doc
            .as_mut()
            .and_then(|doc| doc.root_mut())
            .and_then(|root| root.find_mut(&["cSld", "spTree"]))
        else {
            log::warn!("No shape tree in '{}', skipped", self.path);
            return WalkOutcome::default();
        };

        let outcome = walk_shape_tree(tree, page, style, visitor);
        self.dirty |= outcome.replaced > 0;
        outcome
    }
}

#[derive(Debug)]
struct Slide {
    page: PagePart,
    notes: Option<PagePart>,
}

/// An opened presentation.
#[derive(Debug)]
pub struct PptxDocument {
    package: Package,
    slides: Vec<Slide>,
}

impl PptxDocument {
    /// Parse a presentation from package bytes.
    pub fn open(bytes: &[u8]) -> Result<Self> {
        Self::from_package(Package::open(bytes)?)
    }

    /// Build the slide model over an already opened package.
    pub fn from_package(package: Package) -> Result<Self> {
        let main_part = main_part(&package)?;
        let slide_paths = slide_order(&package, &main_part)?;
        log::debug!("Presentation has {} slides", slide_paths.len());

        let mut slides = Vec::with_capacity(slide_paths.len());
        for path in slide_paths {
            let notes = notes_part(&package, &path).map(|p| PagePart::load(&package, p));
            slides.push(Slide {
                page: PagePart::load(&package, path),
                notes,
            });
        }

        Ok(Self { package, slides })
    }

    /// Part names of the slides, in presentation order.
    pub fn slide_paths(&self) -> Vec<&str> {
        self.slides.iter().map(|s| s.page.path.as_str()).collect()
    }

    /// Visit every text unit of every slide, in order, rewriting in place.
    pub fn walk<V: UnitVisitor + ?Sized>(
        &mut self,
        visitor: &mut V,
        options: &PptxOptions,
    ) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();

        for (index, slide) in self.slides.iter_mut().enumerate() {
            outcome.merge(slide.page.walk(
                Page {
                    slide: index,
                    notes: false,
                },
                &options.style,
                visitor,
            ));
            if outcome.stopped {
                break;
            }

            if options.include_notes {
                if let Some(notes) = slide.notes.as_mut() {
                    outcome.merge(notes.walk(
                        Page {
                            slide: index,
                            notes: true,
                        },
                        &options.style,
                        visitor,
                    ));
                    if outcome.stopped {
                        break;
                    }
                }
            }
        }

        outcome
    }

    /// Shape structure per slide, e.g. `text, table(2x3), group[text], other`.
    ///
    /// Two documents with equal outlines have the same slide, shape, group,
    /// table, row and cell topology.
    pub fn outline(&self) -> Vec<String> {
        self.slides
            .iter()
            .map(|slide| match slide.page.shape_tree() {
                Some(tree) => outline_shapes(tree),
                None => "unreadable".to_string(),
            })
            .collect()
    }

    /// Serialize, re-encoding only the parts that were rewritten.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        for slide in &mut self.slides {
            for part in std::iter::once(&mut slide.page).chain(slide.notes.as_mut()) {
                if !part.dirty {
                    continue;
                }
                if let Some(doc) = &part.doc {
                    self.package.write_xml(&part.path, doc)?;
                    part.dirty = false;
                }
            }
        }
        self.package.to_bytes()
    }
}

/// Locate the presentation part and check that it is one.
fn main_part(package: &Package) -> Result<String> {
    let path = package
        .relationships("")?
        .into_iter()
        .find(|rel| rel.is_type("officeDocument"))
        .map(|rel| resolve_target("", &rel.target))
        .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string());

    if !package.contains(&path) {
        return Err(Error::MissingPart(path));
    }
    Ok(path)
}

/// Get the ordered list of slide paths.
///
/// The order comes from `p:sldIdLst` in the presentation part; if that list
/// is absent, slides are sorted by the number in their relationship id or
/// part name.
fn slide_order(package: &Package, main_part: &str) -> Result<Vec<String>> {
    let doc = package.read_xml(main_part)?;
    let root = doc
        .root()
        .filter(|root| root.is("presentation"))
        .ok_or_else(|| {
            Error::CorruptedFile(format!("'{}' is not a presentation part", main_part))
        })?;

    let mut slides: Vec<(String, String)> = package
        .relationships(main_part)?
        .into_iter()
        .filter(|rel| rel.is_type("slide") && !rel.external)
        .map(|rel| (rel.id, resolve_target(main_part, &rel.target)))
        .collect();

    let listed: Vec<String> = root
        .find(&["sldIdLst"])
        .map(|list| {
            list.children_named("sldId")
                .filter_map(relationship_id)
                .collect()
        })
        .unwrap_or_default();

    if !listed.is_empty() {
        let by_id: HashMap<String, String> = slides.into_iter().collect();
        return Ok(listed
            .iter()
            .filter_map(|id| {
                let path = by_id.get(id);
                if path.is_none() {
                    log::warn!("Slide id {} has no relationship, skipped", id);
                }
                path.cloned()
            })
            .collect());
    }

    slides.sort_by(|a, b| {
        let na = extract_slide_number(&a.0).or_else(|| extract_slide_number(&a.1));
        let nb = extract_slide_number(&b.0).or_else(|| extract_slide_number(&b.1));
        match (na, nb) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.1.cmp(&b.1),
        }
    });
    Ok(slides.into_iter().map(|(_, path)| path).collect())
}

/// The `r:id` of a `p:sldId` (not its numeric `id`).
fn relationship_id(sld_id: &XmlElement) -> Option<String> {
    sld_id
        .attributes
        .iter()
        .find(|(key, _)| key.ends_with(":id"))
        .and_then(|(key, _)| sld_id.attr(key))
}

/// The notes page linked from a slide, if any.
fn notes_part(package: &Package, slide_path: &str) -> Option<String> {
    let rels = match package.relationships(slide_path) {
        Ok(rels) => rels,
        Err(e) => {
            log::warn!("Unreadable relationships for '{}': {}", slide_path, e);
            return None;
        }
    };
    rels.into_iter()
        .find(|rel| rel.is_type("notesSlide") && !rel.external)
        .map(|rel| resolve_target(slide_path, &rel.target))
        .filter(|path| package.contains(path))
}

fn outline_shapes(container: &XmlElement) -> String {
    container
        .elements()
        .filter(|el| shape::is_shape_element(el))
        .map(|el| match shape::classify(el) {
            ShapeKind::Table => {
                let table = shape::table_element(el);
                let rows: Vec<usize> = table
                    .map(|t| t.children_named("tr").map(|r| r.children_named("tc").count()).collect())
                    .unwrap_or_default();
                let cols = rows.first().copied().unwrap_or(0);
                format!("table({}x{})", rows.len(), cols)
            }
            ShapeKind::Group => format!("group[{}]", outline_shapes(el)),
            ShapeKind::TextBearing => {
                let paragraphs = el
                    .child("txBody")
                    .map(|tx| tx.children_named("p").count())
                    .unwrap_or(0);
                format!("text({})", paragraphs)
            }
            ShapeKind::Other => "other".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    // Remove common extensions first
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    // Try to find digits at the end
    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
