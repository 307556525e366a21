//! Package relationships (`_rels/*.rels`) and part-name resolution.

use crate::xml::XmlDocument;

/// One `<Relationship>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    /// True for `TargetMode="External"` (hyperlinks and the like).
    pub external: bool,
}

impl Relationship {
    /// True if the relationship type URI ends with this short type name,
    /// e.g. `slide` or `notesSlide`.
    pub fn is_type(&self, short: &str) -> bool {
        self.rel_type.rsplit('/').next() == Some(short)
    }
}

/// Relationships part for a source part:
/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`.
pub fn rels_path_for(source_part: &str) -> String {
    let source = source_part.trim_start_matches('/');
    match source.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", source),
    }
}

/// Resolve a relationship target against the part that declares it.
///
/// Absolute targets start at the package root; relative ones are resolved
/// from the source part's directory, honouring `..` segments.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let source = source_part.trim_start_matches('/');
    let mut segments: Vec<&str> = match source.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// Read every `<Relationship>` element of a relationships part.
pub fn parse_relationships(doc: &XmlDocument) -> Vec<Relationship> {
    let Some(root) = doc.root() else {
        return Vec::new();
    };

    root.children_named("Relationship")
        .map(|el| Relationship {
            id: el.attr("Id").unwrap_or_default(),
            rel_type: el.attr("Type").unwrap_or_default(),
            target: el.attr("Target").unwrap_or_default(),
            external: el
                .attr("TargetMode")
                .is_some_and(|mode| mode.eq_ignore_ascii_case("External")),
        })
        .collect()
}
