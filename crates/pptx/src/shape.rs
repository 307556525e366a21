//! Structural classification of slide shapes.

use doctrans_ooxml::XmlElement;

/// Elements of a shape tree that are shapes, as opposed to the tree's own
/// properties (`nvGrpSpPr`, `grpSpPr`, `extLst`).
const SHAPE_ELEMENTS: &[&str] = &[
    "sp",
    "grpSp",
    "graphicFrame",
    "pic",
    "cxnSp",
    "contentPart",
    "AlternateContent",
];

/// What a shape is, as far as text is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// A graphic frame holding an `a:tbl`.
    Table,
    /// A group whose children are shapes.
    Group,
    /// Any shape with its own text body.
    TextBearing,
    /// Pictures, charts, connectors and anything unrecognized.
    Other,
}

/// True if the element counts as a shape within its shape tree.
pub fn is_shape_element(el: &XmlElement) -> bool {
    SHAPE_ELEMENTS.contains(&el.local_name())
}

/// Classify a shape by its declared element type and by probing for a
/// text body. Text content plays no part.
pub fn classify(shape: &XmlElement) -> ShapeKind {
    match shape.local_name() {
        "grpSp" => ShapeKind::Group,
        "graphicFrame" => {
            if table_element(shape).is_some() {
                ShapeKind::Table
            } else {
                ShapeKind::Other
            }
        }
        _ if shape.child("txBody").is_some() => ShapeKind::TextBearing,
        _ => ShapeKind::Other,
    }
}

/// The `a:tbl` inside a graphic frame.
pub fn table_element(frame: &XmlElement) -> Option<&XmlElement> {
    frame.find(&["graphic", "graphicData", "tbl"])
}

pub fn table_element_mut(frame: &mut XmlElement) -> Option<&mut XmlElement> {
    frame.find_mut(&["graphic", "graphicData", "tbl"])
}
