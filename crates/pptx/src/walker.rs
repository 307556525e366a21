//! Depth-first walk over a slide's shape tree.

use crate::shape::{self, ShapeKind};
use crate::text::{self, TextStyle};
use doctrans_core::{UnitLocation, UnitVisitor, WalkOutcome};
use doctrans_ooxml::XmlElement;

/// Identifies the page whose shape tree is being walked.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub slide: usize,
    pub notes: bool,
}

/// Visit every text unit under `container` (a `p:spTree` or `p:grpSp`).
///
/// Shapes are visited in document order; tables row-major; groups are
/// entered recursively to any depth. Shapes without text are skipped.
pub fn walk_shape_tree<V: UnitVisitor + ?Sized>(
    container: &mut XmlElement,
    page: Page,
    style: &TextStyle,
    visitor: &mut V,
) -> WalkOutcome {
    let mut outcome = WalkOutcome::default();
    let mut path = Vec::new();
    walk_shapes(container, page, &mut path, style, visitor, &mut outcome);
    outcome
}

fn walk_shapes<V: UnitVisitor + ?Sized>(
    container: &mut XmlElement,
    page: Page,
    path: &mut Vec<usize>,
    style: &TextStyle,
    visitor: &mut V,
    outcome: &mut WalkOutcome,
) {
    let shapes = container
        .elements_mut()
        .filter(|el| shape::is_shape_element(el));

    for (index, el) in shapes.enumerate() {
        if outcome.stopped {
            return;
        }
        path.push(index);

        match shape::classify(el) {
            ShapeKind::Table => walk_table(el, page, path, style, visitor, outcome),
            ShapeKind::Group => walk_shapes(el, page, path, style, visitor, outcome),
            ShapeKind::TextBearing => {
                if let Some(tx_body) = el.child_mut("txBody") {
                    let location = location(page, path, None);
                    visit_text_body(tx_body, &location, style, visitor, outcome);
                }
            }
            ShapeKind::Other => {
                log::trace!("Skipping <{}> at {:?}", el.name, path);
            }
        }

        path.pop();
    }
}

fn walk_table<V: UnitVisitor + ?Sized>(
    frame: &mut XmlElement,
    page: Page,
    path: &[usize],
    style: &TextStyle,
    visitor: &mut V,
    outcome: &mut WalkOutcome,
) {
    let Some(table) = shape::table_element_mut(frame) else {
        return;
    };

    for (row_index, row) in table.children_named_mut("tr").enumerate() {
        for (col_index, cell) in row.children_named_mut("tc").enumerate() {
            if outcome.stopped {
                return;
            }
            if let Some(tx_body) = cell.child_mut("txBody") {
                let location = location(page, path, Some((row_index, col_index)));
                visit_text_body(tx_body, &location, style, visitor, outcome);
            }
        }
    }
}

fn visit_text_body<V: UnitVisitor + ?Sized>(
    tx_body: &mut XmlElement,
    location: &UnitLocation,
    style: &TextStyle,
    visitor: &mut V,
    outcome: &mut WalkOutcome,
) {
    let original = text::frame_text(tx_body);
    if let Some(replacement) = outcome.record(visitor.visit(location, &original)) {
        text::set_frame_text(tx_body, &replacement, style);
    }
}

fn location(page: Page, path: &[usize], cell: Option<(usize, usize)>) -> UnitLocation {
    UnitLocation::Slide {
        slide: page.slide,
        notes: page.notes,
        shape: path.to_vec(),
        cell,
    }
}
