//! Walk over a document body: top-level paragraphs first, then the
//! paragraphs of every top-level table cell.

use crate::paragraph::{paragraph_text, set_paragraph_text};
use doctrans_core::{UnitLocation, UnitVisitor, WalkOutcome};
use doctrans_ooxml::XmlElement;

/// Visit every text unit of a `w:body`, rewriting replaced paragraphs.
///
/// Tables nested inside cells are not entered.
pub fn walk_body<V: UnitVisitor + ?Sized>(body: &mut XmlElement, visitor: &mut V) -> WalkOutcome {
    let mut outcome = WalkOutcome::default();

    for (index, p) in body.children_named_mut("p").enumerate() {
        if outcome.stopped {
            return outcome;
        }
        visit_paragraph(p, &UnitLocation::Paragraph { index }, visitor, &mut outcome);
    }

    for (table, tbl) in body.children_named_mut("tbl").enumerate() {
        for (row, tr) in tbl.children_named_mut("tr").enumerate() {
            for (col, tc) in tr.children_named_mut("tc").enumerate() {
                for (paragraph, p) in tc.children_named_mut("p").enumerate() {
                    if outcome.stopped {
                        return outcome;
                    }
                    let location = UnitLocation::TableCell {
                        table,
                        row,
                        col,
                        paragraph,
                    };
                    visit_paragraph(p, &location, visitor, &mut outcome);
                }
            }
        }
    }

    outcome
}

fn visit_paragraph<V: UnitVisitor + ?Sized>(
    p: &mut XmlElement,
    location: &UnitLocation,
    visitor: &mut V,
    outcome: &mut WalkOutcome,
) {
    let original = paragraph_text(p);
    if let Some(replacement) = outcome.record(visitor.visit(location, &original)) {
        set_paragraph_text(p, &replacement);
    }
}
