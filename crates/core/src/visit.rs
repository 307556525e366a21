//! The contract between a format walker and whatever consumes its text units.

use crate::skip::SkipRule;
use crate::UnitLocation;
use serde::Serialize;

/// What the walker should do with the unit it just offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    /// Leave the unit untouched.
    Keep,
    /// Replace the unit's text with this value.
    Replace(String),
    /// Leave the unit untouched and stop walking.
    Stop,
}

/// Receives every text unit a walker discovers, in document order.
pub trait UnitVisitor {
    /// Inspect one unit and decide whether it is rewritten.
    fn visit(&mut self, location: &UnitLocation, text: &str) -> Visit;
}

impl<F> UnitVisitor for F
where
    F: FnMut(&UnitLocation, &str) -> Visit,
{
    fn visit(&mut self, location: &UnitLocation, text: &str) -> Visit {
        self(location, text)
    }
}

/// Summary of one walking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOutcome {
    /// Units offered to the visitor.
    pub visited: usize,
    /// Units whose text was replaced.
    pub replaced: usize,
    /// True if the visitor asked the walk to stop early.
    pub stopped: bool,
}

impl WalkOutcome {
    /// Apply a visitor decision to the running totals.
    ///
    /// Returns the replacement text, if any, so walkers can write it back.
    pub fn record(&mut self, visit: Visit) -> Option<String> {
        self.visited += 1;
        match visit {
            Visit::Keep => None,
            Visit::Replace(text) => {
                self.replaced += 1;
                Some(text)
            }
            Visit::Stop => {
                self.stopped = true;
                None
            }
        }
    }

    /// Fold the outcome of a sub-walk (e.g. a notes page) into this one.
    pub fn merge(&mut self, other: WalkOutcome) {
        self.visited += other.visited;
        self.replaced += other.replaced;
        self.stopped |= other.stopped;
    }
}

/// Counts the units a translation pass would send to the model.
#[derive(Debug, Clone, Default)]
pub struct UnitCounter {
    rule: SkipRule,
    /// Units that pass the skip rule.
    pub translatable: usize,
    /// All units offered by the walker.
    pub total: usize,
}

impl UnitCounter {
    /// Create a counter that applies the given skip rule.
    pub fn new(rule: SkipRule) -> Self {
        Self {
            rule,
            translatable: 0,
            total: 0,
        }
    }
}

impl UnitVisitor for UnitCounter {
    fn visit(&mut self, _location: &UnitLocation, text: &str) -> Visit {
        self.total += 1;
        if !self.rule.should_skip(text) {
            self.translatable += 1;
        }
        Visit::Keep
    }
}

/// A text unit captured without translating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub location: String,
    pub text: String,
}

/// Collects every non-empty unit, for dry runs and inspection.
#[derive(Debug, Clone, Default)]
pub struct SegmentCollector {
    pub segments: Vec<Segment>,
}

impl UnitVisitor for SegmentCollector {
    fn visit(&mut self, location: &UnitLocation, text: &str) -> Visit {
        if !text.trim().is_empty() {
            self.segments.push(Segment {
                location: location.to_string(),
                text: text.to_string(),
            });
        }
        Visit::Keep
    }
}
