//! Core types, segment translation policy, and configuration for
//! translating text inside structured documents.

pub mod cancel;
pub mod config;
pub mod error;
pub mod prompt;
pub mod report;
pub mod skip;
pub mod tokens;
pub mod translate;
pub mod types;
pub mod visit;

pub use cancel::{CancelMode, CancellationToken};
pub use config::TranslatorConfig;
pub use error::{Error, Result};
pub use report::{SegmentRecord, SegmentStatus, TranslationReport};
pub use skip::SkipRule;
pub use tokens::count_tokens;
pub use translate::{
    translate_unit, FailurePolicy, SegmentOptions, SegmentTranslator, TextTranslator, UnitOutput,
};
pub use types::{DocumentFormat, UnitLocation};
pub use visit::{Segment, SegmentCollector, UnitCounter, UnitVisitor, Visit, WalkOutcome};
