//! Per-document record of what happened to each text unit.

use crate::DocumentFormat;
use serde::Serialize;

/// Outcome for a single text unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentStatus {
    Translated,
    Skipped,
    Failed,
}

/// One visited, non-empty text unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentRecord {
    pub location: String,
    pub original: String,
    /// Text written back, if the unit was rewritten.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub status: SegmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything a translate pass did to one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TranslationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<DocumentFormat>,
    pub target_language: String,
    pub segments: Vec<SegmentRecord>,
    /// Units with no text at all; these are never recorded individually.
    pub empty_units: usize,
    /// Model tokens in the translated text.
    pub tokens: usize,
    pub cancelled: bool,
}

impl TranslationReport {
    /// Create an empty report for a target language.
    pub fn new(target_language: impl Into<String>) -> Self {
        Self {
            target_language: target_language.into(),
            ..Default::default()
        }
    }

    fn count(&self, status: SegmentStatus) -> usize {
        self.segments.iter().filter(|s| s.status == status).count()
    }

    pub fn translated_count(&self) -> usize {
        self.count(SegmentStatus::Translated)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(SegmentStatus::Skipped)
    }

    pub fn failed_count(&self) -> usize {
        self.count(SegmentStatus::Failed)
    }
}
