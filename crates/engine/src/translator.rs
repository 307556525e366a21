//! Translate a whole document: dispatch on the format tag, walk, write back,
//! serialize.

use crate::document::{Document, WalkOptions};
use doctrans_core::translate::ProgressFn;
use doctrans_core::{
    CancelMode, CancellationToken, DocumentFormat, Error, FailurePolicy, Result, Segment,
    SegmentCollector, SegmentOptions, SegmentTranslator, SkipRule, TextTranslator,
    TranslationReport, UnitCounter,
};
use doctrans_pptx::TextStyle;

/// Settings for one translate call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslateOptions {
    /// Also translate presentation speaker notes.
    pub include_notes: bool,
    /// Font size in points for rewritten presentation text.
    pub font_size: Option<f32>,
    /// Shrink rewritten presentation text to fit its shape.
    pub autofit: bool,
    pub skip_rule: SkipRule,
    pub failure_policy: FailurePolicy,
    pub cancel_mode: CancelMode,
}

impl TranslateOptions {
    fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            include_notes: self.include_notes,
            style: TextStyle {
                font_size: self.font_size,
                autofit: self.autofit,
            },
        }
    }
}

/// Serialized document plus what happened to each unit.
#[derive(Debug, Clone)]
pub struct TranslationOutput {
    pub bytes: Vec<u8>,
    pub report: TranslationReport,
}

/// Translates documents with one translation function.
pub struct DocumentTranslator<T: TextTranslator> {
    translator: T,
    options: TranslateOptions,
    cancel: Option<CancellationToken>,
}

impl<T: TextTranslator> DocumentTranslator<T> {
    pub fn new(translator: T, options: TranslateOptions) -> Self {
        Self {
            translator,
            options,
            cancel: None,
        }
    }

    /// Check `token` between units of every following call.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn translator_mut(&mut self) -> &mut T {
        &mut self.translator
    }

    /// Translate `bytes` of the tagged format into `target_language`.
    ///
    /// Unknown tags fail before the bytes are read.
    pub fn translate_document(
        &mut self,
        bytes: &[u8],
        format_tag: &str,
        target_language: &str,
    ) -> Result<Vec<u8>> {
        Ok(self
            .translate_document_with_report(bytes, format_tag, target_language)?
            .bytes)
    }

    pub fn translate_document_with_report(
        &mut self,
        bytes: &[u8],
        format_tag: &str,
        target_language: &str,
    ) -> Result<TranslationOutput> {
        self.translate_with_progress(
            bytes,
            format_tag,
            target_language,
            Box::new(|_: usize, _: usize| {}),
        )
    }

    /// Like [`translate_document_with_report`](Self::translate_document_with_report),
    /// calling `progress(done, total)` after each translated or failed unit.
    pub fn translate_with_progress(
        &mut self,
        bytes: &[u8],
        format_tag: &str,
        target_language: &str,
        progress: ProgressFn<'_>,
    ) -> Result<TranslationOutput> {
        let format = DocumentFormat::from_tag(format_tag)?;
        let target_language = target_language.trim();
        if target_language.is_empty() {
            return Err(Error::InvalidInput("target language is empty".to_string()));
        }

        let mut document = Document::open(format, bytes)?;
        let walk_options = self.options.walk_options();

        let mut counter = UnitCounter::new(self.options.skip_rule);
        document.walk(&mut counter, &walk_options);
        log::info!(
            "{}: {} text units, {} to translate into {}",
            format,
            counter.total,
            counter.translatable,
            target_language
        );

        let segment_options = SegmentOptions {
            skip_rule: self.options.skip_rule,
            failure_policy: self.options.failure_policy.clone(),
        };
        let mut visitor =
            SegmentTranslator::new(&mut self.translator, target_language, segment_options)
                .with_progress(counter.translatable, progress);
        if let Some(token) = &self.cancel {
            visitor = visitor.with_cancellation(token.clone());
        }

        let outcome = document.walk(&mut visitor, &walk_options);
        let mut report = visitor.into_report();
        report.format = Some(format);

        log::info!(
            "{}: {} translated, {} skipped, {} failed, {} rewritten, tokens={}",
            format,
            report.translated_count(),
            report.skipped_count(),
            report.failed_count(),
            outcome.replaced,
            report.tokens
        );

        if report.cancelled && self.options.cancel_mode == CancelMode::Discard {
            return Err(Error::Cancelled(report.translated_count()));
        }

        let bytes = document.to_bytes()?;
        Ok(TranslationOutput { bytes, report })
    }
}

/// List every non-empty unit without translating anything.
pub fn extract_segments(
    bytes: &[u8],
    format_tag: &str,
    include_notes: bool,
) -> Result<Vec<Segment>> {
    let format = DocumentFormat::from_tag(format_tag)?;
    let mut document = Document::open(format, bytes)?;
    let mut collector = SegmentCollector::default();
    document.walk(
        &mut collector,
        &WalkOptions {
            include_notes,
            ..Default::default()
        },
    );
    Ok(collector.segments)
}

/// Container topology of a document, one entry per slide or body section.
pub fn document_outline(bytes: &[u8], format_tag: &str) -> Result<Vec<String>> {
    let format = DocumentFormat::from_tag(format_tag)?;
    Ok(Document::open(format, bytes)?.outline())
}
