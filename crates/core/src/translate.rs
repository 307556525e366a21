//! Text-unit translation with the fail-open write-back policy.

use crate::cancel::CancellationToken;
use crate::report::{SegmentRecord, SegmentStatus, TranslationReport};
use crate::skip::SkipRule;
use crate::tokens::count_tokens;
use crate::visit::{UnitVisitor, Visit};
use crate::{Error, Result, UnitLocation};

/// The black-box translation function: text plus target language in,
/// translated text out. May fail.
pub trait TextTranslator {
    fn translate(&mut self, text: &str, target_language: &str) -> Result<String>;
}

impl<F> TextTranslator for F
where
    F: FnMut(&str, &str) -> Result<String>,
{
    fn translate(&mut self, text: &str, target_language: &str) -> Result<String> {
        self(text, target_language)
    }
}

/// Text produced for one unit, plus the error if the call failed and the
/// original text was kept.
#[derive(Debug)]
pub struct UnitOutput {
    pub text: String,
    pub error: Option<Error>,
}

/// Translate one unit, falling back to the original text on any failure.
///
/// A blank answer counts as a failure. Callers skip empty units before
/// calling this.
pub fn translate_unit<T: TextTranslator + ?Sized>(
    translator: &mut T,
    raw_text: &str,
    target_language: &str,
) -> UnitOutput {
    let error = match translator.translate(raw_text, target_language) {
        Ok(text) if !text.trim().is_empty() => return UnitOutput { text, error: None },
        Ok(_) => Error::Translation("empty response".to_string()),
        Err(e) => e,
    };
    log::warn!("Translation failed, keeping original text: {}", error);
    UnitOutput {
        text: raw_text.to_string(),
        error: Some(error),
    }
}

/// What a failed unit looks like in the output document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Leave the unit exactly as it was.
    #[default]
    KeepOriginal,
    /// Prefix the original text with a visible marker.
    Mark(String),
}

/// Options for a segment translation pass.
#[derive(Debug, Clone, Default)]
pub struct SegmentOptions {
    pub skip_rule: SkipRule,
    pub failure_policy: FailurePolicy,
}

/// Progress notification: units finished so far and the expected total.
pub type ProgressFn<'a> = Box<dyn FnMut(usize, usize) + 'a>;

/// Visitor that sends each discovered unit through the translation function.
///
/// Holds the report for the document being walked. One instance serves one
/// walking pass over one document.
pub struct SegmentTranslator<'a, T: TextTranslator + ?Sized> {
    translator: &'a mut T,
    target_language: String,
    options: SegmentOptions,
    cancel: Option<CancellationToken>,
    progress: Option<ProgressFn<'a>>,
    total: usize,
    done: usize,
    report: TranslationReport,
}

impl<'a, T: TextTranslator + ?Sized> SegmentTranslator<'a, T> {
    pub fn new(translator: &'a mut T, target_language: &str, options: SegmentOptions) -> Self {
        Self {
            translator,
            target_language: target_language.to_string(),
            options,
            cancel: None,
            progress: None,
            total: 0,
            done: 0,
            report: TranslationReport::new(target_language),
        }
    }

    /// Check this token before every unit.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Report progress against an expected number of translatable units.
    pub fn with_progress(mut self, total: usize, progress: ProgressFn<'a>) -> Self {
        self.total = total;
        self.progress = Some(progress);
        self
    }

    pub fn report(&self) -> &TranslationReport {
        &self.report
    }

    pub fn into_report(self) -> TranslationReport {
        self.report
    }

    fn tick(&mut self) {
        self.done += 1;
        if let Some(progress) = self.progress.as_mut() {
            progress(self.done, self.total);
        }
    }
}

impl<T: TextTranslator + ?Sized> UnitVisitor for SegmentTranslator<'_, T> {
    fn visit(&mut self, location: &UnitLocation, text: &str) -> Visit {
        if self.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
            if !self.report.cancelled {
                log::info!("Walk cancelled before {}", location);
            }
            self.report.cancelled = true;
            return Visit::Stop;
        }

        if text.trim().is_empty() {
            self.report.empty_units += 1;
            return Visit::Keep;
        }

        if self.options.skip_rule.should_skip(text) {
            log::debug!("Skipping {}: nothing to translate", location);
            self.report.segments.push(SegmentRecord {
                location: location.to_string(),
                original: text.to_string(),
                output: None,
                status: SegmentStatus::Skipped,
                error: None,
            });
            return Visit::Keep;
        }

        let output = translate_unit(&mut *self.translator, text, &self.target_language);
        let visit = match output.error {
            None => {
                let translated = output.text;
                log::debug!(
                    "Translated {} len={} -> len={}",
                    location,
                    text.len(),
                    translated.len()
                );
                self.report.tokens += count_tokens(&translated);
                let visit = if translated == text {
                    Visit::Keep
                } else {
                    Visit::Replace(translated.clone())
                };
                self.report.segments.push(SegmentRecord {
                    location: location.to_string(),
                    original: text.to_string(),
                    output: Some(translated),
                    status: SegmentStatus::Translated,
                    error: None,
                });
                visit
            }
            Some(e) => {
                log::debug!("Keeping original text at {}", location);
                let (visit, output) = match &self.options.failure_policy {
                    FailurePolicy::KeepOriginal => (Visit::Keep, None),
                    FailurePolicy::Mark(marker) => {
                        let marked = format!("{}{}", marker, text);
                        (Visit::Replace(marked.clone()), Some(marked))
                    }
                };
                self.report.segments.push(SegmentRecord {
                    location: location.to_string(),
                    original: text.to_string(),
                    output,
                    status: SegmentStatus::Failed,
                    error: Some(e.to_string()),
                });
                visit
            }
        };

        self.tick();
        visit
    }
}
