//! Document translation entry points.
//!
//! `translate_document` takes the raw bytes of a `.pptx` or `.docx` file, a
//! format tag and a target language, translates every text unit in place
//! through a [`TextTranslator`](doctrans_core::TextTranslator), and returns
//! the serialized document. A unit whose translation fails keeps its
//! original text.

pub mod document;
pub mod translator;

pub use document::{Document, WalkOptions};
pub use translator::{
    document_outline, extract_segments, DocumentTranslator, TranslateOptions, TranslationOutput,
};
