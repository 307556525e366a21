//! DOCX (Office Open XML) backend for in-place text translation.
//!
//! Every top-level body paragraph is one text unit, followed by every
//! paragraph of every top-level table cell in row-major order.

pub mod document;
pub mod paragraph;
pub mod walker;

pub use document::DocxDocument;
