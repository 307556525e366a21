//! PPTX (Office Open XML) backend for in-place text translation.
//!
//! Slides are walked in presentation order; each text-bearing shape, table
//! cell and (optionally) notes shape is one text unit whose translation is
//! written back into the same shape.

pub mod presentation;
pub mod shape;
pub mod text;
pub mod walker;

pub use presentation::{PptxDocument, PptxOptions};
pub use text::TextStyle;
