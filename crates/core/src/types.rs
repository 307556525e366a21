//! Domain types shared by the format backends.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of document formats the walker understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Presentation (Office Open XML `.pptx`).
    Pptx,
    /// Word-processing document (Office Open XML `.docx`).
    Docx,
}

impl DocumentFormat {
    /// Detect format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    /// Resolve a caller-supplied format tag, rejecting anything outside the set.
    pub fn from_tag(tag: &str) -> Result<Self> {
        Self::from_extension(tag.trim()).ok_or_else(|| {
            Error::UnsupportedFormat(format!(
                "'{}' (supported: pptx, docx)",
                tag.trim()
            ))
        })
    }

    /// Canonical file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pptx => "pptx",
            Self::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Where a text unit lives inside its document.
///
/// Rendered as a stable colon-separated string, e.g.
/// `pptx:slide:0:shape:2.1` or `docx:table:0:row:1:col:2:para:0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnitLocation {
    /// A text frame or table cell on a slide (or on its notes page).
    Slide {
        /// Zero-based slide index in presentation order.
        slide: usize,
        /// True when the unit lives on the slide's notes page.
        notes: bool,
        /// Index path through nested groups down to the shape.
        shape: Vec<usize>,
        /// Row and column when the shape is a table.
        cell: Option<(usize, usize)>,
    },
    /// A top-level body paragraph.
    Paragraph {
        /// Zero-based index among body paragraphs.
        index: usize,
    },
    /// A paragraph inside a top-level table cell.
    TableCell {
        table: usize,
        row: usize,
        col: usize,
        paragraph: usize,
    },
}

impl fmt::Display for UnitLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slide {
                slide,
                notes,
                shape,
                cell,
            } => {
                let page = if *notes { "notes" } else { "slide" };
                let path = shape
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(".");
                write!(f, "pptx:{}:{}:shape:{}", page, slide, path)?;
                if let Some((row, col)) = cell {
                    write!(f, ":cell:{}:{}", row, col)?;
                }
                Ok(())
            }
            Self::Paragraph { index } => write!(f, "docx:paragraph:{}", index),
            Self::TableCell {
                table,
                row,
                col,
                paragraph,
            } => write!(
                f,
                "docx:table:{}:row:{}:col:{}:para:{}",
                table, row, col, paragraph
            ),
        }
    }
}
