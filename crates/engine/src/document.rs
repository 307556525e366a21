//! A parsed document of either supported format.

use doctrans_core::{DocumentFormat, Result, UnitVisitor, WalkOutcome};
use doctrans_docx::DocxDocument;
use doctrans_pptx::{PptxDocument, PptxOptions, TextStyle};

/// Walk settings that only some formats use.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WalkOptions {
    /// Presentation speaker notes.
    pub include_notes: bool,
    /// Formatting for rewritten presentation text bodies.
    pub style: TextStyle,
}

/// A document owned for one walk-and-serialize pass.
#[derive(Debug)]
pub enum Document {
    Pptx(PptxDocument),
    Docx(DocxDocument),
}

impl Document {
    /// Parse bytes with the backend for `format`.
    pub fn open(format: DocumentFormat, bytes: &[u8]) -> Result<Self> {
        match format {
            DocumentFormat::Pptx => Ok(Self::Pptx(PptxDocument::open(bytes)?)),
            DocumentFormat::Docx => Ok(Self::Docx(DocxDocument::open(bytes)?)),
        }
    }

    /// Visit every text unit in document order.
    pub fn walk<V: UnitVisitor + ?Sized>(
        &mut self,
        visitor: &mut V,
        options: &WalkOptions,
    ) -> WalkOutcome {
        match self {
            Self::Pptx(doc) => doc.walk(
                visitor,
                &PptxOptions {
                    include_notes: options.include_notes,
                    style: options.style,
                },
            ),
            Self::Docx(doc) => doc.walk(visitor),
        }
    }

    /// Container topology, for comparing input and output structure.
    pub fn outline(&self) -> Vec<String> {
        match self {
            Self::Pptx(doc) => doc.outline(),
            Self::Docx(doc) => doc.outline(),
        }
    }

    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        match self {
            Self::Pptx(doc) => doc.to_bytes(),
            Self::Docx(doc) => doc.to_bytes(),
        }
    }
}
