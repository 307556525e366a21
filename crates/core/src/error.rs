//! Error types for document translation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while translating a document.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing bytes failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The format tag is not one of the supported document formats.
    #[error("Unsupported or unrecognized file format: {0}")]
    UnsupportedFormat(String),

    /// Missing credential or an invalid configuration value.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A caller-supplied argument was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// ZIP archive error (OOXML package).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing or writing error.
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// A part required by the format is absent from the package.
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// Invalid or corrupted file.
    #[error("Invalid or corrupted file: {0}")]
    CorruptedFile(String),

    /// The package is password protected.
    #[error("Encrypted document: {0}")]
    EncryptedDocument(String),

    /// Legacy binary Office file (.ppt/.doc) rather than OOXML.
    #[error("Legacy binary format is not supported: {0}")]
    LegacyBinaryFormat(String),

    /// The translation function failed for one text unit.
    #[error("Translation failed: {0}")]
    Translation(String),

    /// The walk was cancelled and the partial result discarded.
    #[error("Translation cancelled after {0} units")]
    Cancelled(usize),
}
