//! OOXML package handling shared by the presentation and word-processing
//! backends.
//!
//! A package is a ZIP archive of XML parts. Parts are parsed into an owned
//! element tree, rewritten in memory, and written back into a new archive
//! that keeps every untouched entry byte-for-byte.

pub mod package;
pub mod rels;
pub mod xml;

pub use package::{ContainerKind, Package, PackageEntry};
pub use rels::Relationship;
pub use xml::{XmlDocument, XmlElement, XmlNode};
