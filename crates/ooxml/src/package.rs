//! OOXML package (ZIP container) reading and writing.

use crate::rels::{self, Relationship};
use crate::xml::XmlDocument;
use doctrans_core::{Error, Result};
use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// Largest uncompressed part accepted when opening a package.
pub const MAX_PART_BYTES: u64 = 256 * 1024 * 1024;

/// Container detected from the leading magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// ZIP archive (PK\x03\x04): OOXML.
    Zip,
    /// OLE/CFB compound file: legacy binary Office or an encrypted package.
    Cfb,
    Unknown,
}

impl ContainerKind {
    /// Detect the container from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Self {
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Self::Zip;
        }
        if bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]) {
            return Self::Cfb;
        }
        Self::Unknown
    }
}

/// One archive entry, held in memory.
#[derive(Debug, Clone)]
pub struct PackageEntry {
    pub name: String,
    pub data: Vec<u8>,
    pub compression: CompressionMethod,
    pub is_dir: bool,
    pub last_modified: DateTime,
    pub unix_mode: Option<u32>,
    /// Index in the source archive while the entry is unchanged.
    source_index: Option<usize>,
}

/// An OOXML package loaded fully into memory.
///
/// The source bytes are kept: an unchanged package serializes back to them,
/// and unchanged entries of a changed package are copied raw.
#[derive(Debug, Clone, Default)]
pub struct Package {
    entries: Vec<PackageEntry>,
    source: Option<Vec<u8>>,
}

impl Package {
    /// Create an empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a package from bytes.
    pub fn open(bytes: &[u8]) -> Result<Self> {
        match ContainerKind::from_magic(bytes) {
            ContainerKind::Zip => {}
            ContainerKind::Cfb => return Err(reject_compound_file(bytes)),
            ContainerKind::Unknown => {
                return Err(Error::CorruptedFile(
                    "not a ZIP-based Office Open XML package".to_string(),
                ));
            }
        }

        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|e| Error::ZipError(format!("Failed to read entry {}: {}", index, e)))?;

            let name = file.name().to_string();
            let is_dir = file.is_dir();
            let compression = file.compression();
            let last_modified = file.last_modified();
            let unix_mode = file.unix_mode();
            if file.size() > MAX_PART_BYTES {
                return Err(Error::CorruptedFile(format!(
                    "part '{}' declares {} bytes",
                    name,
                    file.size()
                )));
            }
            let data = if is_dir {
                Vec::new()
            } else {
                read_entry(&mut file, &name, MAX_PART_BYTES)?
            };

            entries.push(PackageEntry {
                name,
                data,
                compression,
                is_dir,
                last_modified,
                unix_mode,
                source_index: Some(index),
            });
        }

        log::debug!("Opened package with {} entries", entries.len());
        Ok(Self {
            entries,
            source: Some(bytes.to_vec()),
        })
    }

    /// Whether any part was replaced or added since the package was opened.
    pub fn is_modified(&self) -> bool {
        self.source.is_none() || self.entries.iter().any(|e| e.source_index.is_none())
    }

    /// Names of all entries, in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    fn find(&self, name: &str) -> Option<&PackageEntry> {
        let name = normalize_part_name(name);
        self.entries
            .iter()
            .find(|e| !e.is_dir && e.name.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Raw bytes of a part.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.find(name).map(|e| e.data.as_slice())
    }

    /// Parse a part as XML, failing with `MissingPart` if it is absent.
    pub fn read_xml(&self, name: &str) -> Result<XmlDocument> {
        let data = self
            .part(name)
            .ok_or_else(|| Error::MissingPart(name.to_string()))?;
        XmlDocument::from_bytes(data)
            .map_err(|e| Error::XmlError(format!("{} in '{}'", e, name)))
    }

    /// Replace a part's bytes, or append a new deflated part.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        let normalized = normalize_part_name(name);
        match self
            .entries
            .iter_mut()
            .find(|e| !e.is_dir && e.name.eq_ignore_ascii_case(normalized))
        {
            Some(entry) => {
                entry.data = data;
                entry.source_index = None;
            }
            None => self.entries.push(PackageEntry {
                name: normalized.to_string(),
                data,
                compression: CompressionMethod::Deflated,
                is_dir: false,
                last_modified: DateTime::default(),
                unix_mode: None,
                source_index: None,
            }),
        }
    }

    /// Serialize an XML document into a part.
    pub fn write_xml(&mut self, name: &str, doc: &XmlDocument) -> Result<()> {
        let bytes = doc.to_bytes()?;
        self.set_part(name, bytes);
        Ok(())
    }

    /// Relationships declared by a part. A part without a `.rels` companion
    /// has none.
    pub fn relationships(&self, source_part: &str) -> Result<Vec<Relationship>> {
        let rels_path = rels::rels_path_for(source_part);
        if !self.contains(&rels_path) {
            return Ok(Vec::new());
        }
        let doc = self.read_xml(&rels_path)?;
        Ok(rels::parse_relationships(&doc))
    }

    /// Write the package back into ZIP bytes.
    ///
    /// Entry timestamps and modes are carried over, so equal contents give
    /// equal bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut source = match &self.source {
            Some(bytes) if !self.is_modified() => return Ok(bytes.clone()),
            Some(bytes) => Some(
                ZipArchive::new(Cursor::new(bytes.as_slice()))
                    .map_err(|e| Error::ZipError(format!("Failed to reopen ZIP: {}", e)))?,
            ),
            None => None,
        };
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for entry in &self.entries {
            if let (Some(index), Some(archive)) = (entry.source_index, source.as_mut()) {
                if !entry.is_dir {
                    let file = archive.by_index_raw(index).map_err(|e| {
                        Error::ZipError(format!("Failed to read entry {}: {}", index, e))
                    })?;
                    writer.raw_copy_file(file).map_err(|e| {
                        Error::ZipError(format!("Failed to copy '{}': {}", entry.name, e))
                    })?;
                    continue;
                }
            }

            let method = match entry.compression {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let mut options = FileOptions::default()
                .compression_method(method)
                .last_modified_time(entry.last_modified);
            if let Some(mode) = entry.unix_mode {
                options = options.unix_permissions(mode);
            }

            if entry.is_dir {
                writer
                    .add_directory(entry.name.clone(), options)
                    .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", entry.name, e)))?;
                continue;
            }

            writer
                .start_file(entry.name.clone(), options)
                .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", entry.name, e)))?;
            writer.write_all(&entry.data)?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish ZIP: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

/// Read one entry, refusing more than `limit` decompressed bytes.
fn read_entry<R: Read>(reader: R, name: &str, limit: u64) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut data)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", name, e)))?;
    if data.len() as u64 > limit {
        return Err(Error::CorruptedFile(format!(
            "part '{}' exceeds {} bytes",
            name, limit
        )));
    }
    Ok(data)
}

/// Tell an encrypted OOXML package apart from a legacy binary file.
fn reject_compound_file(bytes: &[u8]) -> Error {
    match cfb::CompoundFile::open(Cursor::new(bytes)) {
        Ok(compound) if compound.exists("/EncryptedPackage") => Error::EncryptedDocument(
            "password-protected package; remove the password and retry".to_string(),
        ),
        Ok(_) => Error::LegacyBinaryFormat(
            "OLE compound file (.ppt/.doc); save it as .pptx/.docx first".to_string(),
        ),
        Err(e) => Error::CorruptedFile(format!("unreadable compound file: {}", e)),
    }
}

/// Part names are stored without a leading slash.
fn normalize_part_name(name: &str) -> &str {
    name.trim_start_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Package {
        let mut pkg = Package::new();
        pkg.set_part("[Content_Types].xml", b"<Types/>".to_vec());
        pkg.set_part("word/document.xml", b"<w:document xmlns:w=\"urn:w\"/>".to_vec());
        pkg
    }

    #[test]
    fn test_container_magic() {
        assert_eq!(ContainerKind::from_magic(b"PK\x03\x04rest"), ContainerKind::Zip);
        assert_eq!(
            ContainerKind::from_magic(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0]),
            ContainerKind::Cfb
        );
        assert_eq!(ContainerKind::from_magic(b"%PDF-1.7"), ContainerKind::Unknown);
        assert_eq!(ContainerKind::from_magic(b"PK"), ContainerKind::Unknown);
    }

    #[test]
    fn test_round_trip_preserves_entries() {
        let bytes = sample().to_bytes().unwrap();
        let pkg = Package::open(&bytes).unwrap();

        let names: Vec<&str> = pkg.part_names().collect();
        assert_eq!(names, vec!["[Content_Types].xml", "word/document.xml"]);
        assert_eq!(pkg.part("/word/document.xml"), sample().part("word/document.xml"));
        assert!(pkg.contains("WORD/Document.xml"));
    }

    #[test]
    fn test_set_part_replaces_in_place() {
        let mut pkg = sample();
        pkg.set_part("word/document.xml", b"<x/>".to_vec());
        assert_eq!(pkg.part_names().count(), 2);
        assert_eq!(pkg.part("word/document.xml"), Some(&b"<x/>"[..]));
    }

    #[test]
    fn test_missing_part() {
        assert!(matches!(
            sample().read_xml("ppt/presentation.xml"),
            Err(Error::MissingPart(_))
        ));
    }

    #[test]
    fn test_rejects_non_zip() {
        assert!(matches!(
            Package::open(b"%PDF-1.7 not a zip"),
            Err(Error::CorruptedFile(_))
        ));
        assert!(matches!(
            Package::open(b"PK\x03\x04garbage"),
            Err(Error::ZipError(_))
        ));
    }

    fn dated_package() -> Vec<u8> {
        let stamp = DateTime::from_date_and_time(2001, 2, 3, 4, 5, 6).unwrap();
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in [("a.xml", "<a/>"), ("b.xml", "<b/>")] {
            let options = FileOptions::default().last_modified_time(stamp);
            writer.start_file(name, options).unwrap();
            writer.write_all(data.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn stamp_of(bytes: &[u8], name: &str) -> (u16, u8, u8, u8, u8, u8) {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let t = archive.by_name(name).unwrap().last_modified();
        (t.year(), t.month(), t.day(), t.hour(), t.minute(), t.second())
    }

    #[test]
    fn test_unchanged_package_is_returned_as_is() {
        let bytes = dated_package();
        let pkg = Package::open(&bytes).unwrap();
        assert!(!pkg.is_modified());
        assert_eq!(pkg.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_rewrite_keeps_timestamps_and_is_repeatable() {
        let bytes = dated_package();
        let rewrite = || {
            let mut pkg = Package::open(&bytes).unwrap();
            pkg.set_part("b.xml", b"<b>changed</b>".to_vec());
            pkg.to_bytes().unwrap()
        };

        let first = rewrite();
        assert_eq!(first, rewrite());
        assert_eq!(stamp_of(&first, "a.xml"), (2001, 2, 3, 4, 5, 6));
        assert_eq!(stamp_of(&first, "b.xml"), (2001, 2, 3, 4, 5, 6));

        let reopened = Package::open(&first).unwrap();
        assert_eq!(reopened.part("a.xml"), Some(&b"<a/>"[..]));
        assert_eq!(reopened.part("b.xml"), Some(&b"<b>changed</b>"[..]));
    }

    /// A stored single-entry archive whose central directory claims a
    /// zip64 uncompressed size of 2^62 bytes.
    fn oversized_claim() -> Vec<u8> {
        let name = b"word/document.xml";
        let data = b"<w:document/>";
        let crc = 0u32;

        let mut out = Vec::new();
        // local file header
        out.extend_from_slice(&0x04034b50u32.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0x21u16.to_le_bytes());
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(name);
        out.extend_from_slice(data);

        // central directory
        let cd_offset = out.len() as u32;
        out.extend_from_slice(&0x02014b50u32.to_le_bytes());
        out.extend_from_slice(&45u16.to_le_bytes());
        out.extend_from_slice(&45u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0x21u16.to_le_bytes());
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&u32::MAX.to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&12u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(name);
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&8u16.to_le_bytes());
        out.extend_from_slice(&(1u64 << 62).to_le_bytes());
        let cd_size = out.len() as u32 - cd_offset;

        // end of central directory
        out.extend_from_slice(&0x06054b50u32.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&cd_size.to_le_bytes());
        out.extend_from_slice(&cd_offset.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out
    }

    #[test]
    fn test_rejects_oversized_size_claim() {
        assert!(matches!(
            Package::open(&oversized_claim()),
            Err(Error::CorruptedFile(_))
        ));
    }

    #[test]
    fn test_entry_read_is_bounded() {
        let data = vec![b'x'; 64];
        assert_eq!(read_entry(&data[..], "big.xml", 64).unwrap().len(), 64);
        assert!(matches!(
            read_entry(&data[..], "big.xml", 63),
            Err(Error::CorruptedFile(_))
        ));
    }

    #[test]
    fn test_rejects_compound_files() {
        let mut compound = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
        compound.create_stream("/EncryptedPackage").unwrap();
        compound.flush().unwrap();
        let bytes = compound.into_inner().into_inner();
        assert!(matches!(
            Package::open(&bytes),
            Err(Error::EncryptedDocument(_))
        ));

        let mut compound = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
        compound.create_stream("/PowerPoint Document").unwrap();
        compound.flush().unwrap();
        let bytes = compound.into_inner().into_inner();
        assert!(matches!(
            Package::open(&bytes),
            Err(Error::LegacyBinaryFormat(_))
        ));
    }
}
