//! Word-processing package I/O.
//!
//! A [`DocxPackage`] holds every entry of the zip container in its original
//! order together with the parsed body of the main document part. Saving
//! rewrites only the main part; all other entries are copied through with
//! their original compression method.

mod reader;
mod writer;

use std::io::{Cursor, Read, Write};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};
use crate::model::Document;
use reader::BodyFrame;

/// Package-level relationships part.
const PACKAGE_RELS: &str = "_rels/.rels";

/// Main part used when the relationships part does not name one.
const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// Relationship type suffix of the main document part.
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

#[derive(Debug, Clone)]
struct PackageEntry {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
    is_dir: bool,
}

/// An opened word-processing package.
#[derive(Debug, Clone)]
pub struct DocxPackage {
    entries: Vec<PackageEntry>,
    main_part: String,
    frame: BodyFrame,
    document: Document,
}

impl DocxPackage {
    /// Open a package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Open a package from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Open a package from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        crate::detect::detect_format_from_bytes(data)?;

        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let mut buf = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut buf)?;
            entries.push(PackageEntry {
                name: file.name().to_string(),
                compression: file.compression(),
                is_dir: file.is_dir(),
                data: buf,
            });
        }

        let main_part = entries
            .iter()
            .find(|e| e.name == PACKAGE_RELS)
            .and_then(|e| main_part_target(&e.data))
            .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string());

        let main = entries
            .iter()
            .find(|e| e.name == main_part)
            .ok_or_else(|| Error::MissingPart(main_part.clone()))?;
        let xml = std::str::from_utf8(&main.data)
            .map_err(|e| Error::Xml(format!("{} is not valid UTF-8: {}", main_part, e)))?;

        let (frame, blocks) = reader::split_body(xml)?;
        let mut document = Document::new();
        for block in blocks {
            document.push_block(block);
        }

        log::debug!(
            "Opened package: {} entries, main part {}, {} paragraphs",
            entries.len(),
            main_part,
            document.paragraph_count()
        );

        Ok(Self {
            entries,
            main_part,
            frame,
            document,
        })
    }

    /// Name of the main document part inside the container.
    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    /// Names of all container entries in order.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// The parsed document body.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the document body.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Serialized main document part.
    pub fn main_part_xml(&self) -> String {
        writer::write_document(&self.frame, self.document.blocks())
    }

    /// Serialize the package to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let main_xml = self.main_part_xml();
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        for entry in &self.entries {
            let method = if entry.compression == CompressionMethod::Stored {
                CompressionMethod::Stored
            } else {
                CompressionMethod::Deflated
            };
            let options = SimpleFileOptions::default().compression_method(method);

            if entry.is_dir {
                zip.add_directory(entry.name.clone(), options)?;
                continue;
            }

            zip.start_file(entry.name.clone(), options)?;
            if entry.name == self.main_part {
                zip.write_all(main_xml.as_bytes())?;
            } else {
                zip.write_all(&entry.data)?;
            }
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    /// Write the package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// Find the main part named by the package relationships.
fn main_part_target(rels: &[u8]) -> Option<String> {
    let xml = std::str::from_utf8(rels).ok()?;
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"Relationship" => {
                let is_main = reader::attr(&e, b"Type")
                    .map(|t| t.ends_with(OFFICE_DOCUMENT_REL))
                    .unwrap_or(false);
                if is_main {
                    return reader::attr(&e, b"Target")
                        .map(|t| t.trim_start_matches('/').to_string());
                }
            }
            Ok(Event::Eof) => return None,
            Err(e) => {
                log::warn!("Unreadable package relationships: {}", e);
                return None;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            zip.start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    const CONTENT_TYPES: &str = r#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Override PartName="/word/main.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;
    const RELS: &str = r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="/word/main.xml"/></Relationships>"#;
    const BODY: &str = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>Hello</w:t></w:r></w:p><w:sectPr/></w:body></w:document>"#;

    #[test]
    fn test_main_part_from_relationships() {
        let bytes = build(&[
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", RELS),
            ("word/main.xml", BODY),
        ]);
        let package = DocxPackage::from_bytes(&bytes).unwrap();

        assert_eq!(package.main_part(), "word/main.xml");
        assert_eq!(package.document().paragraph_text(0), "Hello");
    }

    #[test]
    fn test_missing_main_part() {
        let bytes = build(&[("[Content_Types].xml", CONTENT_TYPES)]);
        let result = DocxPackage::from_bytes(&bytes);
        assert!(matches!(result, Err(Error::MissingPart(_))));
    }

    #[test]
    fn test_unchanged_package_roundtrip() {
        let bytes = build(&[
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", RELS),
            ("word/main.xml", BODY),
            ("word/styles.xml", "<w:styles/>"),
        ]);
        let package = DocxPackage::from_bytes(&bytes).unwrap();

        assert_eq!(package.main_part_xml(), BODY);

        let saved = package.to_bytes().unwrap();
        let reopened = DocxPackage::from_bytes(&saved).unwrap();
        let names: Vec<_> = reopened.entry_names().collect();
        assert_eq!(
            names,
            vec!["[Content_Types].xml", "_rels/.rels", "word/main.xml", "word/styles.xml"]
        );
    }
}
