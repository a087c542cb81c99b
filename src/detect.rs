//! DOCX format detection and validation.

use crate::error::{Error, Result};
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

/// Kind of word-processing package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocxKind {
    /// Regular document (.docx)
    Document,
    /// Macro-enabled document (.docm)
    MacroEnabled,
    /// Template (.dotx)
    Template,
}

/// DOCX format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxFormat {
    /// Package kind declared in the content types
    pub kind: DocxKind,
    /// Number of entries in the container
    pub entry_count: usize,
}

impl std::fmt::Display for DocxFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            DocxKind::Document => "document",
            DocxKind::MacroEnabled => "macro-enabled document",
            DocxKind::Template => "template",
        };
        write!(f, "DOCX ({})", kind)
    }
}

/// Zip local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

const CONTENT_TYPES: &str = "[Content_Types].xml";

const MAIN_DOCUMENT_TYPE: &str = "wordprocessingml.document.main+xml";
const MACRO_DOCUMENT_TYPE: &str = "ms-word.document.macroEnabled.main+xml";
const TEMPLATE_TYPE: &str = "wordprocessingml.template.main+xml";

/// Detect DOCX format from a file path.
///
/// # Example
/// ```no_run
/// use docbullet::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("resume.docx").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DocxFormat> {
    // The zip central directory sits at the end, so the whole file is needed.
    let data = std::fs::read(path)?;
    detect_format_from_bytes(&data)
}

/// Detect DOCX format from bytes.
///
/// # Returns
/// * `Ok(DocxFormat)` if the data is a zip container declaring a
///   word-processing main part
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DocxFormat> {
    if !data.starts_with(ZIP_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let mut archive = ZipArchive::new(Cursor::new(data))?;
    let entry_count = archive.len();

    let mut content_types = String::new();
    match archive.by_name(CONTENT_TYPES) {
        Ok(mut file) => {
            file.read_to_string(&mut content_types)?;
        }
        Err(_) => return Err(Error::UnknownFormat),
    }

    let kind = if content_types.contains(MACRO_DOCUMENT_TYPE) {
        DocxKind::MacroEnabled
    } else if content_types.contains(MAIN_DOCUMENT_TYPE) {
        DocxKind::Document
    } else if content_types.contains(TEMPLATE_TYPE) {
        DocxKind::Template
    } else {
        return Err(Error::UnknownFormat);
    };

    Ok(DocxFormat { kind, entry_count })
}

/// Check if a file is a DOCX package.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes represent a DOCX package.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
