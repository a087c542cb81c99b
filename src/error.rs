//! Error types for docbullet library.

use std::io;
use thiserror::Error;

/// Result type alias for docbullet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading, editing or writing a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a word-processing package.
    #[error("Unknown file format: not a valid DOCX package")]
    UnknownFormat,

    /// A required part is missing from the package.
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// Error reading or writing the zip container.
    #[error("Package container error: {0}")]
    Zip(String),

    /// Malformed XML in a package part.
    #[error("XML error: {0}")]
    Xml(String),

    /// No project sections could be detected in the document.
    #[error("No projects found in the document. Please ensure your resume has clear project sections.")]
    NoProjects,

    /// No technology points were supplied (or no projects to receive them).
    #[error("No projects or tech stacks found")]
    NoTechStacks,

    /// A paragraph insertion targeted an index past the end of the document.
    #[error("Paragraph index {0} is out of range (document has {1} paragraphs)")]
    InsertOutOfRange(usize, usize),

    /// Caller-supplied input did not match an accepted format.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::InvalidArchive(_) => Error::UnknownFormat,
            _ => Error::Zip(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}
