//! Error types for the docdump library.

use std::io;
use thiserror::Error;

/// Result type alias for docdump operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations or while writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not a ZIP package or an OLE2 compound file.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The file format is recognized but is not a WordprocessingML package.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in the document.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// The document is password protected.
    #[error("Document is encrypted")]
    Encrypted,
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}
