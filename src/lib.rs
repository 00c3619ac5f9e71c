//! # docdump
//!
//! Dump the paragraph text of Word (.docx) documents.
//!
//! Every body paragraph is trimmed; paragraphs left empty are dropped and
//! the rest are printed in document order, each followed by a blank line.
//!
//! ## Quick Start
//!
//! ```no_run
//! // The dump as a string
//! let text = docdump::extract_text("document.docx")?;
//! print!("{}", text);
//!
//! // Straight to any writer
//! let stdout = std::io::stdout();
//! let blocks = docdump::dump_file("document.docx", &mut stdout.lock())?;
//! eprintln!("{} paragraphs", blocks);
//!
//! // Access to the parsed paragraphs
//! let doc = docdump::parse_file("document.docx")?;
//! println!("Paragraphs: {}", doc.paragraphs.len());
//! # Ok::<(), docdump::Error>(())
//! ```
//!
//! Failures are all-or-nothing: the whole document is parsed before any
//! output is produced, so a broken file writes nothing.

pub mod container;
pub mod detect;
pub mod docx;
pub mod error;
pub mod model;
pub mod render;

// Re-exports
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use detect::{detect_format_from_bytes, FormatType};
pub use error::{Error, Result};
pub use model::{Document, Paragraph, TextRun};

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Document read when no path is given.
pub const DEFAULT_INPUT: &str = "Category Discovery Analysis_dokumentaatio.docx";

/// Parse a document file and return a Document model.
///
/// # Example
///
/// ```no_run
/// use docdump::parse_file;
///
/// let doc = parse_file("document.docx")?;
/// println!("Paragraphs: {}", doc.paragraphs.len());
/// # Ok::<(), docdump::Error>(())
/// ```
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    log::debug!("Reading {}", path.display());

    let mut data = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut data)?;
    parse_owned(data)
}

/// Parse a document from bytes.
///
/// # Example
///
/// ```no_run
/// use docdump::parse_bytes;
///
/// let data = std::fs::read("document.docx")?;
/// let doc = parse_bytes(&data)?;
/// # Ok::<(), docdump::Error>(())
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    parse_owned(data.to_vec())
}

/// Open the package once; the parser resolves the main part and its format.
fn parse_owned(data: Vec<u8>) -> Result<Document> {
    detect::check_signature(&data)?;

    let parser = docx::DocxParser::from_bytes(data)?;
    log::debug!("Detected {} with main part {}", parser.format(), parser.main_part());

    parser.parse()
}

/// Extract the dump of a document as a string.
///
/// # Example
///
/// ```no_run
/// use docdump::extract_text;
///
/// let text = extract_text("document.docx")?;
/// print!("{}", text);
/// # Ok::<(), docdump::Error>(())
/// ```
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    let doc = parse_file(path)?;
    Ok(render::to_text(&doc))
}

/// Parse a document and write its dump, returning the number of blocks.
///
/// Nothing is written unless the document parses completely.
pub fn dump_file<W: Write>(path: impl AsRef<Path>, writer: &mut W) -> Result<usize> {
    let doc = parse_file(path)?;
    render::write_text(&doc, writer)
}
