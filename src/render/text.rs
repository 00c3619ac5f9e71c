//! Plain text renderer implementation.

use crate::error::Result;
use crate::model::Document;
use std::io::Write;

/// Iterate the trimmed text of every paragraph that is not blank.
pub fn non_blank_paragraphs(doc: &Document) -> impl Iterator<Item = String> + '_ {
    doc.paragraphs.iter().filter_map(|para| para.trimmed_text())
}

/// Render a Document to the dump format.
pub fn to_text(doc: &Document) -> String {
    let mut output = String::new();
    for text in non_blank_paragraphs(doc) {
        output.push_str(&text);
        output.push_str("\n\n");
    }
    output
}

/// Write a Document in the dump format, returning the number of blocks.
///
/// The writer is flushed before returning.
pub fn write_text<W: Write>(doc: &Document, writer: &mut W) -> Result<usize> {
    let mut blocks = 0;
    for text in non_blank_paragraphs(doc) {
        writeln!(writer, "{}", text)?;
        writeln!(writer)?;
        blocks += 1;
    }
    writer.flush()?;
    Ok(blocks)
}
