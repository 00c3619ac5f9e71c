//! Document model for parsed Word documents.
//!
//! The parser turns `word/document.xml` into these structures and the
//! renderer turns them into the text dump.

mod document;
mod paragraph;

pub use document::*;
pub use paragraph::*;
