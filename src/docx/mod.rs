//! Word document parsing.
//!
//! [`DocxParser`] reads the main WordprocessingML part of a package and
//! collects its body paragraphs.

mod parser;

pub use parser::DocxParser;
