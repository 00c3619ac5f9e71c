//! Document model structures.

use super::Paragraph;
use crate::detect::FormatType;
use serde::{Deserialize, Serialize};

/// A parsed Word document: its body paragraphs in reading order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Body paragraphs, in document order
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,

    /// Package flavour the document was read from
    #[serde(skip)]
    pub format: Option<FormatType>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from paragraphs.
    pub fn with_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            paragraphs,
            format: None,
        }
    }

    /// Add a paragraph to the end of the document.
    pub fn add_paragraph(&mut self, para: Paragraph) {
        self.paragraphs.push(para);
    }

    /// Number of body paragraphs, blank ones included.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Check if the document has no paragraphs at all.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}
