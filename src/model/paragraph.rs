//! Paragraph and text run models.

use serde::{Deserialize, Serialize};

/// A run of text inside a paragraph.
///
/// Tabs and line breaks inside the run are already folded into `text`
/// as `\t` and `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,
}

impl TextRun {
    /// Create a text run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Append text to this run.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }
}

/// A paragraph of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text runs in this paragraph
    #[serde(default)]
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with the given text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::plain(text)],
        }
    }

    /// Add a text run to this paragraph.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Get the plain text content, exactly as stored.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Get the text with leading and trailing whitespace removed.
    ///
    /// The information separators U+001C..U+001F count as whitespace too.
    /// Returns `None` when nothing but whitespace is left.
    pub fn trimmed_text(&self) -> Option<String> {
        let text = self.plain_text();
        let trimmed = text.trim_matches(is_blank_char);
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

fn is_blank_char(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_text() {
        let mut para = Paragraph::new();
        para.add_run(TextRun::plain("Hello, "));
        para.add_run(TextRun::plain("World!"));
        assert_eq!(para.plain_text(), "Hello, World!");
    }

    #[test]
    fn test_trimmed_text() {
        let para = Paragraph::with_text("\t  Hello  \n");
        assert_eq!(para.trimmed_text().as_deref(), Some("Hello"));

        let para = Paragraph::with_text(" \u{a0}\u{3000} ");
        assert_eq!(para.trimmed_text(), None);
    }

    #[test]
    fn test_information_separators_trimmed() {
        let para = Paragraph::with_text("\u{1c}\u{1d}\u{1e}\u{1f}");
        assert_eq!(para.trimmed_text(), None);

        let para = Paragraph::with_text("\u{1f} Title \u{1c}");
        assert_eq!(para.trimmed_text().as_deref(), Some("Title"));

        // other control characters are kept
        let para = Paragraph::with_text("\u{7}bell\u{1b}");
        assert_eq!(para.trimmed_text().as_deref(), Some("\u{7}bell\u{1b}"));
    }

    #[test]
    fn test_whitespace_split_across_runs() {
        let mut para = Paragraph::new();
        para.add_run(TextRun::plain(" "));
        para.add_run(TextRun::plain("\t"));
        assert_eq!(para.trimmed_text(), None);

        para.add_run(TextRun::plain("x "));
        assert_eq!(para.trimmed_text().as_deref(), Some("x"));
    }

    #[test]
    fn test_run_accumulation() {
        let mut run = TextRun::default();
        run.push_str("a");
        run.push_str("\t");
        run.push_str("b");
        assert_eq!(run.text, "a\tb");
    }
}
