//! DOCX parser implementation.

use crate::container::OoxmlContainer;
use crate::detect::{detect_format_from_container, FormatType};
use crate::error::{Error, Result};
use crate::model::{Document, Paragraph, TextRun};
use quick_xml::events::{BytesStart, Event};
use std::borrow::Cow;

/// Position of the reader relative to the document body.
///
/// Only the chain `document > body > p > [hyperlink >] r > t` carries
/// paragraph text; everything else is `Skipped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Document,
    Body,
    Paragraph,
    Hyperlink,
    Run,
    Text,
    Skipped,
}

/// Parser for DOCX (Word) documents.
pub struct DocxParser {
    container: OoxmlContainer,
    main_part: String,
    format: FormatType,
}

impl DocxParser {
    /// Create a parser from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    /// Create a parser from a container.
    ///
    /// Fails unless the package's main part is a WordprocessingML document.
    pub fn from_container(container: OoxmlContainer) -> Result<Self> {
        let format = detect_format_from_container(&container)?;
        let main_part = container.main_document_part()?;

        Ok(Self {
            container,
            main_part,
            format,
        })
    }

    /// Parse the main document part and return a Document model.
    pub fn parse(&self) -> Result<Document> {
        let xml = self.container.read_xml(&self.main_part)?;
        let mut doc = parse_document_xml(&xml)?;
        doc.format = Some(self.format);

        log::debug!(
            "Parsed {} paragraphs from {} ({})",
            doc.paragraph_count(),
            self.main_part,
            self.format
        );

        Ok(doc)
    }

    /// Package flavour of the opened document.
    pub fn format(&self) -> FormatType {
        self.format
    }

    /// Part name of the main document.
    pub fn main_part(&self) -> &str {
        &self.main_part
    }
}

/// Parse a main document part into its body paragraphs.
pub(crate) fn parse_document_xml(xml: &str) -> Result<Document> {
    let mut reader = quick_xml::Reader::from_str(xml);
    // Keep whitespace: it is significant inside w:t
    reader.config_mut().trim_text(false);

    let mut doc = Document::new();
    let mut scopes: Vec<Scope> = Vec::new();
    let mut paragraph = Paragraph::new();
    let mut run = TextRun::default();
    let mut seen_body = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let parent = scopes.last().copied();
                let scope = enter(parent, e);
                match scope {
                    Scope::Body => seen_body = true,
                    Scope::Paragraph => paragraph = Paragraph::new(),
                    Scope::Run => run = TextRun::default(),
                    Scope::Skipped if parent == Some(Scope::Run) => {
                        if let Some(s) = run_content(e) {
                            run.push_str(s);
                        }
                    }
                    _ => {}
                }
                scopes.push(scope);
            }
            Ok(Event::Empty(ref e)) => {
                let parent = scopes.last().copied();
                match enter(parent, e) {
                    Scope::Body => seen_body = true,
                    Scope::Paragraph => doc.add_paragraph(Paragraph::new()),
                    Scope::Skipped if parent == Some(Scope::Run) => {
                        if let Some(s) = run_content(e) {
                            run.push_str(s);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) if scopes.last() == Some(&Scope::Text) => {
                let raw = std::str::from_utf8(e).map_err(|err| Error::XmlParse(err.to_string()))?;
                let text = normalize_line_endings(raw);
                let text = quick_xml::escape::unescape(&text)
                    .map_err(|err| Error::XmlParse(err.to_string()))?;
                run.push_str(&text);
            }
            Ok(Event::CData(ref e)) if scopes.last() == Some(&Scope::Text) => {
                run.push_str(&normalize_line_endings(&String::from_utf8_lossy(e)));
            }
            Ok(Event::End(_)) => match scopes.pop() {
                Some(Scope::Paragraph) => doc.add_paragraph(std::mem::take(&mut paragraph)),
                Some(Scope::Run) => paragraph.add_run(std::mem::take(&mut run)),
                Some(_) => {}
                None => return Err(Error::XmlParse("unexpected closing tag".to_string())),
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    if !scopes.is_empty() {
        return Err(Error::XmlParse(format!(
            "document ended with {} unclosed elements",
            scopes.len()
        )));
    }

    if !seen_body {
        return Err(Error::InvalidData(
            "main document part has no w:body".to_string(),
        ));
    }

    Ok(doc)
}

/// Fold literal `\r\n` and lone `\r` into `\n`, as an XML processor must.
///
/// Runs before entity expansion so that an escaped `&#13;` stays a `\r`.
fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Classify an element given the scope it opens in.
fn enter(parent: Option<Scope>, e: &BytesStart) -> Scope {
    match (parent, e.local_name().as_ref()) {
        (None, b"document") => Scope::Document,
        (Some(Scope::Document), b"body") => Scope::Body,
        (Some(Scope::Body), b"p") => Scope::Paragraph,
        (Some(Scope::Paragraph), b"hyperlink") => Scope::Hyperlink,
        (Some(Scope::Paragraph | Scope::Hyperlink), b"r") => Scope::Run,
        (Some(Scope::Run), b"t") => Scope::Text,
        _ => Scope::Skipped,
    }
}

/// Text contributed by a non-`w:t` child of a run.
fn run_content(e: &BytesStart) -> Option<&'static str> {
    match e.local_name().as_ref() {
        b"tab" | b"ptab" => Some("\t"),
        b"cr" => Some("\n"),
        b"br" => match get_attr(e, b"type").as_deref() {
            None | Some("textWrapping") => Some("\n"),
            // page and column breaks
            Some(_) => None,
        },
        b"noBreakHyphen" => Some("-"),
        _ => None,
    }
}

/// Get an attribute value by local name, ignoring its prefix.
fn get_attr(e: &BytesStart, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == local)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}
