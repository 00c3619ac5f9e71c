//! ZIP package access for WordprocessingML documents.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Read};

/// Relationship type of the main document part (transitional schema).
pub const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// Relationship type of the main document part (strict schema).
pub const OFFICE_DOCUMENT_REL_STRICT: &str =
    "http://purl.oclc.org/ooxml/officeDocument/relationships/officeDocument";

/// Part name used when the package relationships do not point anywhere.
pub const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// A relationship entry from a .rels file.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

/// Collection of relationships parsed from a .rels file.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    by_type: HashMap<String, Vec<Relationship>>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get relationships by type, in file order.
    pub fn get_by_type(&self, rel_type: &str) -> &[Relationship] {
        self.by_type
            .get(rel_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Add a relationship.
    pub fn add(&mut self, rel: Relationship) {
        self.by_type
            .entry(rel.rel_type.clone())
            .or_default()
            .push(rel);
    }
}

/// Rewrite a UTF-16 encoding declaration to UTF-8.
///
/// After transcoding to a Rust `String` the declaration would otherwise
/// make quick-xml reinterpret the text as UTF-16.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let (decl, rest) = content.split_at(end_decl + 2);
            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");
            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling UTF-8 (with or without BOM) and UTF-16 LE/BE.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(b"\xEF\xBB\xBF") {
        return String::from_utf8(rest.to_vec()).map_err(|e| Error::InvalidData(e.to_string()));
    }

    if let Some(rest) = bytes.strip_prefix(b"\xFF\xFE") {
        let content = decode_utf16(rest, u16::from_le_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
        let content = decode_utf16(rest, u16::from_be_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        // ASCII markup in UTF-16 leaves a zero byte in every other position
        Err(_) if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 => {
            let content = decode_utf16(bytes, u16::from_le_bytes)?;
            Ok(fix_xml_encoding_declaration(&content))
        }
        Err(_) if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 => {
            let content = decode_utf16(bytes, u16::from_be_bytes)?;
            Ok(fix_xml_encoding_declaration(&content))
        }
        Err(e) => Err(Error::InvalidData(format!("XML part is not valid UTF-8: {}", e))),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::InvalidData(e.to_string()))
}

/// Office Open XML package over an in-memory ZIP archive.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlContainer {
    /// Create a package from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read an XML part from the archive as a string.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        decode_xml_bytes(&bytes)
    }

    /// List all parts in the archive.
    pub fn list_files(&self) -> Vec<String> {
        self.archive
            .borrow()
            .file_names()
            .map(String::from)
            .collect()
    }

    /// Read package-level relationships (_rels/.rels).
    pub fn read_package_relationships(&self) -> Result<Relationships> {
        self.parse_relationships("_rels/.rels")
    }

    /// Resolve the part name of the main document.
    ///
    /// Follows the package `officeDocument` relationship and falls back to
    /// `word/document.xml` when the package does not declare one.
    pub fn main_document_part(&self) -> Result<String> {
        let rels = self.read_package_relationships()?;

        let rel = rels
            .get_by_type(OFFICE_DOCUMENT_REL)
            .first()
            .or_else(|| rels.get_by_type(OFFICE_DOCUMENT_REL_STRICT).first());

        match rel {
            Some(rel) if !rel.external => {
                let part = Self::resolve_package_target(&rel.target);
                log::debug!("Main document part resolved to {}", part);
                Ok(part)
            }
            _ => {
                log::warn!(
                    "Package has no officeDocument relationship, assuming {}",
                    DEFAULT_MAIN_PART
                );
                Ok(DEFAULT_MAIN_PART.to_string())
            }
        }
    }

    /// Look up the content type of a part in `[Content_Types].xml`.
    ///
    /// An `Override` for the part wins over a `Default` for its extension.
    /// Part names compare case-insensitively.
    pub fn content_type_of(&self, part: &str) -> Result<Option<String>> {
        let xml = self.read_xml("[Content_Types].xml")?;
        content_type_from_xml(&xml, part)
    }

    fn parse_relationships(&self, rels_path: &str) -> Result<Relationships> {
        let content = match self.read_xml(rels_path) {
            Ok(c) => c,
            Err(Error::MissingComponent(_)) => return Ok(Relationships::new()),
            Err(e) => return Err(e),
        };

        let mut rels = Relationships::new();
        let mut reader = quick_xml::Reader::from_str(&content);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut rel = Relationship {
                        id: String::new(),
                        rel_type: String::new(),
                        target: String::new(),
                        external: false,
                    };

                    for attr in e.attributes().flatten() {
                        let value = attr
                            .unescape_value()
                            .map(|v| v.into_owned())
                            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
                        match attr.key.as_ref() {
                            b"Id" => rel.id = value,
                            b"Type" => rel.rel_type = value,
                            b"Target" => rel.target = value,
                            b"TargetMode" => rel.external = value.eq_ignore_ascii_case("external"),
                            _ => {}
                        }
                    }

                    if !rel.id.is_empty() {
                        rels.add(rel);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Turn a package-level relationship target into a part name.
    ///
    /// Targets of `_rels/.rels` are relative to the package root; a leading
    /// `/` is dropped and `.`/`..` segments are folded.
    pub fn resolve_package_target(target: &str) -> String {
        let mut segments: Vec<&str> = Vec::new();
        for segment in target.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                name => segments.push(name),
            }
        }
        segments.join("/")
    }
}

/// Find the content type of `part` in a `[Content_Types].xml` document.
fn content_type_from_xml(xml: &str, part: &str) -> Result<Option<String>> {
    let part_name = format!("/{}", part.trim_start_matches('/'));
    let extension = part_name.rsplit_once('.').map(|(_, ext)| ext);

    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut default_type: Option<String> = None;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                let kind = e.local_name();
                let mut key: Option<String> = None;
                let mut content_type: Option<String> = None;

                for attr in e.attributes().flatten() {
                    let value = attr
                        .unescape_value()
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
                    match attr.key.as_ref() {
                        b"PartName" | b"Extension" => key = Some(value),
                        b"ContentType" => content_type = Some(value),
                        _ => {}
                    }
                }

                match (kind.as_ref(), key, content_type) {
                    (b"Override", Some(name), Some(ct)) if name.eq_ignore_ascii_case(&part_name) => {
                        return Ok(Some(ct));
                    }
                    (b"Default", Some(ext), Some(ct))
                        if extension.is_some_and(|x| x.eq_ignore_ascii_case(&ext)) =>
                    {
                        default_type = Some(ct);
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(default_type)
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.list_files().len())
            .finish()
    }
}
