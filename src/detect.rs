//! Format detection for Word documents.

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE2 compound file magic bytes.
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Main-part content types of WordprocessingML packages.
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const DOCM_CONTENT_TYPE: &str = "application/vnd.ms-word.document.macroEnabled.main+xml";
const DOTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml";
const DOTM_CONTENT_TYPE: &str = "application/vnd.ms-word.template.macroEnabledTemplate.main+xml";

/// Detected Word package flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Word document (.docx)
    Document,
    /// Macro-enabled Word document (.docm)
    MacroEnabled,
    /// Word template (.dotx)
    Template,
    /// Macro-enabled Word template (.dotm)
    MacroEnabledTemplate,
}

impl FormatType {
    /// Map a main-part content type to a format, if it is a Word one.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type.trim() {
            DOCX_CONTENT_TYPE => Some(FormatType::Document),
            DOCM_CONTENT_TYPE => Some(FormatType::MacroEnabled),
            DOTX_CONTENT_TYPE => Some(FormatType::Template),
            DOTM_CONTENT_TYPE => Some(FormatType::MacroEnabledTemplate),
            _ => None,
        }
    }

    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            FormatType::Document => "Word Document",
            FormatType::MacroEnabled => "Word Macro-Enabled Document",
            FormatType::Template => "Word Template",
            FormatType::MacroEnabledTemplate => "Word Macro-Enabled Template",
        }
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Reject inputs that cannot be a Word package before opening them.
///
/// OLE2 compound files are either password-protected packages or legacy
/// binary `.doc` files and are reported as such.
pub fn check_signature(data: &[u8]) -> Result<()> {
    if data.starts_with(&OLE_MAGIC) {
        return Err(classify_compound_file(data));
    }

    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }

    Ok(())
}

/// Detect the format type from a byte slice.
///
/// # Example
///
/// ```no_run
/// use docdump::detect::detect_format_from_bytes;
///
/// let data = std::fs::read("document.docx")?;
/// println!("Detected format: {}", detect_format_from_bytes(&data)?);
/// # Ok::<(), docdump::Error>(())
/// ```
pub fn detect_format_from_bytes(data: &[u8]) -> Result<FormatType> {
    check_signature(data)?;
    let container = OoxmlContainer::from_bytes(data.to_vec())?;
    detect_format_from_container(&container)
}

/// Detect the format of an opened package from its main part's content type.
pub fn detect_format_from_container(container: &OoxmlContainer) -> Result<FormatType> {
    let main_part = container.main_document_part()?;

    let content_type = container
        .content_type_of(&main_part)?
        .ok_or_else(|| Error::MissingComponent(format!("content type of /{}", main_part)))?;

    FormatType::from_content_type(&content_type)
        .ok_or_else(|| Error::UnsupportedFormat(format!("not a Word package ({})", content_type)))
}

/// Tell a password-protected package apart from a legacy `.doc`.
fn classify_compound_file(data: &[u8]) -> Error {
    let marker: Vec<u8> = "EncryptedPackage"
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();

    if data.windows(marker.len()).any(|w| w == marker.as_slice()) {
        Error::Encrypted
    } else {
        Error::UnsupportedFormat("legacy binary Word document (.doc)".to_string())
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.starts_with(&ZIP_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_package(main_content_type: &str) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options).unwrap();
        write!(
            zip,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/main.xml" ContentType="{}"/>
</Types>"#,
            main_content_type
        )
        .unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/main.xml"/>
</Relationships>"#,
        )
        .unwrap();

        zip.finish().unwrap();
        buffer
    }

    #[test]
    fn test_format_type_display() {
        assert_eq!(FormatType::Document.to_string(), "Word Document");
        assert_eq!(FormatType::Template.to_string(), "Word Template");
    }

    #[test]
    fn test_is_zip_file() {
        assert!(is_zip_file(&[0x50, 0x4B, 0x03, 0x04, 0x00]));
        assert!(!is_zip_file(&[0x00, 0x00, 0x00, 0x00]));
        assert!(!is_zip_file(&[0x50, 0x4B]));
    }

    #[test]
    fn test_detect_invalid_data() {
        let result = detect_format_from_bytes(&[0x00, 0x00, 0x00, 0x00]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_word_flavours() {
        assert_eq!(
            detect_format_from_bytes(&build_package(DOCX_CONTENT_TYPE)).unwrap(),
            FormatType::Document
        );
        assert_eq!(
            detect_format_from_bytes(&build_package(DOCM_CONTENT_TYPE)).unwrap(),
            FormatType::MacroEnabled
        );
        assert_eq!(
            detect_format_from_bytes(&build_package(DOTX_CONTENT_TYPE)).unwrap(),
            FormatType::Template
        );
        assert_eq!(
            detect_format_from_bytes(&build_package(DOTM_CONTENT_TYPE)).unwrap(),
            FormatType::MacroEnabledTemplate
        );
    }

    #[test]
    fn test_detect_spreadsheet_rejected() {
        let data = build_package(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml",
        );
        let result = detect_format_from_bytes(&data);
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_detect_compound_files() {
        let mut legacy = OLE_MAGIC.to_vec();
        legacy.extend_from_slice(&[0u8; 64]);
        assert!(matches!(
            detect_format_from_bytes(&legacy),
            Err(Error::UnsupportedFormat(_))
        ));

        let mut encrypted = OLE_MAGIC.to_vec();
        encrypted.extend("EncryptedPackage".encode_utf16().flat_map(u16::to_le_bytes));
        assert!(matches!(
            detect_format_from_bytes(&encrypted),
            Err(Error::Encrypted)
        ));
    }

    #[test]
    fn test_external_main_relationship_falls_back() {
        let mut buffer = Vec::new();
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options).unwrap();
        write!(
            zip,
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="{}"/>
</Types>"#,
            DOCX_CONTENT_TYPE
        )
        .unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(
            br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="https://example.com/remote.xml" TargetMode="External"/>
</Relationships>"#,
        )
        .unwrap();
        zip.finish().unwrap();

        assert_eq!(
            detect_format_from_bytes(&buffer).unwrap(),
            FormatType::Document
        );
    }

    #[test]
    fn test_escaped_relationship_target() {
        let mut buffer = Vec::new();
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options).unwrap();
        write!(
            zip,
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Override PartName="/word/R&amp;D.xml" ContentType="{}"/>
</Types>"#,
            DOCX_CONTENT_TYPE
        )
        .unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(
            br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://purl.oclc.org/ooxml/officeDocument/relationships/officeDocument" Target="/word/R&amp;D.xml"/>
</Relationships>"#,
        )
        .unwrap();
        zip.finish().unwrap();

        let container = OoxmlContainer::from_bytes(buffer).unwrap();
        assert_eq!(container.main_document_part().unwrap(), "word/R&D.xml");
        assert_eq!(
            detect_format_from_container(&container).unwrap(),
            FormatType::Document
        );
    }
}
