//! Resume text extraction for PDF and DOCX uploads.

use std::io::{Cursor, Read};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::processing::clean::unescape_entities;
use crate::resume::sections::{extract_sections, ResumeSections};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("failed to read PDF: {0}")]
    Pdf(String),

    #[error("failed to read DOCX: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Docx,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Pdf => "PDF",
            FileType::Docx => "DOCX",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            FileType::Pdf => "application/pdf",
            FileType::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// A fully parsed resume: raw text plus tokens and section split.
#[derive(Debug, Clone)]
pub struct ParsedResume {
    pub file_name: String,
    pub file_type: FileType,
    pub raw_text: String,
    pub tokens: Vec<String>,
    pub sections: ResumeSections,
}

/// Parses an uploaded resume, dispatching on the file extension.
pub fn parse_resume(file_name: &str, bytes: &[u8]) -> Result<ParsedResume, ParseError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    let (raw_text, file_type) = match extension.as_str() {
        "pdf" => (parse_pdf(bytes)?, FileType::Pdf),
        "docx" => (parse_docx(bytes)?, FileType::Docx),
        other => return Err(ParseError::Unsupported(format!(".{other}"))),
    };

    let tokens = tokenize_text(&raw_text);
    let sections = extract_sections(&raw_text);

    Ok(ParsedResume {
        file_name: file_name.to_string(),
        file_type,
        raw_text,
        tokens,
        sections,
    })
}

/// Extracts text from a PDF in memory.
pub fn parse_pdf(bytes: &[u8]) -> Result<String, ParseError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ParseError::Pdf(e.to_string()))
}

/// Extracts text from a DOCX file by reading `word/document.xml` out of the
/// zip container and concatenating the text runs. Paragraph ends become
/// newlines so downstream heading detection sees real lines.
pub fn parse_docx(bytes: &[u8]) -> Result<String, ParseError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ParseError::Docx(format!("not a zip container: {e}")))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ParseError::Docx(format!("missing word/document.xml: {e}")))?
        .read_to_string(&mut document_xml)
        .map_err(|e| ParseError::Docx(e.to_string()))?;

    Ok(extract_docx_text(&document_xml))
}

fn paragraph_end_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</w:p>").unwrap())
}

fn xml_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

fn text_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<w:t[^>]*>(.*?)</w:t>").unwrap())
}

/// Turns WordprocessingML into plain text: keep `<w:t>` run contents, keep
/// paragraph boundaries, drop everything else.
fn extract_docx_text(document_xml: &str) -> String {
    let mut text = String::new();
    for paragraph in paragraph_end_regex().split(document_xml) {
        let mut line = String::new();
        for run in text_run_regex().captures_iter(paragraph) {
            line.push_str(&run[1]);
        }
        // Runs can still carry stray markup when the XML is malformed.
        let line = xml_tag_regex().replace_all(&line, "");
        let line = unescape_entities(&line);
        if !line.trim().is_empty() {
            text.push_str(line.trim_end());
            text.push('\n');
        }
    }
    text
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z0-9]+").unwrap())
}

/// Basic tokenizer: alphanumeric runs, everything else is a separator.
pub fn tokenize_text(text: &str) -> Vec<String> {
    token_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DOCX_XML: &str = r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>EDUCATION</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">BSc Computer Science, </w:t></w:r><w:r><w:t>2019</w:t></w:r></w:p>
    <w:p><w:r><w:t>Skills &amp; Tools</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn test_tokenize_text_splits_on_non_alphanumeric() {
        let tokens = tokenize_text("C++/Rust, SQL (Postgres) - 5 years!");
        assert_eq!(tokens, vec!["C", "Rust", "SQL", "Postgres", "5", "years"]);
    }

    #[test]
    fn test_tokenize_text_empty_input() {
        assert!(tokenize_text("  \n\t ").is_empty());
    }

    #[test]
    fn test_extract_docx_text_joins_runs_and_keeps_paragraphs() {
        let text = extract_docx_text(SAMPLE_DOCX_XML);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["EDUCATION", "BSc Computer Science, 2019", "Skills & Tools"]
        );
    }

    #[test]
    fn test_parse_docx_from_zip_container() {
        use std::io::Write;
        let mut zip_bytes = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(Cursor::new(&mut zip_bytes));
            writer
                .start_file("word/document.xml", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(SAMPLE_DOCX_XML.as_bytes()).unwrap();
            writer.finish().unwrap();
        }

        let text = parse_docx(&zip_bytes).unwrap();
        assert!(text.contains("BSc Computer Science, 2019"));
    }

    #[test]
    fn test_parse_docx_rejects_non_zip() {
        assert!(matches!(
            parse_docx(b"definitely not a zip"),
            Err(ParseError::Docx(_))
        ));
    }

    #[test]
    fn test_parse_resume_rejects_unknown_extension() {
        let err = parse_resume("resume.txt", b"plain text").unwrap_err();
        assert!(matches!(err, ParseError::Unsupported(ext) if ext == ".txt"));
    }

    #[test]
    fn test_parse_resume_rejects_missing_extension() {
        assert!(matches!(
            parse_resume("resume", b""),
            Err(ParseError::Unsupported(_))
        ));
    }
}
