//! Builders for in-memory `.docx` packages used by the tests.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::{ZipWriter, write::SimpleFileOptions};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

/// Wraps body content in a complete `word/document.xml`.
pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>{body}<w:sectPr/></w:body></w:document>"#
    )
}

/// Builds a `.docx` package block by block.
#[derive(Debug, Default)]
pub struct DocxBuilder {
    body: String,
    document: Option<String>,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A package whose document part is exactly `xml`.
    pub fn from_document_xml(xml: &str) -> Self {
        Self {
            body: String::new(),
            document: Some(xml.to_string()),
        }
    }

    pub fn paragraph(mut self, text: &str) -> Self {
        self.body.push_str(&paragraph_xml(text));
        self
    }

    pub fn table(mut self, rows: &[&[&str]]) -> Self {
        self.body.push_str("<w:tbl><w:tblPr/>");
        for row in rows {
            self.body.push_str("<w:tr>");
            for cell in *row {
                self.body.push_str("<w:tc>");
                self.body.push_str(&paragraph_xml(cell));
                self.body.push_str("</w:tc>");
            }
            self.body.push_str("</w:tr>");
        }
        self.body.push_str("</w:tbl>");
        self
    }

    pub fn build(self) -> Vec<u8> {
        let document = self
            .document
            .unwrap_or_else(|| document_xml(&self.body));
        package(Some(&document))
    }

    pub fn build_without_document(self) -> Vec<u8> {
        package(None)
    }
}

fn paragraph_xml(text: &str) -> String {
    if text.is_empty() {
        "<w:p/>".to_string()
    } else {
        format!(
            r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            escape(text)
        )
    }
}

fn package(document: Option<&str>) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(CONTENT_TYPES.as_bytes()).unwrap();

    if let Some(document) = document {
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(document.as_bytes()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}
