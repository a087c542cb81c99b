//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

pub const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

pub const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;

/// Plain paragraph.
pub fn p(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, text)
}

/// Indented bullet paragraph with a styled run.
pub fn bullet(marker: &str, text: &str) -> String {
    format!(
        concat!(
            r#"<w:p><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr>"#,
            r#"<w:r><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri"/><w:sz w:val="22"/></w:rPr>"#,
            r#"<w:t xml:space="preserve">{} {}</w:t></w:r></w:p>"#
        ),
        marker, text
    )
}

/// Native list paragraph without a typed glyph.
pub fn list_item(text: &str, num_id: u32) -> String {
    format!(
        concat!(
            r#"<w:p><w:pPr><w:pStyle w:val="ListParagraph"/><w:numPr><w:ilvl w:val="0"/><w:numId w:val="{}"/></w:numPr></w:pPr>"#,
            r#"<w:r><w:t>{}</w:t></w:r></w:p>"#
        ),
        num_id, text
    )
}

/// Wrap body paragraphs into a main document part.
pub fn document_xml(paragraphs: &[String]) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}"#,
            r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr></w:body></w:document>"#
        ),
        paragraphs.concat()
    )
}

/// Build a complete package from body paragraphs.
pub fn build_docx(paragraphs: &[String]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let entries = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", RELS.to_string()),
        ("word/document.xml", document_xml(paragraphs)),
        ("word/styles.xml", STYLES.to_string()),
    ];
    for (name, body) in entries {
        zip.start_file(name, SimpleFileOptions::default()).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// Read one entry of a package as text.
pub fn read_entry(package: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(package)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    text
}

/// A two-project resume with dash bullets.
pub fn sample_resume() -> Vec<String> {
    vec![
        p("Jane Doe"),
        p("Acme Corp | Jan 2020 - Present"),
        p("E-commerce Platform"),
        p("Responsibilities:"),
        bullet("-", "Built the checkout flow"),
        bullet("-", "Tuned database queries"),
        p(""),
        p("Globex | 2018 - 2019"),
        p("Inventory System"),
        p("Responsibilities:"),
        bullet("-", "Wrote nightly reports"),
    ]
}
