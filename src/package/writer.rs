//! Markup writer for the main document part.
//!
//! Paragraphs that still carry their original markup are written verbatim.
//! New or edited paragraphs are generated from the model, emitting only the
//! properties that are set, in schema order.

use quick_xml::escape::escape;

use super::reader::BodyFrame;
use crate::model::{Block, Paragraph, ParagraphFormat, TextRun, TextStyle};

/// Reassemble the main document part.
pub(crate) fn write_document(frame: &BodyFrame, blocks: &[Block]) -> String {
    let mut out = String::with_capacity(frame.prefix.len() + frame.suffix.len() + blocks.len() * 256);
    out.push_str(&frame.prefix);
    for block in blocks {
        match block {
            Block::Paragraph(p) => out.push_str(&write_paragraph(p)),
            Block::Opaque(o) => out.push_str(&o.xml),
        }
    }
    out.push_str(&frame.suffix);
    out
}

/// Serialize a paragraph, reusing its original markup when present.
pub(crate) fn write_paragraph(paragraph: &Paragraph) -> String {
    if let Some(source) = paragraph.source() {
        return source.to_string();
    }

    let mut out = String::from("<w:p>");
    let ppr = paragraph_properties(paragraph);
    if !ppr.is_empty() {
        out.push_str("<w:pPr>");
        out.push_str(&ppr);
        out.push_str("</w:pPr>");
    }
    for run in &paragraph.runs {
        write_run(&mut out, run);
    }
    out.push_str("</w:p>");
    out
}

fn paragraph_properties(paragraph: &Paragraph) -> String {
    let mut out = String::new();
    let format = &paragraph.format;

    if let Some(style) = &paragraph.style {
        out.push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, escape(style.as_str())));
    }
    push_toggle(&mut out, "w:keepNext", format.keep_with_next);
    push_toggle(&mut out, "w:keepLines", format.keep_together);
    push_toggle(&mut out, "w:pageBreakBefore", format.page_break_before);
    push_toggle(&mut out, "w:widowControl", format.widow_control);
    if let Some(numbering) = &paragraph.numbering {
        out.push_str(&format!(
            r#"<w:numPr><w:ilvl w:val="{}"/><w:numId w:val="{}"/></w:numPr>"#,
            numbering.level, numbering.num_id
        ));
    }
    push_spacing(&mut out, format);
    push_indent(&mut out, format);
    if let Some(alignment) = format.alignment {
        out.push_str(&format!(r#"<w:jc w:val="{}"/>"#, alignment.as_jc()));
    }
    out
}

fn push_spacing(out: &mut String, format: &ParagraphFormat) {
    let mut attrs = String::new();
    if let Some(v) = format.space_before {
        attrs.push_str(&format!(r#" w:before="{}""#, v));
    }
    if let Some(v) = format.space_after {
        attrs.push_str(&format!(r#" w:after="{}""#, v));
    }
    if let Some(v) = format.line_spacing {
        attrs.push_str(&format!(r#" w:line="{}""#, v));
    }
    if let Some(rule) = &format.line_rule {
        attrs.push_str(&format!(r#" w:lineRule="{}""#, escape(rule.as_str())));
    }
    if !attrs.is_empty() {
        out.push_str(&format!("<w:spacing{}/>", attrs));
    }
}

fn push_indent(out: &mut String, format: &ParagraphFormat) {
    let mut attrs = String::new();
    if let Some(v) = format.left_indent {
        attrs.push_str(&format!(r#" w:left="{}""#, v));
    }
    if let Some(v) = format.right_indent {
        attrs.push_str(&format!(r#" w:right="{}""#, v));
    }
    match format.first_line_indent {
        Some(v) if v < 0 => attrs.push_str(&format!(r#" w:hanging="{}""#, -v)),
        Some(v) => attrs.push_str(&format!(r#" w:firstLine="{}""#, v)),
        None => {}
    }
    if !attrs.is_empty() {
        out.push_str(&format!("<w:ind{}/>", attrs));
    }
}

fn push_toggle(out: &mut String, name: &str, value: Option<bool>) {
    match value {
        Some(true) => out.push_str(&format!("<{}/>", name)),
        Some(false) => out.push_str(&format!(r#"<{} w:val="0"/>"#, name)),
        None => {}
    }
}

fn write_run(out: &mut String, run: &TextRun) {
    out.push_str("<w:r>");
    let rpr = run_properties(&run.style);
    if !rpr.is_empty() {
        out.push_str("<w:rPr>");
        out.push_str(&rpr);
        out.push_str("</w:rPr>");
    }

    // Tabs and breaks are elements of their own, not text.
    let mut pending = String::new();
    for ch in run.text.chars() {
        match ch {
            '\t' | '\n' => {
                flush_text(out, &mut pending);
                out.push_str(if ch == '\t' { "<w:tab/>" } else { "<w:br/>" });
            }
            _ => pending.push(ch),
        }
    }
    flush_text(out, &mut pending);
    out.push_str("</w:r>");
}

fn flush_text(out: &mut String, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    out.push_str(r#"<w:t xml:space="preserve">"#);
    out.push_str(&escape(pending.as_str()));
    out.push_str("</w:t>");
    pending.clear();
}

fn run_properties(style: &TextStyle) -> String {
    let mut out = String::new();

    if let Some(font) = &style.font_name {
        let font = escape(font.as_str());
        out.push_str(&format!(
            r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:cs="{0}"/>"#,
            font
        ));
    }
    push_toggle(&mut out, "w:b", style.bold);
    push_toggle(&mut out, "w:i", style.italic);
    push_toggle(&mut out, "w:caps", style.all_caps);
    push_toggle(&mut out, "w:smallCaps", style.small_caps);
    push_toggle(&mut out, "w:strike", style.strike);
    if let Some(color) = &style.color {
        out.push_str(&format!(r#"<w:color w:val="{}"/>"#, escape(color.as_str())));
    }
    if let Some(size) = style.font_size {
        let half_points = (size * 2.0).round() as u32;
        out.push_str(&format!(
            r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#,
            half_points
        ));
    }
    if let Some(highlight) = &style.highlight {
        out.push_str(&format!(r#"<w:highlight w:val="{}"/>"#, escape(highlight.as_str())));
    }
    if let Some(underline) = &style.underline {
        out.push_str(&format!(r#"<w:u w:val="{}"/>"#, escape(underline.as_str())));
    }
    out
}
