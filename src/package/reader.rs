//! Markup reader for the main document part.
//!
//! The body is split into its direct children. Paragraphs are parsed into the
//! model and keep their original markup; everything else becomes an opaque
//! block. The markup before and after the body children is kept as a frame so
//! the part can be reassembled without touching anything the engine does not
//! edit.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::{
    Alignment, Block, NumberingRef, OpaqueBlock, Paragraph, ParagraphFormat, TextRun, TextStyle,
};

/// Elements whose content is not part of the paragraph's own text.
const SKIPPED_ELEMENTS: &[&[u8]] = &[
    b"w:drawing",
    b"w:pict",
    b"w:object",
    b"mc:AlternateContent",
    b"w:txbxContent",
];

/// Markup surrounding the body children.
#[derive(Debug, Clone, Default)]
pub(crate) struct BodyFrame {
    /// Everything up to and including `<w:body>`
    pub prefix: String,
    /// Everything from `</w:body>` on
    pub suffix: String,
}

/// Split the main document part into a frame and body blocks.
pub(crate) fn split_body(xml: &str) -> Result<(BodyFrame, Vec<Block>)> {
    let mut reader = Reader::from_str(xml);

    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    let mut content_start: Option<usize> = None;
    let mut content_end: Option<usize> = None;
    let mut child: Option<(usize, bool)> = None;
    let mut blocks = Vec::new();

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let after = reader.buffer_position() as usize;

        match event {
            Event::Start(e) => {
                depth += 1;
                match body_depth {
                    None if e.name().as_ref() == b"w:body" => {
                        body_depth = Some(depth);
                        content_start = Some(after);
                    }
                    Some(bd) if depth == bd + 1 && content_end.is_none() => {
                        child = Some((before, e.name().as_ref() == b"w:p"));
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if body_depth == Some(depth) && content_end.is_none() {
                    let is_paragraph = e.name().as_ref() == b"w:p";
                    blocks.push(make_block(&xml[before..after], is_paragraph)?);
                }
            }
            Event::End(_) => {
                if let Some(bd) = body_depth {
                    if depth == bd + 1 {
                        if let Some((start, is_paragraph)) = child.take() {
                            blocks.push(make_block(&xml[start..after], is_paragraph)?);
                        }
                    } else if depth == bd && content_end.is_none() {
                        content_end = Some(before);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match (content_start, content_end) {
        (Some(start), Some(end)) => Ok((
            BodyFrame {
                prefix: xml[..start].to_string(),
                suffix: xml[end..].to_string(),
            },
            blocks,
        )),
        _ => Err(Error::Xml("document part has no w:body element".into())),
    }
}

fn make_block(xml: &str, is_paragraph: bool) -> Result<Block> {
    if is_paragraph {
        Ok(Block::Paragraph(parse_paragraph(xml)?))
    } else {
        Ok(Block::Opaque(OpaqueBlock::new(xml)))
    }
}

/// Parse a single `w:p` element into the model.
pub(crate) fn parse_paragraph(xml: &str) -> Result<Paragraph> {
    let mut reader = Reader::from_str(xml);

    let mut paragraph = Paragraph::new();
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut skip_depth: Option<usize> = None;
    let mut run: Option<TextRun> = None;
    let mut num_id: Option<u32> = None;
    let mut num_level: u8 = 0;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                if skip_depth.is_none() {
                    if SKIPPED_ELEMENTS.contains(&name.as_slice()) {
                        skip_depth = Some(path.len());
                    } else {
                        if name == b"w:r" {
                            run = Some(TextRun::default());
                        }
                        apply_element(&e, &path, &mut paragraph, &mut run, &mut num_id, &mut num_level);
                    }
                }
                path.push(name);
            }
            Event::Empty(e) => {
                if skip_depth.is_none() {
                    apply_element(&e, &path, &mut paragraph, &mut run, &mut num_id, &mut num_level);
                }
            }
            Event::Text(t) => {
                if skip_depth.is_none() && path.last().map(Vec::as_slice) == Some(b"w:t") {
                    if let Some(run) = run.as_mut() {
                        let text = t.unescape()?;
                        run.text.push_str(&text);
                    }
                }
            }
            Event::End(e) => {
                path.pop();
                if skip_depth == Some(path.len()) {
                    skip_depth = None;
                } else if skip_depth.is_none() && e.name().as_ref() == b"w:r" {
                    if let Some(finished) = run.take() {
                        paragraph.runs.push(finished);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    paragraph.numbering = match num_id {
        Some(id) if id != 0 => Some(NumberingRef::new(id, num_level)),
        _ => None,
    };

    Ok(paragraph.with_source(xml))
}

fn apply_element(
    e: &BytesStart<'_>,
    path: &[Vec<u8>],
    paragraph: &mut Paragraph,
    run: &mut Option<TextRun>,
    num_id: &mut Option<u32>,
    num_level: &mut u8,
) {
    let parent = path.last().map(Vec::as_slice);
    let name = e.name();
    let name = name.as_ref();

    match parent {
        Some(b"w:pPr") => apply_paragraph_property(e, name, &mut paragraph.format, &mut paragraph.style),
        Some(b"w:numPr") => match name {
            b"w:numId" => *num_id = attr(e, b"w:val").and_then(|v| v.parse().ok()),
            b"w:ilvl" => *num_level = attr(e, b"w:val").and_then(|v| v.parse().ok()).unwrap_or(0),
            _ => {}
        },
        Some(b"w:rPr") => {
            if let Some(run) = run.as_mut() {
                apply_run_property(e, name, &mut run.style);
            }
        }
        Some(b"w:r") => {
            if let Some(run) = run.as_mut() {
                match name {
                    b"w:tab" => run.text.push('\t'),
                    b"w:br" | b"w:cr" => run.text.push('\n'),
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

fn apply_paragraph_property(
    e: &BytesStart<'_>,
    name: &[u8],
    format: &mut ParagraphFormat,
    style: &mut Option<String>,
) {
    match name {
        b"w:pStyle" => *style = attr(e, b"w:val"),
        b"w:jc" => format.alignment = attr(e, b"w:val").and_then(|v| Alignment::from_jc(&v)),
        b"w:spacing" => {
            format.space_before = attr_num(e, b"w:before");
            format.space_after = attr_num(e, b"w:after");
            format.line_spacing = attr_num(e, b"w:line");
            format.line_rule = attr(e, b"w:lineRule");
        }
        b"w:ind" => {
            format.left_indent = attr_num(e, b"w:left").or_else(|| attr_num(e, b"w:start"));
            format.right_indent = attr_num(e, b"w:right").or_else(|| attr_num(e, b"w:end"));
            format.first_line_indent = match attr_num::<i32>(e, b"w:hanging") {
                Some(hanging) => Some(-hanging),
                None => attr_num(e, b"w:firstLine"),
            };
        }
        b"w:widowControl" => format.widow_control = Some(toggle(e)),
        b"w:keepNext" => format.keep_with_next = Some(toggle(e)),
        b"w:keepLines" => format.keep_together = Some(toggle(e)),
        b"w:pageBreakBefore" => format.page_break_before = Some(toggle(e)),
        _ => {}
    }
}

fn apply_run_property(e: &BytesStart<'_>, name: &[u8], style: &mut TextStyle) {
    match name {
        b"w:rFonts" => style.font_name = attr(e, b"w:ascii").or_else(|| attr(e, b"w:hAnsi")),
        b"w:sz" => style.font_size = attr_num::<u32>(e, b"w:val").map(|half| half as f32 / 2.0),
        b"w:b" => style.bold = Some(toggle(e)),
        b"w:i" => style.italic = Some(toggle(e)),
        b"w:u" => style.underline = attr(e, b"w:val"),
        b"w:strike" => style.strike = Some(toggle(e)),
        b"w:smallCaps" => style.small_caps = Some(toggle(e)),
        b"w:caps" => style.all_caps = Some(toggle(e)),
        b"w:color" => style.color = attr(e, b"w:val").filter(|v| v != "auto"),
        b"w:highlight" => style.highlight = attr(e, b"w:val"),
        _ => {}
    }
}

/// Read an attribute value by qualified name.
pub(crate) fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn attr_num<T: std::str::FromStr>(e: &BytesStart<'_>, key: &[u8]) -> Option<T> {
    attr(e, key).and_then(|v| v.trim().parse().ok())
}

/// On/off properties are on unless `w:val` says otherwise.
fn toggle(e: &BytesStart<'_>) -> bool {
    !matches!(
        attr(e, b"w:val").as_deref(),
        Some("0") | Some("false") | Some("off")
    )
}
