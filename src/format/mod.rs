//! Bullet formatting capture and replay.
//!
//! [`BulletFormatting`] is a snapshot of how an existing bullet looks: its
//! marker, separator, paragraph layout, run styling and native list
//! membership. The [`FormattingEngine`] trait extracts such snapshots from a
//! document and stamps them onto new paragraphs, so the mutator never needs
//! to know how a particular package encodes formatting.

mod cache;
pub mod marker;

pub use cache::FormattingCache;

use serde::{Deserialize, Serialize};

use crate::model::{Document, NumberingRef, Paragraph, ParagraphFormat, TextRun, TextStyle};
use marker::{GlyphSet, DEFAULT_MARKER, DEFAULT_SEPARATOR};

/// Captured style of a bullet paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletFormatting {
    /// Marker glyph ("•", "-", "1."); empty for native list items without one
    pub marker: String,

    /// Text between marker and content ("\t" or " ")
    pub separator: String,

    /// Paragraph layout
    pub paragraph_format: ParagraphFormat,

    /// Run styles in order; the first is the primary style
    pub run_styles: Vec<TextStyle>,

    /// Paragraph style id
    pub style: Option<String>,

    /// Native list membership
    pub list_format: ListFormat,
}

impl BulletFormatting {
    /// Plain formatting with the given marker and a tab separator.
    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            ..Default::default()
        }
    }

    /// Style of the first run, if any.
    pub fn primary_style(&self) -> Option<&TextStyle> {
        self.run_styles.first()
    }

    /// Check if the marker is a bare dash.
    pub fn is_dash(&self) -> bool {
        marker::is_dash_marker(&self.marker)
    }
}

impl Default for BulletFormatting {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            paragraph_format: ParagraphFormat::default(),
            run_styles: Vec::new(),
            style: None,
            list_format: ListFormat::default(),
        }
    }
}

/// Native list membership of a bullet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFormat {
    /// Whether the paragraph belongs to a native list
    pub is_list: bool,

    /// Indent level
    pub level: u8,

    /// Numbering instance id
    pub num_id: Option<u32>,
}

impl ListFormat {
    fn from_numbering(numbering: Option<&NumberingRef>) -> Self {
        match numbering {
            Some(n) => Self {
                is_list: true,
                level: n.level,
                num_id: Some(n.num_id),
            },
            None => Self::default(),
        }
    }

    fn to_numbering(self) -> Option<NumberingRef> {
        match (self.is_list, self.num_id) {
            (true, Some(id)) => Some(NumberingRef::new(id, self.level)),
            _ => None,
        }
    }
}

/// Extracts and applies bullet formatting.
pub trait FormattingEngine {
    /// Check if a paragraph reads as an existing bullet.
    fn is_bullet(&self, paragraph: &Paragraph) -> bool {
        let text = paragraph.text();
        let text = text.trim();
        !text.is_empty() && (paragraph.is_native_list() || marker::is_bullet_text(text))
    }

    /// Capture the formatting of the paragraph at `index`, or `None` if it is
    /// not a bullet.
    fn extract(&self, doc: &Document, index: usize) -> Option<BulletFormatting>;

    /// Make `paragraph` display `text` styled like `formatting`.
    ///
    /// Falls back to `fallback`, then to a `•` marker with a tab separator.
    /// Never fails.
    fn apply(
        &self,
        paragraph: &mut Paragraph,
        formatting: Option<&BulletFormatting>,
        text: &str,
        fallback: Option<&BulletFormatting>,
    );

    /// The most frequent marker in the whole document, if any.
    fn document_marker(&self, doc: &Document) -> Option<String>;
}

/// Default formatting engine over the document model.
#[derive(Debug, Clone, Default)]
pub struct BulletFormatter {
    glyphs: GlyphSet,
}

impl BulletFormatter {
    /// Create a formatter recognising the built-in glyphs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also recognise `glyphs` as bullet markers.
    pub fn with_glyphs(glyphs: impl IntoIterator<Item = char>) -> Self {
        Self {
            glyphs: GlyphSet::with_extra(glyphs),
        }
    }

    /// Formatting to use when no bullet in the document can be sampled.
    pub fn document_fallback(&self, doc: &Document) -> BulletFormatting {
        match self.document_marker(doc) {
            Some(marker) => BulletFormatting::with_marker(marker),
            None => BulletFormatting::default(),
        }
    }
}

impl FormattingEngine for BulletFormatter {
    fn is_bullet(&self, paragraph: &Paragraph) -> bool {
        let text = paragraph.text();
        let text = text.trim();
        !text.is_empty() && (paragraph.is_native_list() || self.glyphs.is_bullet_text(text))
    }

    fn extract(&self, doc: &Document, index: usize) -> Option<BulletFormatting> {
        let paragraph = doc.paragraph(index)?;
        let text = paragraph.text();
        let text = text.trim();
        let native = paragraph.is_native_list();

        if !native && !self.glyphs.is_bullet_text(text) {
            return None;
        }

        let marker = match self.glyphs.extract_marker(text) {
            Some(m) => m,
            None if native => String::new(),
            None => DEFAULT_MARKER.to_string(),
        };
        let separator = if marker.is_empty() {
            String::new()
        } else {
            marker::detect_separator(text, &marker).to_string()
        };

        Some(BulletFormatting {
            marker,
            separator,
            paragraph_format: paragraph.format.clone(),
            run_styles: paragraph.runs.iter().map(|r| r.style.clone()).collect(),
            style: paragraph.style.clone(),
            list_format: ListFormat::from_numbering(paragraph.numbering.as_ref()),
        })
    }

    fn apply(
        &self,
        paragraph: &mut Paragraph,
        formatting: Option<&BulletFormatting>,
        text: &str,
        fallback: Option<&BulletFormatting>,
    ) {
        let default = BulletFormatting::default();
        let formatting = match formatting.or(fallback) {
            Some(f) => f,
            None => {
                log::debug!("No bullet formatting available, using default marker");
                &default
            }
        };

        paragraph.clear();
        paragraph.style = formatting.style.clone();
        paragraph.format = formatting.paragraph_format.clone();
        paragraph.numbering = formatting.list_format.to_numbering();

        let content = self.glyphs.clean_text(text);
        let marker = formatting.marker.trim();
        let line = match (marker.is_empty(), paragraph.numbering.is_some()) {
            (true, true) => content,
            // A list template without its list: keep a visible marker.
            (true, false) => format!("{}{}{}", DEFAULT_MARKER, DEFAULT_SEPARATOR, content),
            (false, _) => format!(
                "{}{}{}",
                marker,
                separator_or_default(&formatting.separator),
                content
            ),
        };

        let style = formatting.primary_style().cloned().unwrap_or_default();
        paragraph.add_run(TextRun::styled(line, style));
    }

    fn document_marker(&self, doc: &Document) -> Option<String> {
        let mut counts: Vec<(String, usize)> = Vec::new();

        for paragraph in doc.paragraphs() {
            let text = paragraph.text();
            let Some(found) = self.glyphs.extract_marker(&text) else {
                continue;
            };
            // All numbered items count as one marker kind.
            let key = if found.starts_with(|c: char| c.is_ascii_digit()) {
                format!("1{}", &found[found.len() - 1..])
            } else {
                found
            };
            match counts.iter_mut().find(|(m, _)| *m == key) {
                Some((_, n)) => *n += 1,
                None => counts.push((key, 1)),
            }
        }

        let mut best: Option<&(String, usize)> = None;
        for entry in &counts {
            best = match best {
                None => Some(entry),
                Some(current) if entry.1 > current.1 => Some(entry),
                Some(current)
                    if entry.1 == current.1
                        && marker::is_dash_marker(&current.0)
                        && !marker::is_dash_marker(&entry.0) =>
                {
                    Some(entry)
                }
                keep => keep,
            };
        }

        best.map(|(m, _)| m.clone())
    }
}

fn separator_or_default(separator: &str) -> &str {
    if separator.is_empty() {
        DEFAULT_SEPARATOR
    } else {
        separator
    }
}
