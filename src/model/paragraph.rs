//! Paragraph and run-level types.

use serde::{Deserialize, Serialize};

/// A body paragraph.
///
/// Paragraphs read from a package keep their original markup and are written
/// back verbatim. Editing the public fields of such a paragraph does not touch
/// that markup; call [`Paragraph::detach_source`] (or use one of the mutating
/// helpers, which do it for you) so the edited model is serialized instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Styled text runs in order
    pub runs: Vec<TextRun>,

    /// Paragraph-level formatting
    pub format: ParagraphFormat,

    /// Paragraph style id (e.g. "ListParagraph")
    pub style: Option<String>,

    /// Native list membership, meaningful only inside the owning document
    pub numbering: Option<NumberingRef>,

    #[serde(skip)]
    source: Option<String>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with a single unstyled run.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_text(text);
        p
    }

    /// Create a paragraph that remembers the markup it was parsed from.
    pub(crate) fn with_source(mut self, xml: impl Into<String>) -> Self {
        self.source = Some(xml.into());
        self
    }

    /// Original markup, if the paragraph is unmodified since loading.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Forget the original markup so the model is serialized instead.
    pub fn detach_source(&mut self) {
        self.source = None;
    }

    /// Add plain text to the paragraph.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.add_run(TextRun::new(text));
    }

    /// Add a styled text run.
    pub fn add_run(&mut self, run: TextRun) {
        self.detach_source();
        self.runs.push(run);
    }

    /// Remove all runs, keeping paragraph formatting.
    pub fn clear(&mut self) {
        self.detach_source();
        self.runs.clear();
    }

    /// Concatenated run text. Tabs appear as `\t`, breaks as `\n`.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }

    /// Check if the paragraph belongs to a native numbered/bulleted list.
    pub fn is_native_list(&self) -> bool {
        self.numbering.is_some()
    }
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Run styling
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a text run with the given style.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Run styling properties.
///
/// `None` means "inherit from the paragraph/document style", which is not the
/// same as an explicit `Some(false)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font name (ASCII slot)
    pub font_name: Option<String>,

    /// Font size in points
    pub font_size: Option<f32>,

    /// Bold text
    pub bold: Option<bool>,

    /// Italic text
    pub italic: Option<bool>,

    /// Underline kind as written in the document (e.g. "single", "none")
    pub underline: Option<String>,

    /// Strikethrough text
    pub strike: Option<bool>,

    /// Small capitals
    pub small_caps: Option<bool>,

    /// All capitals
    pub all_caps: Option<bool>,

    /// Text color as hex RGB without `#` (e.g. "1F3864")
    pub color: Option<String>,

    /// Highlight color name (e.g. "yellow")
    pub highlight: Option<String>,
}

impl TextStyle {
    /// Check if any property is set explicitly.
    pub fn has_styling(&self) -> bool {
        *self != TextStyle::default()
    }
}

/// Paragraph formatting properties.
///
/// Lengths are in twentieths of a point (twips), the unit the package stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphFormat {
    /// Text alignment
    pub alignment: Option<Alignment>,

    /// Space before the paragraph (twips)
    pub space_before: Option<u32>,

    /// Space after the paragraph (twips)
    pub space_after: Option<u32>,

    /// Line spacing value as stored (240 = single when the rule is "auto")
    pub line_spacing: Option<u32>,

    /// Line spacing rule ("auto", "exact", "atLeast")
    pub line_rule: Option<String>,

    /// Left indent (twips)
    pub left_indent: Option<i32>,

    /// Right indent (twips)
    pub right_indent: Option<i32>,

    /// First-line indent (twips); negative for a hanging indent
    pub first_line_indent: Option<i32>,

    /// Widow/orphan control
    pub widow_control: Option<bool>,

    /// Keep with next paragraph
    pub keep_with_next: Option<bool>,

    /// Keep lines together
    pub keep_together: Option<bool>,

    /// Start on a new page
    pub page_break_before: Option<bool>,
}

impl ParagraphFormat {
    /// Check if no property is set.
    pub fn is_empty(&self) -> bool {
        *self == ParagraphFormat::default()
    }
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

impl Alignment {
    /// Parse a `w:jc` value.
    pub fn from_jc(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "both" | "distribute" => Some(Alignment::Justify),
            _ => None,
        }
    }

    /// The `w:jc` value for this alignment.
    pub fn as_jc(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}

/// Reference into the document's numbering definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberingRef {
    /// Numbering instance id (`w:numId`)
    pub num_id: u32,

    /// Indent level (`w:ilvl`, 0 = top level)
    pub level: u8,
}

impl NumberingRef {
    /// Create a numbering reference.
    pub fn new(num_id: u32, level: u8) -> Self {
        Self { num_id, level }
    }
}
