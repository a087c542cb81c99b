//! Document-level types.

use super::Paragraph;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_document_id() -> u64 {
    NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed)
}

/// An editable document body.
///
/// The body is an ordered list of [`Block`]s. Only paragraph blocks are
/// addressable: a paragraph index counts paragraphs, skipping tables and
/// other opaque content. Inserting a paragraph shifts the index of every
/// later paragraph by one; there is no stable identity beyond position.
#[derive(Debug, Serialize, Deserialize)]
pub struct Document {
    blocks: Vec<Block>,

    #[serde(skip, default = "next_document_id")]
    id: u64,

    #[serde(skip)]
    revision: u64,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            id: next_document_id(),
            revision: 0,
        }
    }

    /// Create a document whose body is exactly the given paragraphs.
    pub fn from_paragraphs(paragraphs: impl IntoIterator<Item = Paragraph>) -> Self {
        let mut doc = Self::new();
        doc.blocks
            .extend(paragraphs.into_iter().map(Block::Paragraph));
        doc
    }

    /// Create a document with one unstyled paragraph per line of text.
    pub fn from_lines<S: AsRef<str>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self::from_paragraphs(lines.into_iter().map(|l| Paragraph::with_text(l.as_ref())))
    }

    /// Process-unique identity of this document instance.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Number of insertions performed since the document was created.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// All body blocks in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Append a block to the end of the body.
    pub fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Number of paragraphs in the body.
    pub fn paragraph_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Paragraph(_)))
            .count()
    }

    /// Check if the document has no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraph_count() == 0
    }

    /// Iterate over paragraphs in order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Opaque(_) => None,
        })
    }

    /// Get a paragraph by index.
    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs().nth(index)
    }

    /// Get a mutable paragraph by index.
    pub fn paragraph_mut(&mut self, index: usize) -> Option<&mut Paragraph> {
        self.blocks
            .iter_mut()
            .filter_map(|b| match b {
                Block::Paragraph(p) => Some(p),
                Block::Opaque(_) => None,
            })
            .nth(index)
    }

    /// Trimmed text of a paragraph, or an empty string when out of range.
    pub fn paragraph_text(&self, index: usize) -> String {
        self.paragraph(index)
            .map(|p| p.text().trim().to_string())
            .unwrap_or_default()
    }

    /// Insert a paragraph so that it ends up at `index`.
    ///
    /// `index < paragraph_count()` inserts immediately before the paragraph
    /// currently at `index`; `index == paragraph_count()` appends after the
    /// last paragraph, ahead of trailing section properties.
    pub fn insert_paragraph(&mut self, index: usize, paragraph: Paragraph) -> Result<()> {
        let count = self.paragraph_count();
        if index > count {
            return Err(Error::InsertOutOfRange(index, count));
        }

        let position = if index < count {
            self.block_position(index).unwrap_or(self.blocks.len())
        } else {
            self.append_position()
        };

        self.blocks.insert(position, Block::Paragraph(paragraph));
        self.revision += 1;
        Ok(())
    }

    /// Append a paragraph after the last one.
    pub fn append_paragraph(&mut self, paragraph: Paragraph) {
        let position = self.append_position();
        self.blocks.insert(position, Block::Paragraph(paragraph));
        self.revision += 1;
    }

    /// Plain text of all paragraphs, one per line.
    pub fn plain_text(&self) -> String {
        self.paragraphs()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn block_position(&self, paragraph_index: usize) -> Option<usize> {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| matches!(b, Block::Paragraph(_)))
            .nth(paragraph_index)
            .map(|(pos, _)| pos)
    }

    fn append_position(&self) -> usize {
        match self.blocks.last() {
            Some(Block::Opaque(o)) if o.is_section_properties() => self.blocks.len() - 1,
            _ => self.blocks.len(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Document {
    /// Clones get their own identity so cached state never crosses over.
    fn clone(&self) -> Self {
        Self {
            blocks: self.blocks.clone(),
            id: next_document_id(),
            revision: self.revision,
        }
    }
}

/// A body-level block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// An addressable paragraph
    Paragraph(Paragraph),

    /// Markup kept verbatim (tables, section properties, bookmarks, ...)
    Opaque(OpaqueBlock),
}

/// Body-level markup that is not a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpaqueBlock {
    /// Raw XML of the element
    pub xml: String,
}

impl OpaqueBlock {
    /// Wrap raw markup.
    pub fn new(xml: impl Into<String>) -> Self {
        Self { xml: xml.into() }
    }

    /// Check if this is the body's trailing `w:sectPr`.
    pub fn is_section_properties(&self) -> bool {
        self.xml.trim_start().starts_with("<w:sectPr")
    }
}
