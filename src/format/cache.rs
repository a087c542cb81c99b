//! Memoized bullet formatting extraction.

use std::collections::HashMap;

use super::{BulletFormatting, FormattingEngine};
use crate::model::Document;

/// Cache of extracted formatting for one document state.
///
/// Entries are keyed by paragraph index and are only valid for the document
/// identity and revision they were extracted from. Looking up a different
/// document, or the same document after an insertion, clears the cache.
#[derive(Debug, Default)]
pub struct FormattingCache {
    owner: Option<(u64, u64)>,
    entries: HashMap<usize, Option<BulletFormatting>>,
    hits: usize,
    misses: usize,
}

impl FormattingCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the formatting of a paragraph, extracting it on a miss.
    pub fn get_or_extract<E: FormattingEngine + ?Sized>(
        &mut self,
        engine: &E,
        doc: &Document,
        index: usize,
    ) -> Option<BulletFormatting> {
        let owner = (doc.id(), doc.revision());
        if self.owner != Some(owner) {
            if self.owner.is_some() {
                log::debug!(
                    "Formatting cache invalidated ({} entries, {} hits)",
                    self.entries.len(),
                    self.hits
                );
            }
            self.entries.clear();
            self.owner = Some(owner);
        }

        if let Some(cached) = self.entries.get(&index) {
            self.hits += 1;
            return cached.clone();
        }

        self.misses += 1;
        let formatting = engine.extract(doc, index);
        self.entries.insert(index, formatting.clone());
        formatting
    }

    /// Number of cached paragraphs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Lookups that required extraction.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.owner = None;
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::BulletFormatter;
    use crate::model::Paragraph;

    #[test]
    fn test_cache_hits_same_revision() {
        let doc = Document::from_lines(["• one", "two"]);
        let engine = BulletFormatter::new();
        let mut cache = FormattingCache::new();

        assert!(cache.get_or_extract(&engine, &doc, 0).is_some());
        assert!(cache.get_or_extract(&engine, &doc, 0).is_some());
        assert!(cache.get_or_extract(&engine, &doc, 1).is_none());

        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_invalidated_by_insert() {
        let mut doc = Document::from_lines(["• one", "two"]);
        let engine = BulletFormatter::new();
        let mut cache = FormattingCache::new();

        assert!(cache.get_or_extract(&engine, &doc, 1).is_none());
        doc.insert_paragraph(0, Paragraph::with_text("- zero")).unwrap();

        // Index 1 now holds "• one".
        let formatting = cache.get_or_extract(&engine, &doc, 1).unwrap();
        assert_eq!(formatting.marker, "•");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_not_shared_between_documents() {
        let first = Document::from_lines(["• one"]);
        let second = Document::from_lines(["- one"]);
        let engine = BulletFormatter::new();
        let mut cache = FormattingCache::new();

        assert_eq!(cache.get_or_extract(&engine, &first, 0).unwrap().marker, "•");
        assert_eq!(cache.get_or_extract(&engine, &second, 0).unwrap().marker, "-");
        assert_eq!(cache.hits(), 0);
    }
}
