//! Inserting distributed points into the document.
//!
//! Project positions are detected once, before any insertion. Every inserted
//! paragraph shifts all later paragraphs down by one, so the mutator walks
//! projects in ascending position order and translates each detected index
//! through an [`OffsetLedger`] before using it.

use crate::distribute::{DistributionResult, ProjectAllocation};
use crate::format::{BulletFormatter, BulletFormatting, FormattingCache, FormattingEngine};
use crate::model::{Document, Paragraph};

/// Paragraphs inserted so far, used to translate detected indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OffsetLedger {
    inserted: usize,
}

impl OffsetLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position of a paragraph detected at `index` before any
    /// insertion. Only valid for indices at or after every insertion point
    /// recorded so far.
    pub fn translate(&self, index: usize) -> usize {
        index + self.inserted
    }

    /// Record `count` inserted paragraphs.
    pub fn record(&mut self, count: usize) {
        self.inserted += count;
    }

    /// Total paragraphs inserted.
    pub fn inserted(&self) -> usize {
        self.inserted
    }
}

/// Inserts allocated points next to each project's existing bullets.
#[derive(Debug, Clone)]
pub struct DocumentMutator<E: FormattingEngine = BulletFormatter> {
    engine: E,
    window: usize,
}

impl DocumentMutator {
    /// Create a mutator with the default formatting engine.
    pub fn new() -> Self {
        Self::with_engine(BulletFormatter::new())
    }
}

impl Default for DocumentMutator {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: FormattingEngine> DocumentMutator<E> {
    /// Create a mutator with a custom formatting engine.
    pub fn with_engine(engine: E) -> Self {
        Self { engine, window: 5 }
    }

    /// Set how many paragraphs around a project are sampled for formatting.
    pub fn with_window(mut self, paragraphs: usize) -> Self {
        self.window = paragraphs;
        self
    }

    /// Insert every allocated point and return how many were added.
    ///
    /// A point whose insertion fails is logged and skipped; the rest still
    /// go in.
    pub fn mutate(&self, doc: &mut Document, distribution: &DistributionResult) -> usize {
        let mut allocations: Vec<&ProjectAllocation> = distribution.projects.iter().collect();
        allocations.sort_by_key(|a| a.insertion_point);

        let mut ledger = OffsetLedger::new();
        let mut cache = FormattingCache::new();

        for allocation in allocations {
            let added = self.add_points(doc, allocation, &ledger, &mut cache);
            ledger.record(added);
        }

        log::info!("Added {} points to document", ledger.inserted());
        ledger.inserted()
    }

    fn add_points(
        &self,
        doc: &mut Document,
        allocation: &ProjectAllocation,
        ledger: &OffsetLedger,
        cache: &mut FormattingCache,
    ) -> usize {
        let insertion_point = ledger.translate(allocation.insertion_point);
        let end = ledger.translate(allocation.responsibilities_end);

        let (template, fallback) = self.find_template(doc, insertion_point, end, cache);
        let mut cursor = find_cursor(&self.engine, doc, insertion_point);
        let mut added = 0;

        for (tech, point) in allocation.points() {
            let mut paragraph = Paragraph::new();
            self.engine
                .apply(&mut paragraph, template.as_ref(), point, Some(&fallback));

            match doc.insert_paragraph(cursor, paragraph) {
                Ok(()) => {
                    cursor += 1;
                    added += 1;
                }
                Err(e) => log::error!(
                    "Failed to add {} point '{}' to project '{}': {}",
                    tech,
                    point,
                    allocation.title,
                    e
                ),
            }
        }

        log::debug!("Project '{}': {} points added", allocation.title, added);
        added
    }

    /// Pick the formatting to clone for a project.
    ///
    /// The first bullet with a proper glyph in the sampling window wins; a
    /// dash bullet is used only when nothing better is nearby. Without any
    /// nearby bullet the document-wide marker is used, then `•`.
    fn find_template(
        &self,
        doc: &Document,
        insertion_point: usize,
        end: usize,
        cache: &mut FormattingCache,
    ) -> (Option<BulletFormatting>, BulletFormatting) {
        let low = insertion_point.saturating_sub(self.window);
        let high = end.saturating_add(self.window).min(doc.paragraph_count());

        let mut first_dash = None;
        for i in low..high {
            if let Some(found) = cache.get_or_extract(&self.engine, doc, i) {
                if !found.is_dash() {
                    log::debug!("Using local bullet marker '{}' from paragraph {}", found.marker, i);
                    return (Some(found.clone()), found);
                }
                first_dash.get_or_insert(found);
            }
        }

        if let Some(found) = first_dash {
            log::debug!("Using local dash marker '{}'", found.marker);
            return (Some(found.clone()), found);
        }

        let fallback = match self.engine.document_marker(doc) {
            Some(marker) => BulletFormatting::with_marker(marker),
            None => BulletFormatting::default(),
        };
        log::info!("Using document-wide fallback bullet marker: '{}'", fallback.marker);
        (None, fallback)
    }
}

/// Position right after the first existing bullet at or after `start`, or
/// `start` itself when there is none.
fn find_cursor<E: FormattingEngine>(engine: &E, doc: &Document, start: usize) -> usize {
    let count = doc.paragraph_count();
    let start = start.min(count);

    doc.paragraphs()
        .enumerate()
        .skip(start)
        .find(|(_, p)| engine.is_bullet(p))
        .map(|(i, _)| i + 1)
        .unwrap_or(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Project;
    use crate::distribute::{DistributionMethod, PointDistributor};
    use crate::stacks::TechStacks;

    fn allocation(title: &str, start: usize, end: usize, points: &[&str]) -> ProjectAllocation {
        let project = Project {
            title: title.into(),
            index: 0,
            responsibilities_start: start,
            responsibilities_end: end,
        };
        ProjectAllocation::new(&project, TechStacks::new().with("Rust", points.iter().copied()))
    }

    #[test]
    fn test_ledger() {
        let mut ledger = OffsetLedger::new();
        assert_eq!(ledger.translate(4), 4);
        ledger.record(3);
        assert_eq!(ledger.translate(4), 7);
        assert_eq!(ledger.inserted(), 3);
    }

    #[test]
    fn test_cursor_after_first_bullet() {
        let doc = Document::from_lines(["Responsibilities:", "• a", "• b"]);
        let engine = BulletFormatter::new();
        assert_eq!(find_cursor(&engine, &doc, 0), 2);
        assert_eq!(find_cursor(&engine, &doc, 3), 3);
        assert_eq!(find_cursor(&engine, &doc, 10), 3);
    }

    #[test]
    fn test_configured_glyph_bullets() {
        let lines = ["Responsibilities:", "➢ a", "➢ b", "tail"];
        let distribution = DistributionResult::new(
            vec![allocation("A", 1, 2, &["new"])],
            DistributionMethod::RoundRobin,
        );

        let mut doc = Document::from_lines(lines);
        DocumentMutator::new().mutate(&mut doc, &distribution);
        assert_eq!(doc.paragraph_text(1), "•\tnew");

        let mut doc = Document::from_lines(lines);
        DocumentMutator::with_engine(BulletFormatter::with_glyphs(['➢'])).mutate(&mut doc, &distribution);
        assert_eq!(doc.paragraph_text(2), "➢ new");
        assert_eq!(doc.paragraph_text(3), "➢ b");
    }

    #[test]
    fn test_offsets_shift_later_projects() {
        let mut lines: Vec<String> = (0..30).map(|i| format!("line {}", i)).collect();
        lines[5] = "•\tfirst".into();
        lines[20] = "•\tsecond".into();
        let mut doc = Document::from_lines(&lines);

        let distribution = DistributionResult::new(
            vec![
                allocation("B", 20, 20, &["b1", "b2", "b3"]),
                allocation("A", 5, 5, &["a1", "a2", "a3"]),
            ],
            DistributionMethod::RoundRobin,
        );

        let added = DocumentMutator::new().mutate(&mut doc, &distribution);
        assert_eq!(added, 6);

        assert_eq!(doc.paragraph_text(6), "•\ta1");
        assert_eq!(doc.paragraph_text(8), "•\ta3");
        // The second bullet moved from 20 to 23; its new points follow it.
        assert_eq!(doc.paragraph_text(23), "•\tsecond");
        assert_eq!(doc.paragraph_text(24), "•\tb1");
        assert_eq!(doc.paragraph_text(26), "•\tb3");
    }

    #[test]
    fn test_prefers_proper_glyph() {
        let mut doc = Document::from_lines(["Responsibilities:", "- dash", "▪ square", "tail"]);
        let distribution = DistributionResult::new(
            vec![allocation("A", 1, 2, &["new"])],
            DistributionMethod::RoundRobin,
        );

        DocumentMutator::new().mutate(&mut doc, &distribution);
        assert_eq!(doc.paragraph_text(2), "▪ new");
    }

    #[test]
    fn test_no_bullets_uses_default_marker() {
        let mut doc = Document::from_lines(["Acme | 2020", "Responsibilities:"]);
        let distribution = DistributionResult::new(
            vec![allocation("A", 2, 1, &["first", "second"])],
            DistributionMethod::RoundRobin,
        );

        let added = DocumentMutator::new().mutate(&mut doc, &distribution);
        assert_eq!(added, 2);
        assert_eq!(doc.paragraph_text(2), "•\tfirst");
        assert_eq!(doc.paragraph_text(3), "•\tsecond");
    }

    struct PlainEngine;

    impl FormattingEngine for PlainEngine {
        fn extract(&self, _: &Document, _: usize) -> Option<BulletFormatting> {
            None
        }
        fn apply(&self, paragraph: &mut Paragraph, _: Option<&BulletFormatting>, text: &str, _: Option<&BulletFormatting>) {
            paragraph.add_text(text);
        }
        fn document_marker(&self, _: &Document) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_insertion_point_past_end_appends() {
        let mut doc = Document::from_lines(["only"]);
        let distribution = DistributionResult::new(
            vec![allocation("A", 7, 7, &["x"])],
            DistributionMethod::RoundRobin,
        );

        let added = DocumentMutator::with_engine(PlainEngine).mutate(&mut doc, &distribution);
        assert_eq!(added, 1);
        assert_eq!(doc.paragraph_text(1), "x");
    }

    #[test]
    fn test_distribute_then_mutate() {
        let mut doc = Document::from_lines([
            "Acme Corp | 2020",
            "Responsibilities:",
            "- one",
            "Globex | 2019",
            "Responsibilities:",
            "- two",
        ]);
        let projects = vec![
            Project { title: "Acme".into(), index: 0, responsibilities_start: 2, responsibilities_end: 2 },
            Project { title: "Globex".into(), index: 1, responsibilities_start: 5, responsibilities_end: 5 },
        ];
        let stacks = TechStacks::new().with("Go", ["g1", "g2"]);
        let distribution = PointDistributor::new().distribute(&projects, &stacks).unwrap();

        assert_eq!(DocumentMutator::new().mutate(&mut doc, &distribution), 2);
        assert_eq!(doc.paragraph_text(3), "- g1");
        assert_eq!(doc.paragraph_text(7), "- g2");
    }
}
