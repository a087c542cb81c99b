//! Project section detection.
//!
//! [`SectionDetector`] walks the paragraphs once and yields every project
//! whose responsibilities region could be located. Resumes are not uniform:
//! some use an explicit "Responsibilities:" heading, others go straight to
//! bullets, and prose introductions sit between the two. The detector
//! accepts all of these while the classifier keeps ordinary prose from
//! opening or closing a region.

mod classify;

pub use classify::{HeuristicClassifier, LineClassifier};

use serde::{Deserialize, Serialize};

use crate::model::Document;
use crate::options::DetectorConfig;

/// Paragraphs shown in the diagnostic log when nothing is found.
const DIAGNOSTIC_PARAGRAPHS: usize = 20;

/// A detected project and where its bullet content lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Header line, optionally followed by " - " and the role-title line
    pub title: String,

    /// Position in detection order
    pub index: usize,

    /// First paragraph of the responsibilities region
    pub responsibilities_start: usize,

    /// Last paragraph of the responsibilities region (inclusive)
    pub responsibilities_end: usize,
}

/// A project that is still being scanned.
#[derive(Debug)]
struct OpenProject {
    title: String,
    start: Option<usize>,
    in_responsibilities: bool,
    found_bullets: bool,
    awaiting_role_line: bool,
}

impl OpenProject {
    fn new(header: &str) -> Self {
        Self {
            title: header.to_string(),
            start: None,
            in_responsibilities: false,
            found_bullets: false,
            awaiting_role_line: true,
        }
    }

    fn reset_region(&mut self) {
        self.start = None;
        self.in_responsibilities = false;
        self.found_bullets = false;
    }
}

/// Single-pass project detector.
#[derive(Debug, Clone)]
pub struct SectionDetector<C: LineClassifier = HeuristicClassifier> {
    classifier: C,
}

impl SectionDetector {
    /// Create a detector with the default rules.
    pub fn new() -> Self {
        Self::with_classifier(HeuristicClassifier::new())
    }

    /// Create a detector from a keyword configuration.
    pub fn with_config(config: DetectorConfig) -> Self {
        Self::with_classifier(HeuristicClassifier::with_config(config))
    }
}

impl Default for SectionDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: LineClassifier> SectionDetector<C> {
    /// Create a detector with a custom classifier.
    pub fn with_classifier(classifier: C) -> Self {
        Self { classifier }
    }

    /// The classifier in use.
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Detect projects in document order.
    ///
    /// Never fails; an empty list means no project structure was recognized.
    /// A project is only reported once its responsibilities start is known.
    pub fn detect(&self, doc: &Document) -> Vec<Project> {
        let lines: Vec<(String, bool)> = doc
            .paragraphs()
            .map(|p| (p.text().trim().to_string(), p.is_native_list()))
            .collect();

        let mut projects = Vec::new();
        let mut current: Option<OpenProject> = None;

        for (i, (text, native_list)) in lines.iter().enumerate() {
            let native_list = *native_list;

            if !native_list && self.classifier.is_project_header(text) {
                if let Some(open) = current.take() {
                    if let Some(start) = open.start {
                        let end = last_content_line(&lines, i, start);
                        push_project(&mut projects, open.title, start, end);
                    }
                }
                current = Some(OpenProject::new(text));
                continue;
            }

            if text.is_empty() {
                continue;
            }

            let is_bullet = native_list || self.classifier.is_bullet(text);
            let is_heading = !is_bullet && self.classifier.is_responsibilities_heading(text);
            let is_intro = !native_list && self.classifier.is_introductory(text);

            let Some(open) = current.as_mut() else {
                continue;
            };

            let awaiting_role_line = std::mem::replace(&mut open.awaiting_role_line, false);
            if awaiting_role_line && !is_bullet && !is_heading && !is_intro {
                open.title = format!("{} - {}", open.title, text);
            } else if is_heading {
                open.in_responsibilities = true;
                open.start = Some(i + 1);
            } else if is_intro {
                continue;
            } else if is_bullet {
                open.found_bullets = true;
                open.start.get_or_insert(i);
            } else if (open.in_responsibilities || open.found_bullets)
                && self.classifier.is_section_end(text)
            {
                if let Some(start) = open.start {
                    let end = last_non_blank_line(&lines, i, start);
                    push_project(&mut projects, open.title.clone(), start, end);
                }
                open.reset_region();
            }
        }

        if let Some(open) = current {
            match open.start {
                Some(start) => {
                    let end = last_content_line(&lines, lines.len(), start);
                    push_project(&mut projects, open.title, start, end);
                }
                None => log::warn!(
                    "No responsibilities section or bullet points found for project: {}",
                    open.title
                ),
            }
        }

        if projects.is_empty() {
            log_structure(&lines);
        } else {
            log::debug!("Detected {} projects", projects.len());
        }

        projects
    }
}

fn push_project(projects: &mut Vec<Project>, title: String, start: usize, end: usize) {
    log::debug!("Project '{}': paragraphs {}..={}", title, start, end);
    let index = projects.len();
    projects.push(Project {
        title,
        index,
        responsibilities_start: start,
        responsibilities_end: end,
    });
}

/// Last line in `[start, boundary)` that has text and is not a dash continuation.
fn last_content_line(lines: &[(String, bool)], boundary: usize, start: usize) -> usize {
    (start..boundary)
        .rev()
        .find(|&j| {
            let text = &lines[j].0;
            !text.is_empty() && !text.starts_with('-')
        })
        .unwrap_or_else(|| boundary.saturating_sub(1))
}

/// Last line in `[start, boundary)` that has text.
fn last_non_blank_line(lines: &[(String, bool)], boundary: usize, start: usize) -> usize {
    (start..boundary)
        .rev()
        .find(|&j| !lines[j].0.is_empty())
        .unwrap_or_else(|| boundary.saturating_sub(1))
}

fn log_structure(lines: &[(String, bool)]) {
    log::warn!("No projects found. Document structure analysis:");
    for (i, (text, _)) in lines
        .iter()
        .enumerate()
        .filter(|(_, (t, _))| !t.is_empty())
        .take(DIAGNOSTIC_PARAGRAPHS)
    {
        let preview: String = text.chars().take(50).collect();
        log::warn!("Para {}: '{}...' (len: {})", i, preview, text.chars().count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NumberingRef, Paragraph};

    fn detect(lines: &[&str]) -> Vec<Project> {
        SectionDetector::new().detect(&Document::from_lines(lines.iter().copied()))
    }

    #[test]
    fn test_explicit_heading() {
        let projects = detect(&[
            "Acme Corp | Jan 2020 - Present",
            "E-commerce Platform",
            "Responsibilities:",
            "• Built checkout",
            "• Tuned queries",
            "",
            "Globex | 2018 - 2019",
            "Responsibilities:",
            "• Wrote reports",
        ]);

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].title, "Acme Corp | Jan 2020 - Present - E-commerce Platform");
        assert_eq!(projects[0].responsibilities_start, 3);
        assert_eq!(projects[0].responsibilities_end, 4);
        assert_eq!(projects[1].title, "Globex | 2018 - 2019");
        assert_eq!(projects[1].responsibilities_start, 8);
        assert_eq!(projects[1].responsibilities_end, 8);
        assert_eq!(projects[1].index, 1);
    }

    #[test]
    fn test_bullets_without_heading() {
        let projects = detect(&[
            "Acme Corp | Jan 2020 - Present",
            "This engagement modernised the retail checkout for a very large customer base",
            "• Built checkout",
            "• Tuned queries",
        ]);

        assert_eq!(projects.len(), 1);
        // The long intro line is skipped, not taken as a role title.
        assert_eq!(projects[0].title, "Acme Corp | Jan 2020 - Present");
        assert_eq!(projects[0].responsibilities_start, 2);
        assert_eq!(projects[0].responsibilities_end, 3);
    }

    #[test]
    fn test_section_end_closes_region() {
        let projects = detect(&[
            "Acme Corp | Jan 2020 - Present",
            "Responsibilities:",
            "• Built checkout",
            "",
            "Key Achievements",
            "Won an award",
        ]);

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].responsibilities_start, 2);
        assert_eq!(projects[0].responsibilities_end, 2);
    }

    #[test]
    fn test_dash_bullets_end_scan() {
        // Dash lines are continuations for the backward scan, so the end
        // falls back to the line before the boundary.
        let projects = detect(&[
            "Acme Corp | Jan 2020 - Present",
            "Responsibilities:",
            "- Built checkout",
            "- Tuned queries",
            "",
            "Globex | 2018 - 2019",
            "- Wrote reports",
        ]);

        assert_eq!(projects[0].responsibilities_end, 4);
        assert_eq!(projects[1].responsibilities_start, 6);
        assert_eq!(projects[1].responsibilities_end, 6);
    }

    #[test]
    fn test_header_without_region_dropped() {
        let projects = detect(&[
            "Acme Corp | Jan 2020 - Present",
            "Nothing here",
            "Globex | 2018 - 2019",
            "• Wrote reports",
        ]);

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title, "Globex | 2018 - 2019");
    }

    #[test]
    fn test_role_title_only_once() {
        let projects = detect(&[
            "Acme Corp | Jan 2020 - Present",
            "Platform Team",
            "Checkout Squad",
            "• Built checkout",
        ]);

        assert_eq!(projects[0].title, "Acme Corp | Jan 2020 - Present - Platform Team");
    }

    #[test]
    fn test_native_list_counts_as_bullet() {
        let mut doc = Document::from_lines(["Acme Corp | Jan 2020 - Present", "Responsibilities"]);
        let mut item = Paragraph::with_text("Senior developer mentoring programme");
        item.numbering = Some(NumberingRef::new(4, 0));
        doc.append_paragraph(item);

        let projects = SectionDetector::new().detect(&doc);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].responsibilities_start, 2);
    }

    #[test]
    fn test_no_projects() {
        let projects = detect(&[
            "Curriculum Vitae",
            "I enjoy writing software and have done so for a long time in many places.",
        ]);
        assert!(projects.is_empty());
    }

    #[test]
    fn test_detection_is_idempotent() {
        let doc = Document::from_lines([
            "Acme Corp | Jan 2020 - Present",
            "Responsibilities:",
            "• Built checkout",
        ]);
        let detector = SectionDetector::new();
        assert_eq!(detector.detect(&doc), detector.detect(&doc));
    }

    struct EveryLineIsHeader;

    impl LineClassifier for EveryLineIsHeader {
        fn is_project_header(&self, _: &str) -> bool {
            true
        }
        fn is_responsibilities_heading(&self, _: &str) -> bool {
            false
        }
        fn is_bullet(&self, _: &str) -> bool {
            false
        }
        fn is_introductory(&self, _: &str) -> bool {
            false
        }
        fn is_section_end(&self, _: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_injected_classifier() {
        let detector = SectionDetector::with_classifier(EveryLineIsHeader);
        let projects = detector.detect(&Document::from_lines(["a b", "c d"]));
        assert!(projects.is_empty());
    }
}
