//! Line classification rules.
//!
//! Each rule is a pure predicate over the trimmed text of one paragraph.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::options::DetectorConfig;

/// Predicates used by the section detector.
///
/// The detector evaluates these in a fixed priority order; implementations
/// only answer whether a single line looks like each kind of line.
pub trait LineClassifier {
    /// A line that opens a project (company/date, role at company, role title).
    fn is_project_header(&self, text: &str) -> bool;

    /// A "Responsibilities:"-style heading.
    fn is_responsibilities_heading(&self, text: &str) -> bool;

    /// A line starting with a bullet glyph or a number.
    fn is_bullet(&self, text: &str) -> bool;

    /// A prose paragraph introducing a project.
    fn is_introductory(&self, text: &str) -> bool;

    /// A line that closes the responsibilities region.
    fn is_section_end(&self, text: &str) -> bool;
}

/// Keyword and pattern based classifier.
#[derive(Debug, Clone)]
pub struct HeuristicClassifier {
    config: DetectorConfig,
    months: Regex,
    year: Regex,
    slash_date: Regex,
    ongoing: Regex,
    numbered: Regex,
}

impl HeuristicClassifier {
    /// Create a classifier with the default keyword lists.
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::default())
    }

    /// Create a classifier from a configuration.
    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            config,
            months: Regex::new(
                r"(?i)\b(jan(uary)?|feb(ruary)?|mar(ch)?|apr(il)?|may|june?|july?|aug(ust)?|sep(t|tember)?|oct(ober)?|nov(ember)?|dec(ember)?)\b",
            )
            .expect("month pattern"),
            year: Regex::new(r"\b\d{4}\b").expect("year pattern"),
            slash_date: Regex::new(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b").expect("date pattern"),
            ongoing: Regex::new(r"(?i)\b(present|current|now)\b").expect("ongoing pattern"),
            numbered: Regex::new(r"^\d+\.").expect("numbered pattern"),
        }
    }

    /// The configuration this classifier was built from.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// "Company | Date": exactly two pipe-separated parts, the second date-like.
    fn looks_like_company_date(&self, text: &str) -> bool {
        let parts: Vec<&str> = text.split('|').collect();
        if parts.len() != 2 {
            return false;
        }
        let date = parts[1].trim();
        self.months.is_match(date)
            || self.year.is_match(date)
            || self.slash_date.is_match(date)
            || self.ongoing.is_match(date)
    }
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LineClassifier for HeuristicClassifier {
    fn is_project_header(&self, text: &str) -> bool {
        let text = text.trim();
        if self.is_bullet(text) || text.split_whitespace().count() < 2 {
            return false;
        }

        if text.contains('|') && self.looks_like_company_date(text) {
            return true;
        }
        // "Client - Company - Mar 2021"
        if text.contains(" - ") && self.months.is_match(text) {
            return true;
        }
        // "Role at Company (City)"
        if text.contains(" at ") && text.contains('(') && text.contains(')') {
            return true;
        }

        let lower = text.to_lowercase();
        contains_any(&lower, &self.config.role_keywords)
    }

    fn is_responsibilities_heading(&self, text: &str) -> bool {
        let normalized = normalize_heading(text);
        self.config
            .heading_keywords
            .iter()
            .any(|k| normalized.starts_with(k.as_str()))
    }

    fn is_bullet(&self, text: &str) -> bool {
        let text = text.trim();
        match text.chars().next() {
            None => false,
            Some(first) if self.config.bullet_glyphs.contains(&first) => true,
            Some(_) => self.numbered.is_match(text),
        }
    }

    fn is_introductory(&self, text: &str) -> bool {
        let text = text.trim();
        if self.is_bullet(text) || is_all_caps(text) {
            return false;
        }

        let words = text.split_whitespace().count();
        if words < 5 {
            return false;
        }
        if contains_any(&text.to_lowercase(), &self.config.intro_exclude_keywords) {
            return false;
        }
        words >= self.config.min_intro_words
    }

    fn is_section_end(&self, text: &str) -> bool {
        let text = text.trim();
        text.starts_with("##") || contains_any(&text.to_lowercase(), &self.config.section_end_keywords)
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

/// Lowercase, keep only ASCII letters and spaces, collapse runs of spaces.
pub(crate) fn normalize_heading(text: &str) -> String {
    let folded: String = text
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || *c == ' ')
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// At least one cased letter and no lowercase letters.
fn is_all_caps(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> HeuristicClassifier {
        HeuristicClassifier::new()
    }

    #[test]
    fn test_company_date_header() {
        let c = classifier();
        assert!(c.is_project_header("Acme Corp | Jan 2020 - Present"));
        assert!(c.is_project_header("Acme Corp | 03/15/2019"));
        assert!(c.is_project_header("Acme Corp | September 2018"));
        assert!(!c.is_project_header("Acme | Globex | 2020"));
        assert!(!c.is_project_header("Skills | Communication"));
    }

    #[test]
    fn test_other_header_forms() {
        let c = classifier();
        assert!(c.is_project_header("Bank of Nowhere - Globex - Mar 2021"));
        assert!(c.is_project_header("Architect at Initech (Austin, TX)"));
        assert!(c.is_project_header("Senior Developer"));
        assert!(!c.is_project_header("Developer"));
        assert!(!c.is_project_header("- Senior developer mentoring"));
    }

    #[test]
    fn test_responsibilities_heading() {
        let c = classifier();
        assert!(c.is_responsibilities_heading("Responsibilities:"));
        assert!(c.is_responsibilities_heading("  KEY  Responsibilities"));
        assert!(c.is_responsibilities_heading("Roles & Duties"));
        assert!(c.is_responsibilities_heading("Ｒｅｓｐｏｎｓｉｂｉｌｉｔｉｅｓ"));
        assert!(!c.is_responsibilities_heading("Environment: Java"));
    }

    #[test]
    fn test_bullet() {
        let c = classifier();
        assert!(c.is_bullet("• Built APIs"));
        assert!(c.is_bullet("-\tShipped"));
        assert!(c.is_bullet("▪Tight"));
        assert!(c.is_bullet("12. Numbered"));
        assert!(!c.is_bullet("Built APIs"));
        assert!(!c.is_bullet(""));
    }

    #[test]
    fn test_introductory() {
        let c = classifier();
        assert!(c.is_introductory(
            "The platform served millions of shoppers across several regions every single day"
        ));
        assert!(!c.is_introductory("E-commerce Platform"));
        assert!(!c.is_introductory(
            "THE PLATFORM SERVED MILLIONS OF SHOPPERS ACROSS SEVERAL REGIONS EVERY DAY"
        ));
        assert!(!c.is_introductory(
            "My role covered the platform for millions of shoppers across several regions"
        ));
    }

    #[test]
    fn test_section_end() {
        let c = classifier();
        assert!(c.is_section_end("## Education"));
        assert!(c.is_section_end("Technologies used"));
        assert!(c.is_section_end("Key Achievements"));
        assert!(!c.is_section_end("Built the checkout service"));
    }

    #[test]
    fn test_custom_config() {
        let config = DetectorConfig::default().with_role_keywords(["consultant"]);
        let c = HeuristicClassifier::with_config(config);
        assert!(c.is_project_header("Independent Consultant"));
        assert!(!c.is_project_header("Senior Developer"));
    }

    #[test]
    fn test_normalize_heading() {
        assert_eq!(normalize_heading("  Key\tResponsibilities:  "), "keyresponsibilities");
        assert_eq!(normalize_heading("Key   Responsibilities:"), "key responsibilities");
    }
}
