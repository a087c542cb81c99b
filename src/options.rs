//! Processing options and configuration.

use serde::{Deserialize, Serialize};

/// Options for processing a document.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Maximum number of projects that receive points
    pub max_projects: usize,

    /// Paragraph count above which `Auto` mode switches to streaming
    pub streaming_threshold: usize,

    /// Points taken from each technology in streaming mode
    pub streaming_points_per_tech: usize,

    /// Paragraphs scanned on either side of a project when sampling bullet formatting
    pub formatting_window: usize,

    /// Full or streaming pipeline selection
    pub mode: ProcessingMode,

    /// Line classification settings
    pub detector: DetectorConfig,
}

impl ProcessOptions {
    /// Create new process options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of projects that receive points.
    pub fn with_max_projects(mut self, max: usize) -> Self {
        self.max_projects = max.max(1);
        self
    }

    /// Set the streaming threshold in paragraphs.
    pub fn with_streaming_threshold(mut self, paragraphs: usize) -> Self {
        self.streaming_threshold = paragraphs;
        self
    }

    /// Set the number of points per technology in streaming mode.
    pub fn with_streaming_points_per_tech(mut self, points: usize) -> Self {
        self.streaming_points_per_tech = points;
        self
    }

    /// Set the formatting sample window.
    pub fn with_formatting_window(mut self, paragraphs: usize) -> Self {
        self.formatting_window = paragraphs;
        self
    }

    /// Set processing mode.
    pub fn with_mode(mut self, mode: ProcessingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Always use the streaming pipeline.
    pub fn streaming(mut self) -> Self {
        self.mode = ProcessingMode::Streaming;
        self
    }

    /// Set the detector configuration.
    pub fn with_detector(mut self, config: DetectorConfig) -> Self {
        self.detector = config;
        self
    }

    /// Whether a document of `paragraphs` paragraphs should take the streaming path.
    pub fn use_streaming(&self, paragraphs: usize) -> bool {
        match self.mode {
            ProcessingMode::Auto => paragraphs > self.streaming_threshold,
            ProcessingMode::Full => false,
            ProcessingMode::Streaming => true,
        }
    }
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            max_projects: 3,
            streaming_threshold: 200,
            streaming_points_per_tech: 3,
            formatting_window: 5,
            mode: ProcessingMode::Auto,
            detector: DetectorConfig::default(),
        }
    }
}

/// Pipeline selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    /// Streaming for large documents, full otherwise
    #[default]
    Auto,
    /// Always clone formatting from nearby bullets
    Full,
    /// Always use the reduced-fidelity streaming path
    Streaming,
}

/// Keyword lists and thresholds used to classify lines.
///
/// Every field has a default, so a JSON file only needs to name the lists it
/// wants to replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Words that mark a line as a role/project header
    pub role_keywords: Vec<String>,

    /// Prefixes of a normalized responsibilities heading
    pub heading_keywords: Vec<String>,

    /// Words that keep a long line from being an introductory paragraph
    pub intro_exclude_keywords: Vec<String>,

    /// Words that end a responsibilities section
    pub section_end_keywords: Vec<String>,

    /// Glyphs that start a bullet line
    pub bullet_glyphs: Vec<char>,

    /// Minimum word count of an introductory paragraph
    pub min_intro_words: usize,
}

impl DetectorConfig {
    /// Create a configuration with the default keyword lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the role keywords.
    pub fn with_role_keywords<S: Into<String>>(mut self, keywords: impl IntoIterator<Item = S>) -> Self {
        self.role_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the section-end keywords.
    pub fn with_section_end_keywords<S: Into<String>>(
        mut self,
        keywords: impl IntoIterator<Item = S>,
    ) -> Self {
        self.section_end_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the bullet glyphs.
    pub fn with_bullet_glyphs(mut self, glyphs: impl IntoIterator<Item = char>) -> Self {
        self.bullet_glyphs = glyphs.into_iter().collect();
        self
    }

    /// Set the minimum introductory paragraph length in words.
    pub fn with_min_intro_words(mut self, words: usize) -> Self {
        self.min_intro_words = words;
        self
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            role_keywords: strings(&[
                "developer",
                "engineer",
                "manager",
                "lead",
                "senior",
                "software",
                "full stack",
                "frontend",
                "backend",
            ]),
            heading_keywords: strings(&[
                "responsibilities",
                "key responsibilities",
                "duties",
                "tasks",
                "role",
                "position",
            ]),
            intro_exclude_keywords: strings(&["responsibilities", "duties", "role", "position"]),
            section_end_keywords: strings(&["achievements", "technologies", "tools", "key"]),
            bullet_glyphs: vec!['•', '●', '◦', '▪', '▫', '‣', '*', '-'],
            min_intro_words: 10,
        }
    }
}
