//! # docbullet
//!
//! Insert technology talking points into the project sections of a resume
//! DOCX while keeping each project's existing bullet formatting.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docbullet::{process_file, TechStacks};
//!
//! fn main() -> docbullet::Result<()> {
//!     let stacks = TechStacks::new()
//!         .with("React", ["Built reusable hook libraries"])
//!         .with("Node.js", ["Designed REST APIs"]);
//!
//!     let report = process_file("resume.docx", &stacks)?;
//!     std::fs::write("resume_updated.docx", &report.output)?;
//!     println!("Added {} points", report.points_added);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Detection**: locate project headers and their responsibilities regions
//! - **Distribution**: spread points round-robin over the first projects
//! - **Formatting**: clone marker, indentation, fonts and list membership
//!   from neighbouring bullets
//! - **Mutation**: insert the new paragraphs, tracking index shifts
//! - **Streaming**: a cheaper path for very large documents

pub mod batch;
pub mod detect;
pub mod detector;
pub mod distribute;
pub mod error;
pub mod format;
pub mod input;
pub mod model;
pub mod mutate;
pub mod options;
pub mod package;
pub mod processor;
pub mod stacks;
pub mod streaming;

#[cfg(feature = "async")]
pub mod async_api;

// Re-export commonly used types
pub use batch::{process_batch, BatchEvent, BatchJob, BatchOutcome};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_docx, DocxFormat, DocxKind};
pub use detector::{HeuristicClassifier, LineClassifier, Project, SectionDetector};
pub use distribute::{DistributionMethod, DistributionResult, PointDistributor, ProjectAllocation};
pub use error::{Error, Result};
pub use format::{BulletFormatter, BulletFormatting, FormattingCache, FormattingEngine, ListFormat};
pub use input::parse_tech_stacks;
pub use model::{Block, Document, Paragraph, ParagraphFormat, TextRun, TextStyle};
pub use mutate::{DocumentMutator, OffsetLedger};
pub use options::{DetectorConfig, ProcessOptions, ProcessingMode};
pub use package::DocxPackage;
pub use processor::{MutationOutcome, ProcessReport, ProcessResponse, ResumeProcessor};
pub use stacks::TechStacks;
pub use streaming::StreamingProcessor;

use std::path::Path;

/// Insert points into a package held in memory.
///
/// # Example
///
/// ```no_run
/// use docbullet::{process_bytes, TechStacks};
///
/// let data = std::fs::read("resume.docx").unwrap();
/// let stacks = TechStacks::new().with("Rust", ["Wrote a DOCX editor"]);
/// let report = process_bytes(&data, &stacks).unwrap();
/// ```
pub fn process_bytes(data: &[u8], stacks: &TechStacks) -> Result<ProcessReport> {
    ResumeProcessor::default().process_bytes(data, stacks)
}

/// Insert points into a package held in memory with custom options.
pub fn process_bytes_with_options(
    data: &[u8],
    stacks: &TechStacks,
    options: ProcessOptions,
) -> Result<ProcessReport> {
    ResumeProcessor::new(options).process_bytes(data, stacks)
}

/// Insert points into a package file. The file itself is left untouched;
/// the new package is in [`ProcessReport::output`].
pub fn process_file<P: AsRef<Path>>(path: P, stacks: &TechStacks) -> Result<ProcessReport> {
    ResumeProcessor::default().process_file(path, stacks)
}

/// Insert points into a package file with custom options.
pub fn process_file_with_options<P: AsRef<Path>>(
    path: P,
    stacks: &TechStacks,
    options: ProcessOptions,
) -> Result<ProcessReport> {
    ResumeProcessor::new(options).process_file(path, stacks)
}

/// List the projects found in a package file.
///
/// # Example
///
/// ```no_run
/// use docbullet::detect_projects;
///
/// for project in detect_projects("resume.docx").unwrap() {
///     println!("{} (paragraph {})", project.title, project.responsibilities_start);
/// }
/// ```
pub fn detect_projects<P: AsRef<Path>>(path: P) -> Result<Vec<Project>> {
    let package = DocxPackage::open(path)?;
    Ok(SectionDetector::new().detect(package.document()))
}

/// Builder for configuring and running the pipeline.
///
/// # Example
///
/// ```no_run
/// use docbullet::{Customizer, TechStacks};
///
/// let stacks = TechStacks::new().with("Go", ["Wrote gRPC services"]);
/// let report = Customizer::new()
///     .max_projects(2)
///     .full()
///     .process_file("resume.docx", &stacks)?;
/// # Ok::<(), docbullet::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Customizer {
    options: ProcessOptions,
}

impl Customizer {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of projects that receive points.
    pub fn max_projects(mut self, max: usize) -> Self {
        self.options = self.options.with_max_projects(max);
        self
    }

    /// Always use the full, formatting-preserving pipeline.
    pub fn full(mut self) -> Self {
        self.options = self.options.with_mode(ProcessingMode::Full);
        self
    }

    /// Always use the streaming pipeline.
    pub fn streaming(mut self) -> Self {
        self.options = self.options.streaming();
        self
    }

    /// Set the paragraph count above which streaming is used automatically.
    pub fn streaming_threshold(mut self, paragraphs: usize) -> Self {
        self.options = self.options.with_streaming_threshold(paragraphs);
        self
    }

    /// Set the detector keyword configuration.
    pub fn with_detector(mut self, config: DetectorConfig) -> Self {
        self.options = self.options.with_detector(config);
        self
    }

    /// Options built so far.
    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Build the processor.
    pub fn build(self) -> ResumeProcessor {
        ResumeProcessor::new(self.options)
    }

    /// Process a package held in memory.
    pub fn process_bytes(self, data: &[u8], stacks: &TechStacks) -> Result<ProcessReport> {
        self.build().process_bytes(data, stacks)
    }

    /// Process a package file.
    pub fn process_file<P: AsRef<Path>>(self, path: P, stacks: &TechStacks) -> Result<ProcessReport> {
        self.build().process_file(path, stacks)
    }
}
