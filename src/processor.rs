//! End-to-end document processing.
//!
//! The pipeline is detect → distribute → mutate → serialize. Detection runs
//! once on the unmodified document; serialization happens once at the end,
//! so a failure anywhere yields an error and no output bytes.

use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::detector::{Project, SectionDetector};
use crate::distribute::{DistributionMethod, DistributionResult, PointDistributor};
use crate::error::{Error, Result};
use crate::format::BulletFormatter;
use crate::model::Document;
use crate::mutate::DocumentMutator;
use crate::options::ProcessOptions;
use crate::package::DocxPackage;
use crate::stacks::TechStacks;
use crate::streaming::StreamingProcessor;

/// Outcome of mutating an in-memory document.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    /// How points were assigned
    pub distribution: DistributionResult,

    /// Paragraphs actually inserted
    pub points_added: usize,
}

/// Successful processing report.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    /// Serialized package with the new points
    #[serde(skip)]
    pub output: Vec<u8>,

    /// Paragraphs actually inserted
    pub points_added: usize,

    /// Projects that received points
    pub projects_modified: usize,

    /// Per-project assignment
    pub distribution: DistributionResult,

    /// Pipeline used
    pub method: DistributionMethod,

    /// When processing finished
    pub processed_at: DateTime<Utc>,

    /// Wall time spent, in milliseconds
    pub elapsed_ms: u64,
}

/// Wire shape of a processing result.
///
/// Mirrors a report on success and carries only the error message on
/// failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_added: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects_modified: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_details: Option<DistributionResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_method: Option<DistributionMethod>,
}

impl ProcessResponse {
    /// Build the wire shape from a processing result.
    pub fn from_result(result: &Result<ProcessReport>) -> Self {
        match result {
            Ok(report) => Self {
                success: true,
                error: None,
                points_added: Some(report.points_added),
                projects_modified: Some(report.projects_modified),
                distribution_details: Some(report.distribution.clone()),
                distribution_method: Some(report.method),
            },
            Err(e) => Self {
                success: false,
                error: Some(match e {
                    Error::NoProjects | Error::NoTechStacks => e.to_string(),
                    other => format!("Failed to process document: {}", other),
                }),
                points_added: None,
                projects_modified: None,
                distribution_details: None,
                distribution_method: None,
            },
        }
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs the full pipeline with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct ResumeProcessor {
    options: ProcessOptions,
}

impl ResumeProcessor {
    /// Create a processor.
    pub fn new(options: ProcessOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Detect projects without modifying anything.
    pub fn detect(&self, doc: &Document) -> Vec<Project> {
        SectionDetector::with_config(self.options.detector.clone()).detect(doc)
    }

    /// Detect, distribute and insert points into an in-memory document.
    pub fn process_document(&self, doc: &mut Document, stacks: &TechStacks) -> Result<MutationOutcome> {
        let projects = self.detect(doc);
        if projects.is_empty() {
            return Err(Error::NoProjects);
        }
        log::info!("Found {} projects", projects.len());

        let paragraphs = doc.paragraph_count();
        if self.options.use_streaming(paragraphs) {
            log::info!("Using streaming path for {} paragraphs", paragraphs);
            let streaming = StreamingProcessor::new()
                .with_max_projects(self.options.max_projects)
                .with_points_per_tech(self.options.streaming_points_per_tech);
            let distribution = streaming.distribute(&projects, stacks)?;
            let points_added = streaming.mutate(doc, &distribution);
            return Ok(MutationOutcome {
                distribution,
                points_added,
            });
        }

        let distribution = PointDistributor::new()
            .with_max_projects(self.options.max_projects)
            .distribute(&projects, stacks)?;
        let engine = BulletFormatter::with_glyphs(self.options.detector.bullet_glyphs.iter().copied());
        let points_added = DocumentMutator::with_engine(engine)
            .with_window(self.options.formatting_window)
            .mutate(doc, &distribution);

        Ok(MutationOutcome {
            distribution,
            points_added,
        })
    }

    /// Process a package held in memory and return the new package bytes.
    pub fn process_bytes(&self, data: &[u8], stacks: &TechStacks) -> Result<ProcessReport> {
        let started = Instant::now();
        let mut package = DocxPackage::from_bytes(data)?;

        let outcome = self.process_document(package.document_mut(), stacks)?;
        let output = package.to_bytes()?;

        let report = ProcessReport {
            output,
            points_added: outcome.points_added,
            projects_modified: outcome.distribution.projects_used,
            method: outcome.distribution.method,
            distribution: outcome.distribution,
            processed_at: Utc::now(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        log::info!(
            "Processed document: {} points over {} projects ({}) in {} ms",
            report.points_added,
            report.projects_modified,
            report.method,
            report.elapsed_ms
        );
        Ok(report)
    }

    /// Process a package file. The input file is not modified.
    pub fn process_file<P: AsRef<Path>>(&self, path: P, stacks: &TechStacks) -> Result<ProcessReport> {
        let data = std::fs::read(path)?;
        self.process_bytes(&data, stacks)
    }
}
