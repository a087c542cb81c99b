//! Processing many documents in parallel.
//!
//! Each document is independent: it is read, processed and written on a
//! rayon worker, and a failure only affects that document. Progress can be
//! observed through a crossbeam channel.

use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use rayon::prelude::*;

use crate::error::Result;
use crate::processor::{ProcessReport, ResumeProcessor};
use crate::stacks::TechStacks;

/// One input/output pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl BatchJob {
    /// Create a job with an explicit output path.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Create a job writing `<stem>_updated.docx` into `dir`.
    pub fn into_dir(input: impl Into<PathBuf>, dir: &Path) -> Self {
        let input = input.into();
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let output = dir.join(format!("{}_updated.docx", stem));
        Self { input, output }
    }
}

/// Progress notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// A worker picked up the job at `index`.
    Started { index: usize, input: PathBuf },
    /// The job at `index` completed.
    Finished {
        index: usize,
        input: PathBuf,
        points_added: usize,
        error: Option<String>,
    },
}

/// Result of one job.
#[derive(Debug)]
pub struct BatchOutcome {
    pub job: BatchJob,
    pub result: Result<ProcessReport>,
}

impl BatchOutcome {
    /// Whether the document was processed and written.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Process every job in parallel, writing outputs as they complete.
///
/// Outcomes are returned in job order. Nothing is written for a job that
/// fails.
pub fn process_batch(
    processor: &ResumeProcessor,
    jobs: &[BatchJob],
    stacks: &TechStacks,
    events: Option<&Sender<BatchEvent>>,
) -> Vec<BatchOutcome> {
    log::info!("Processing batch of {} documents", jobs.len());

    jobs.par_iter()
        .enumerate()
        .map(|(index, job)| {
            notify(
                events,
                BatchEvent::Started {
                    index,
                    input: job.input.clone(),
                },
            );

            let result = run_job(processor, job, stacks);
            if let Err(e) = &result {
                log::warn!("{}: {}", job.input.display(), e);
            }

            notify(
                events,
                BatchEvent::Finished {
                    index,
                    input: job.input.clone(),
                    points_added: result.as_ref().map(|r| r.points_added).unwrap_or(0),
                    error: result.as_ref().err().map(|e| e.to_string()),
                },
            );

            BatchOutcome {
                job: job.clone(),
                result,
            }
        })
        .collect()
}

fn run_job(processor: &ResumeProcessor, job: &BatchJob, stacks: &TechStacks) -> Result<ProcessReport> {
    let report = processor.process_file(&job.input, stacks)?;
    std::fs::write(&job.output, &report.output)?;
    Ok(report)
}

fn notify(events: Option<&Sender<BatchEvent>>, event: BatchEvent) {
    if let Some(sender) = events {
        // A dropped receiver only means nobody is watching.
        let _ = sender.send(event);
    }
}
