//! Async wrappers for use inside a tokio runtime.
//!
//! File I/O goes through `tokio::fs`; the CPU-bound pipeline runs on the
//! blocking pool.

use std::path::Path;

use crate::error::{Error, Result};
use crate::processor::{ProcessReport, ResumeProcessor};
use crate::stacks::TechStacks;

/// Process a package held in memory without blocking the runtime.
pub async fn process_bytes_async(
    processor: ResumeProcessor,
    data: Vec<u8>,
    stacks: TechStacks,
) -> Result<ProcessReport> {
    tokio::task::spawn_blocking(move || processor.process_bytes(&data, &stacks))
        .await
        .map_err(|e| Error::Other(format!("processing task failed: {}", e)))?
}

/// Read, process and write a package file.
pub async fn process_file_async(
    processor: ResumeProcessor,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    stacks: TechStacks,
) -> Result<ProcessReport> {
    let data = tokio::fs::read(input).await?;
    let report = process_bytes_async(processor, data, stacks).await?;
    tokio::fs::write(output, &report.output).await?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread")]
    async fn test_invalid_bytes() {
        let result = process_bytes_async(
            ResumeProcessor::default(),
            b"plain text".to_vec(),
            TechStacks::new().with("Rust", ["r1"]),
        )
        .await;
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = process_file_async(
            ResumeProcessor::default(),
            dir.path().join("missing.docx"),
            dir.path().join("out.docx"),
            TechStacks::new().with("Rust", ["r1"]),
        )
        .await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
