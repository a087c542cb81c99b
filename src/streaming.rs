//! Reduced-fidelity path for large documents.
//!
//! Large documents skip formatting extraction entirely. Points are taken
//! flat (a few per technology), sliced evenly over the first projects and
//! written as plain paragraphs with a fixed `•` marker. This trades visual
//! fidelity for bounded work per document; it is not a variant of the
//! round-robin path and does not guarantee the same assignment.

use std::collections::HashSet;

use crate::detector::Project;
use crate::distribute::{DistributionMethod, DistributionResult, ProjectAllocation};
use crate::error::{Error, Result};
use crate::format::marker::{clean_text, DEFAULT_MARKER, DEFAULT_SEPARATOR};
use crate::model::{Document, Paragraph};
use crate::mutate::OffsetLedger;
use crate::stacks::TechStacks;

/// Streaming distributor and mutator.
#[derive(Debug, Clone)]
pub struct StreamingProcessor {
    max_projects: usize,
    points_per_tech: usize,
}

impl StreamingProcessor {
    /// Create a processor using three projects and three points per technology.
    pub fn new() -> Self {
        Self {
            max_projects: 3,
            points_per_tech: 3,
        }
    }

    /// Set the number of projects that receive points.
    pub fn with_max_projects(mut self, max: usize) -> Self {
        self.max_projects = max.max(1);
        self
    }

    /// Set how many points are taken from each technology.
    pub fn with_points_per_tech(mut self, points: usize) -> Self {
        self.points_per_tech = points;
        self
    }

    /// Slice a flat point list evenly over the first projects.
    ///
    /// Every project takes `points / projects` points in order and the last
    /// one also takes the remainder. Repeated point texts are kept once and
    /// projects left with nothing are omitted.
    pub fn distribute(&self, projects: &[Project], stacks: &TechStacks) -> Result<DistributionResult> {
        if projects.is_empty() || stacks.is_empty() {
            return Err(Error::NoTechStacks);
        }

        let targets = &projects[..projects.len().min(self.max_projects)];
        let mut seen = HashSet::new();
        let flat: Vec<(&str, &String)> = stacks
            .iter()
            .flat_map(|(tech, points)| points.iter().take(self.points_per_tech).map(move |p| (tech, p)))
            .filter(|&(_, point)| seen.insert(point.as_str()))
            .collect();

        let per_project = flat.len() / targets.len();
        let mut allocations = Vec::new();

        for (i, project) in targets.iter().enumerate() {
            let start = i * per_project;
            let end = if i == targets.len() - 1 {
                flat.len()
            } else {
                start + per_project
            };
            if start >= end {
                continue;
            }

            let mut points = TechStacks::new();
            for (tech, point) in &flat[start..end] {
                points.push_point(tech, point.as_str());
            }
            allocations.push(ProjectAllocation::new(project, points));
        }

        Ok(DistributionResult::new(
            allocations,
            DistributionMethod::StreamingOptimized,
        ))
    }

    /// Insert points at each project's responsibilities start.
    pub fn mutate(&self, doc: &mut Document, distribution: &DistributionResult) -> usize {
        let mut allocations: Vec<&ProjectAllocation> = distribution.projects.iter().collect();
        allocations.sort_by_key(|a| a.insertion_point);

        let mut ledger = OffsetLedger::new();
        for allocation in allocations {
            let mut cursor = ledger.translate(allocation.insertion_point).min(doc.paragraph_count());
            let mut added = 0;

            for (_, point) in allocation.points() {
                let line = format!("{}{}{}", DEFAULT_MARKER, DEFAULT_SEPARATOR, clean_text(point));
                match doc.insert_paragraph(cursor, Paragraph::with_text(line)) {
                    Ok(()) => {
                        cursor += 1;
                        added += 1;
                    }
                    Err(e) => log::warn!("Failed to add point efficiently: {}", e),
                }
            }
            ledger.record(added);
        }

        log::info!("Streaming path added {} points", ledger.inserted());
        ledger.inserted()
    }
}

impl Default for StreamingProcessor {
    fn default() -> Self {
        Self::new()
    }
}
