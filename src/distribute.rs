//! Fair distribution of points across projects.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::detector::Project;
use crate::error::{Error, Result};
use crate::stacks::TechStacks;

/// How points were assigned to projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionMethod {
    /// Full round-robin with duplicate checks
    RoundRobin,
    /// Flat even slicing used for large documents
    StreamingOptimized,
}

impl DistributionMethod {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionMethod::RoundRobin => "round_robin",
            DistributionMethod::StreamingOptimized => "streaming_optimized",
        }
    }
}

impl fmt::Display for DistributionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Points assigned to one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAllocation {
    /// Project title
    pub title: String,

    /// Detection index of the project
    pub project_index: usize,

    /// Paragraph where the responsibilities region starts
    pub insertion_point: usize,

    /// Last paragraph of the responsibilities region
    pub responsibilities_end: usize,

    /// Assigned points grouped by technology
    pub mixed_tech_stacks: TechStacks,

    /// Number of assigned points
    pub total_points: usize,
}

impl ProjectAllocation {
    /// Create an allocation for a project.
    pub fn new(project: &Project, points: TechStacks) -> Self {
        Self {
            title: project.title.clone(),
            project_index: project.index,
            insertion_point: project.responsibilities_start,
            responsibilities_end: project.responsibilities_end,
            total_points: points.total_points(),
            mixed_tech_stacks: points,
        }
    }

    /// Iterate over `(technology, point)` pairs in insertion order.
    pub fn points(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mixed_tech_stacks
            .iter()
            .flat_map(|(tech, points)| points.iter().map(move |p| (tech, p.as_str())))
    }
}

/// Result of distributing points across projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionResult {
    /// Allocations in project detection order
    pub projects: Vec<ProjectAllocation>,

    /// Points assigned across all projects
    pub total_points: usize,

    /// Number of projects that received at least one point
    pub projects_used: usize,

    /// Method used
    pub method: DistributionMethod,
}

impl DistributionResult {
    /// Build a result from allocations, computing the totals.
    pub fn new(projects: Vec<ProjectAllocation>, method: DistributionMethod) -> Self {
        Self {
            total_points: projects.iter().map(|p| p.total_points).sum(),
            projects_used: projects.iter().filter(|p| p.total_points > 0).count(),
            projects,
            method,
        }
    }

    /// First allocation with the given title.
    pub fn allocation(&self, title: &str) -> Option<&ProjectAllocation> {
        self.projects.iter().find(|p| p.title == title)
    }
}

/// Round-robin point distributor.
#[derive(Debug, Clone)]
pub struct PointDistributor {
    max_projects: usize,
}

impl PointDistributor {
    /// Create a distributor targeting the first three projects.
    pub fn new() -> Self {
        Self { max_projects: 3 }
    }

    /// Set the number of projects that receive points.
    pub fn with_max_projects(mut self, max: usize) -> Self {
        self.max_projects = max.max(1);
        self
    }

    /// Distribute points over the first `max_projects` projects.
    ///
    /// Technologies are walked in order and each point goes to the next
    /// project in rotation. A point text lands in at most one project;
    /// later copies of it are dropped.
    pub fn distribute(&self, projects: &[Project], stacks: &TechStacks) -> Result<DistributionResult> {
        if projects.is_empty() || stacks.is_empty() {
            return Err(Error::NoTechStacks);
        }

        let targets = &projects[..projects.len().min(self.max_projects)];
        let buckets = round_robin(stacks, targets.len());

        let allocations: Vec<_> = targets
            .iter()
            .zip(buckets)
            .map(|(project, points)| ProjectAllocation::new(project, points))
            .collect();

        let result = DistributionResult::new(allocations, DistributionMethod::RoundRobin);
        log::debug!(
            "Distributed {} of {} points over {} projects",
            result.total_points,
            stacks.total_points(),
            result.projects_used
        );
        Ok(result)
    }
}

impl Default for PointDistributor {
    fn default() -> Self {
        Self::new()
    }
}

/// Assign points to `buckets` projects in rotation. Each distinct point
/// text is assigned once; repeats are dropped without advancing the rotation.
pub fn round_robin(stacks: &TechStacks, buckets: usize) -> Vec<TechStacks> {
    let mut assigned = vec![TechStacks::new(); buckets];
    if buckets == 0 {
        return assigned;
    }
    let mut used: HashSet<&str> = HashSet::new();
    let mut next = 0;

    for (tech, points) in stacks.iter() {
        for point in points {
            if !used.insert(point.as_str()) {
                log::debug!("Dropping duplicate point for {}: {}", tech, point);
                continue;
            }
            assigned[next].push_point(tech, point.clone());
            next = (next + 1) % buckets;
        }
    }

    assigned
}
