//! Technology → talking points map.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Ordered map from technology name to its bullet points.
///
/// Order matters: technologies are distributed in the order they were
/// supplied, so this keeps insertion order (including through JSON).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechStacks {
    entries: Vec<(String, Vec<String>)>,
}

impl TechStacks {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add points for a technology, appending if it is already present.
    pub fn insert<S: Into<String>>(&mut self, name: impl Into<String>, points: impl IntoIterator<Item = S>) {
        let name = name.into();
        let points: Vec<String> = points.into_iter().map(Into::into).collect();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => existing.extend(points),
            None => self.entries.push((name, points)),
        }
    }

    /// Builder form of [`TechStacks::insert`].
    pub fn with<S: Into<String>>(mut self, name: impl Into<String>, points: impl IntoIterator<Item = S>) -> Self {
        self.insert(name, points);
        self
    }

    /// Add a single point for a technology.
    pub fn push_point(&mut self, name: &str, point: impl Into<String>) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, points)) => points.push(point.into()),
            None => self.entries.push((name.to_string(), vec![point.into()])),
        }
    }

    /// Split a flat point list evenly across technology names.
    ///
    /// Each name takes `points / names` points in order; the first
    /// `points % names` names take one extra. Names left with no points
    /// are omitted.
    pub fn from_flat<S: AsRef<str>, N: AsRef<str>>(points: &[S], names: &[N]) -> Result<Self> {
        if points.is_empty() || names.is_empty() {
            return Err(Error::InvalidInput("No valid tech stacks found".into()));
        }

        let per_name = points.len() / names.len();
        let remainder = points.len() % names.len();

        let mut stacks = Self::new();
        let mut cursor = 0;
        for (i, name) in names.iter().enumerate() {
            let take = per_name + usize::from(i < remainder);
            if take == 0 {
                continue;
            }
            stacks.insert(
                name.as_ref(),
                points[cursor..cursor + take].iter().map(|p| p.as_ref().to_string()),
            );
            cursor += take;
        }
        Ok(stacks)
    }

    /// Points of a technology.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.as_slice())
    }

    /// Iterate over `(technology, points)` in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p.as_slice()))
    }

    /// Technology names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Number of technologies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no points at all.
    pub fn is_empty(&self) -> bool {
        self.total_points() == 0
    }

    /// Total number of points across technologies.
    pub fn total_points(&self) -> usize {
        self.entries.iter().map(|(_, p)| p.len()).sum()
    }
}

impl<N: Into<String>, P: Into<String>> FromIterator<(N, Vec<P>)> for TechStacks {
    fn from_iter<I: IntoIterator<Item = (N, Vec<P>)>>(iter: I) -> Self {
        let mut stacks = Self::new();
        for (name, points) in iter {
            stacks.insert(name, points);
        }
        stacks
    }
}

impl Serialize for TechStacks {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, points) in &self.entries {
            map.serialize_entry(name, points)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TechStacks {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct StacksVisitor;

        impl<'de> Visitor<'de> for StacksVisitor {
            type Value = TechStacks;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of technology names to lists of points")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
                let mut stacks = TechStacks::new();
                while let Some((name, points)) = access.next_entry::<String, Vec<String>>()? {
                    stacks.insert(name, points);
                }
                Ok(stacks)
            }
        }

        deserializer.deserialize_map(StacksVisitor)
    }
}
