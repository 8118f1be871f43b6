// Exercise hierarchy: Store -> Course -> Week -> Exercise
// Courses and weeks keep insertion order, which is the "default" sort order

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single extracted exercise image. The path is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub path: String,
    #[serde(default)]
    pub tags: Vec<String>, // lowercase, insertion order, no duplicates
}

impl Exercise {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            tags: Vec::new(),
        }
    }

    /// File name component of the path (whole path if it has none)
    pub fn fileName(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }
}

/// Exercises of one week, keyed by "Week <n>" inside a course
pub type Week = Vec<Exercise>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub weeks: IndexMap<String, Week>,
    pub createdAt: i64, // epoch millis, set once
}

impl Course {
    pub fn new(createdAt: i64) -> Self {
        Self {
            weeks: IndexMap::new(),
            createdAt,
        }
    }

    pub fn exerciseCount(&self) -> usize {
        self.weeks.values().map(Vec::len).sum()
    }

    /// All exercise paths, week by week
    pub fn paths(&self) -> Vec<String> {
        self.weeks
            .values()
            .flat_map(|week| week.iter().map(|e| e.path.clone()))
            .collect()
    }
}

/// Canonical exercise database, keyed by course name (case-sensitive)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Store {
    pub courses: IndexMap<String, Course>,
}

/// Week key for a week number as typed by the user
pub fn weekLabel(weekNumber: &str) -> String {
    format!("Week {}", weekNumber)
}
