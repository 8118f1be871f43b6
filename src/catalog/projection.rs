// Render tree for the sidebar and the exercise viewer
// Expansion survives re-renders because it is keyed by course/week, not by position

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

use super::sort::sortStore;
use crate::models::{ContainerKey, Exercise, SortKey, Store};

/// Which courses and weeks are expanded in the sidebar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: BTreeSet<ContainerKey>,
    initialized: bool, // false until the first render that had courses
}

impl ExpansionState {
    pub fn isInitialized(&self) -> bool {
        self.initialized
    }

    pub fn isExpanded(&self, key: &ContainerKey) -> bool {
        if !self.initialized {
            return key.week.is_none();
        }
        self.expanded.contains(key)
    }

    pub fn setExpanded(&mut self, key: ContainerKey, expanded: bool) {
        self.initialized = true;
        if expanded {
            self.expanded.insert(key);
        } else {
            self.expanded.remove(&key);
        }
    }

    /// Remember the first-render default: every course expanded
    pub fn seedCourses<'a>(&mut self, courses: impl IntoIterator<Item = &'a String>) {
        if self.initialized {
            return;
        }
        let mut seeded = false;
        for course in courses {
            self.expanded.insert(ContainerKey::course(course));
            seeded = true;
        }
        self.initialized = seeded;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseNode {
    pub path: String,
    pub label: String, // "Exercise <position>"
    pub selected: bool,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekNode {
    pub key: ContainerKey,
    pub domId: String,
    pub label: String,
    pub expanded: bool,
    pub exercises: Vec<ExerciseNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseNode {
    pub key: ContainerKey,
    pub domId: String,
    pub name: String,
    pub createdAt: i64,
    pub expanded: bool,
    pub exerciseCount: usize,
    pub weeks: Vec<WeekNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderTree {
    pub courses: Vec<CourseNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emptyMessage: Option<String>,
}

/// Build the sidebar tree. Pure: the same inputs always give the same tree.
pub fn project(
    view: &Store,
    sortKey: SortKey,
    expansion: &ExpansionState,
    selectedPath: Option<&str>,
    searchActive: bool,
) -> RenderTree {
    if view.isEmpty() {
        let message = if searchActive { "No exercises found" } else { "No exercises yet" };
        return RenderTree {
            courses: Vec::new(),
            emptyMessage: Some(message.to_string()),
        };
    }

    let sorted = sortStore(view, sortKey);
    let courses = sorted
        .courses
        .iter()
        .map(|(name, course)| {
            let courseKey = ContainerKey::course(name);
            let weeks = course
                .weeks
                .iter()
                .map(|(label, exercises)| {
                    let weekKey = ContainerKey::week(name, label);
                    WeekNode {
                        domId: weekKey.domId(),
                        label: label.clone(),
                        expanded: expansion.isExpanded(&weekKey),
                        exercises: exercises
                            .iter()
                            .enumerate()
                            .map(|(i, e)| ExerciseNode {
                                path: e.path.clone(),
                                label: format!("Exercise {}", i + 1),
                                selected: selectedPath == Some(e.path.as_str()),
                                tags: e.tags.clone(),
                            })
                            .collect(),
                        key: weekKey,
                    }
                })
                .collect();

            CourseNode {
                domId: courseKey.domId(),
                name: name.clone(),
                createdAt: course.createdAt,
                expanded: expansion.isExpanded(&courseKey),
                exerciseCount: course.exerciseCount(),
                weeks,
                key: courseKey,
            }
        })
        .collect();

    RenderTree {
        courses,
        emptyMessage: None,
    }
}

/// What the viewer shows for the selected exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseDisplay {
    pub path: String,
    pub title: String,
    pub imageUrl: String,
    pub tags: Vec<String>,
}

impl From<&Exercise> for ExerciseDisplay {
    fn from(e: &Exercise) -> Self {
        Self {
            path: e.path.clone(),
            title: exerciseTitle(&e.path),
            imageUrl: fileUrl(&e.path),
            tags: e.tags.clone(),
        }
    }
}

/// "/x/exercise_3.png" -> "Exercise 3"
pub fn exerciseTitle(path: &str) -> String {
    let stem = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path);
    let stem = stem.strip_suffix(".png").unwrap_or(stem).replace('_', " ");

    let mut title = String::with_capacity(stem.len());
    let mut atWordStart = true;
    for c in stem.chars() {
        if atWordStart && c.is_alphanumeric() {
            title.extend(c.to_uppercase());
        } else {
            title.push(c);
        }
        atWordStart = !c.is_alphanumeric();
    }
    title
}

/// file:// URL with each path segment percent-encoded
pub fn fileUrl(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let encoded: Vec<String> = normalized
        .split('/')
        .map(|segment| {
            // keep Windows drive letters ("C:") readable
            if segment.len() == 2 && segment.ends_with(':') {
                segment.to_string()
            } else {
                urlencoding::encode(segment).into_owned()
            }
        })
        .collect();
    let joined = encoded.join("/");
    if joined.starts_with('/') {
        format!("file://{}", joined)
    } else {
        format!("file:///{}", joined)
    }
}
