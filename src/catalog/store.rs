// Exercise store operations: ingest, cascading removal, lookup and legacy migration

use serde_json::Value;
use tracing::{debug, warn};

use super::tags::normalizeTagList;
use crate::models::{Course, Exercise, Store, Week, now, weekLabel};

/// Where an exercise lives in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseLocation {
    pub course: String,
    pub week: String,
    pub index: usize,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn isEmpty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn course(&self, name: &str) -> Option<&Course> {
        self.courses.get(name)
    }

    pub fn week(&self, course: &str, week: &str) -> Option<&Week> {
        self.courses.get(course)?.weeks.get(week)
    }

    /// Store the result of an extraction. Re-importing a week replaces its exercises (and their tags).
    /// Returns the week label, or None when there was nothing to store.
    pub fn ingest(&mut self, courseName: &str, weekNumber: &str, paths: &[String]) -> Option<String> {
        if paths.is_empty() {
            return None;
        }

        let label = weekLabel(weekNumber);
        let course = self
            .courses
            .entry(courseName.to_string())
            .or_insert_with(|| Course::new(now()));
        course
            .weeks
            .insert(label.clone(), paths.iter().map(Exercise::new).collect());

        debug!("[Store::ingest] {} / {}: {} exercises", courseName, label, paths.len());
        Some(label)
    }

    /// Remove one exercise; an emptied week and then an emptied course go with it
    pub fn removeExercise(&mut self, course: &str, week: &str, index: usize) -> Option<Exercise> {
        let exercises = self.courses.get_mut(course)?.weeks.get_mut(week)?;
        if index >= exercises.len() {
            return None;
        }
        let removed = exercises.remove(index);
        if exercises.is_empty() {
            self.removeWeek(course, week);
        }
        Some(removed)
    }

    /// Remove a week; an emptied course goes with it
    pub fn removeWeek(&mut self, course: &str, week: &str) -> Option<Week> {
        let entry = self.courses.get_mut(course)?;
        let removed = entry.weeks.shift_remove(week)?;
        if entry.weeks.is_empty() {
            self.courses.shift_remove(course);
        }
        Some(removed)
    }

    pub fn removeCourse(&mut self, course: &str) -> Option<Course> {
        self.courses.shift_remove(course)
    }

    /// Remove the given paths from a course (optionally a single week of it), cascading.
    /// Returns how many exercises were removed.
    pub fn removePaths(&mut self, course: &str, week: Option<&str>, paths: &[String]) -> usize {
        let Some(entry) = self.courses.get_mut(course) else {
            return 0;
        };

        let mut removed = 0;
        for (label, exercises) in entry.weeks.iter_mut() {
            if week.is_some_and(|w| w != label.as_str()) {
                continue;
            }
            let before = exercises.len();
            exercises.retain(|e| !paths.contains(&e.path));
            removed += before - exercises.len();
        }

        entry.weeks.retain(|_, exercises| !exercises.is_empty());
        if entry.weeks.is_empty() {
            self.courses.shift_remove(course);
        }
        removed
    }

    pub fn locate(&self, path: &str) -> Option<ExerciseLocation> {
        self.courses.iter().find_map(|(course, entry)| {
            entry.weeks.iter().find_map(|(week, exercises)| {
                exercises
                    .iter()
                    .position(|e| e.path == path)
                    .map(|index| ExerciseLocation {
                        course: course.clone(),
                        week: week.clone(),
                        index,
                    })
            })
        })
    }

    pub fn findExercise(&self, path: &str) -> Option<&Exercise> {
        self.courses
            .values()
            .flat_map(|c| c.weeks.values())
            .flatten()
            .find(|e| e.path == path)
    }

    pub fn findExerciseMut(&mut self, path: &str) -> Option<&mut Exercise> {
        self.courses
            .values_mut()
            .flat_map(|c| c.weeks.values_mut())
            .flatten()
            .find(|e| e.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.findExercise(path).is_some()
    }

    pub fn weekPaths(&self, course: &str, week: &str) -> Vec<String> {
        self.week(course, week)
            .map(|exercises| exercises.iter().map(|e| e.path.clone()).collect())
            .unwrap_or_default()
    }

    pub fn coursePaths(&self, course: &str) -> Vec<String> {
        self.course(course).map(Course::paths).unwrap_or_default()
    }

    /// Every exercise with its course and week
    pub fn exercises(&self) -> impl Iterator<Item = (&str, &str, &Exercise)> {
        self.courses.iter().flat_map(|(course, entry)| {
            entry.weeks.iter().flat_map(move |(week, exercises)| {
                exercises.iter().map(move |e| (course.as_str(), week.as_str(), e))
            })
        })
    }
}

// ============================================
// MIGRATION
// ============================================

/// Upgrade persisted data to the current shape.
///
/// Accepted per course, mixed freely within one file:
/// - `{ "Week 1": ["/a.png", ...] }` (bare paths)
/// - `{ "Week 1": [{ "path": "/a.png", "tags": [] }] }` (no course wrapper)
/// - `{ "weeks": { ... }, "createdAt": 1700000000000 }` (current)
///
/// Courses that cannot be interpreted are dropped with a warning. Running it on its own output is a no-op.
pub fn migrate(raw: &Value) -> Store {
    let mut store = Store::new();

    let courses = match raw {
        Value::Object(map) => map,
        Value::Null => return store,
        other => {
            warn!("[migrate] Expected an object at the top level, got {}; starting empty", typeName(other));
            return store;
        }
    };

    for (name, value) in courses {
        match migrateCourse(name, value) {
            Some(course) => {
                store.courses.insert(name.clone(), course);
            }
            None => warn!("[migrate] Dropping course '{}': unrecognized or empty", name),
        }
    }

    debug!("[migrate] Loaded {} courses", store.courses.len());
    store
}

fn migrateCourse(name: &str, value: &Value) -> Option<Course> {
    let obj = value.as_object()?;

    let (weeks, createdAt) = match obj.get("weeks") {
        Some(Value::Object(weeks)) => (weeks, obj.get("createdAt").and_then(timestamp)),
        // No wrapper: the course object itself maps week labels to exercise lists
        _ => (obj, None),
    };

    let mut course = Course::new(createdAt.unwrap_or_else(now));
    for (label, entries) in weeks {
        let Some(entries) = entries.as_array() else {
            warn!("[migrate] {}: skipping '{}', not an exercise list", name, label);
            continue;
        };
        let exercises: Week = entries
            .iter()
            .filter_map(|entry| {
                let exercise = migrateExercise(entry);
                if exercise.is_none() {
                    warn!("[migrate] {} / {}: skipping unreadable exercise entry", name, label);
                }
                exercise
            })
            .collect();
        if !exercises.is_empty() {
            course.weeks.insert(label.clone(), exercises);
        }
    }

    if course.weeks.is_empty() { None } else { Some(course) }
}

fn migrateExercise(entry: &Value) -> Option<Exercise> {
    match entry {
        Value::String(path) if !path.is_empty() => Some(Exercise::new(path.as_str())),
        Value::Object(obj) => {
            let path = obj.get("path")?.as_str().filter(|p| !p.is_empty())?;
            let tags = obj
                .get("tags")
                .and_then(Value::as_array)
                .map(|tags| normalizeTagList(tags.iter().filter_map(Value::as_str)))
                .unwrap_or_default();
            Some(Exercise { path: path.to_string(), tags })
        }
        _ => None,
    }
}

fn timestamp(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

fn typeName(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
