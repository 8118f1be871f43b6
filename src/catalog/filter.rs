// Search filter over the exercise store
// Matches course names, week labels and exercise tags by case-insensitive substring

use indexmap::IndexMap;
use std::borrow::Cow;

use crate::models::{Course, Exercise, Store, Week};

pub fn normalizeSearchTerm(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Derive the filtered view. An empty term borrows the store unchanged.
pub fn filterStore<'a>(db: &'a Store, term: &str) -> Cow<'a, Store> {
    let term = normalizeSearchTerm(term);
    if term.is_empty() {
        return Cow::Borrowed(db);
    }

    let mut filtered = Store::new();
    for (name, course) in &db.courses {
        if let Some(course) = filterCourse(name, course, &term) {
            filtered.courses.insert(name.clone(), course);
        }
    }
    Cow::Owned(filtered)
}

fn filterCourse(name: &str, course: &Course, term: &str) -> Option<Course> {
    // A course name match always shows the whole course
    if name.to_lowercase().contains(term) {
        return Some(course.clone());
    }

    let mut weeks = IndexMap::new();
    for (label, exercises) in &course.weeks {
        if label.to_lowercase().contains(term) {
            weeks.insert(label.clone(), exercises.clone());
            continue;
        }
        let matching: Week = exercises
            .iter()
            .filter(|e| exerciseMatches(e, term))
            .cloned()
            .collect();
        if !matching.is_empty() {
            weeks.insert(label.clone(), matching);
        }
    }

    if weeks.is_empty() {
        None
    } else {
        Some(Course {
            weeks,
            createdAt: course.createdAt,
        })
    }
}

fn exerciseMatches(exercise: &Exercise, term: &str) -> bool {
    exercise.tags.iter().any(|tag| tag.to_lowercase().contains(term))
}
