// Presentation ordering: courses by the selected key, weeks and exercises numerically
// Sorting never mutates its input

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

use crate::models::{Course, Exercise, SortKey, Store};

static WEEK_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("week number pattern"));
static EXERCISE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^exercise_(\d+)\.png$").expect("exercise number pattern"));

/// "Week 12" -> 12; labels without a number sort as 0
pub fn weekNumber(label: &str) -> u64 {
    WEEK_NUMBER
        .find(label)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// ".../exercise_7.png" -> 7; other file names sort as 0
pub fn exerciseNumber(exercise: &Exercise) -> u64 {
    EXERCISE_NUMBER
        .captures(exercise.fileName())
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0)
}

fn compareCourses(key: SortKey, a: (&String, &Course), b: (&String, &Course)) -> Ordering {
    match key {
        SortKey::CourseAsc => compareNames(a.0, b.0),
        SortKey::CourseDesc => compareNames(b.0, a.0),
        SortKey::DateNewest => b.1.createdAt.cmp(&a.1.createdAt),
        SortKey::DateOldest => a.1.createdAt.cmp(&b.1.createdAt),
        SortKey::Default => Ordering::Equal,
    }
}

fn compareNames(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Weeks ascending by number, exercises ascending by number, both stable
pub fn sortCourse(course: &Course) -> Course {
    let mut weeks: Vec<_> = course.weeks.iter().collect();
    weeks.sort_by_key(|(label, _)| weekNumber(label));

    Course {
        weeks: weeks
            .into_iter()
            .map(|(label, exercises)| {
                let mut exercises = exercises.clone();
                exercises.sort_by_key(exerciseNumber);
                (label.clone(), exercises)
            })
            .collect(),
        createdAt: course.createdAt,
    }
}

pub fn sortStore(view: &Store, key: SortKey) -> Store {
    let mut courses: Vec<_> = view.courses.iter().collect();
    // stable: ties keep insertion order
    courses.sort_by(|a, b| compareCourses(key, *a, *b));

    Store {
        courses: courses
            .into_iter()
            .map(|(name, course)| (name.clone(), sortCourse(course)))
            .collect(),
    }
}
