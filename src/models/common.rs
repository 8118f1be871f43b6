// Common types shared by the catalog and the command layer

use serde::{Deserialize, Serialize};

/// Current timestamp in milliseconds
pub fn now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Course ordering for the sidebar. Weeks and exercises always sort numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    CourseAsc,
    CourseDesc,
    DateNewest,
    DateOldest,
    #[default]
    Default, // insertion order
}

impl SortKey {
    pub fn fromStr(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "course-asc" => Some(Self::CourseAsc),
            "course-desc" => Some(Self::CourseDesc),
            "date-newest" => Some(Self::DateNewest),
            "date-oldest" => Some(Self::DateOldest),
            "default" | "" => Some(Self::Default),
            _ => None,
        }
    }
}

/// Identity of an expandable sidebar container: a course, or a week inside a course
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerKey {
    pub course: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<String>,
}

impl ContainerKey {
    pub fn course(course: &str) -> Self {
        Self {
            course: course.to_string(),
            week: None,
        }
    }

    pub fn week(course: &str, week: &str) -> Self {
        Self {
            course: course.to_string(),
            week: Some(week.to_string()),
        }
    }

    /// Element id for the frontend. Non-alphanumerics are hex-escaped so distinct keys never collide.
    pub fn domId(&self) -> String {
        match &self.week {
            None => format!("course-{}", escapeId(&self.course)),
            Some(week) => format!("week-{}-{}", escapeId(&self.course), escapeId(week)),
        }
    }
}

fn escapeId(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            out.push_str(&format!("_{:x}_", c as u32));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_wire_names() {
        assert_eq!(serde_json::to_string(&SortKey::DateNewest).unwrap(), "\"date-newest\"");
        assert_eq!(serde_json::from_str::<SortKey>("\"course-desc\"").unwrap(), SortKey::CourseDesc);
        assert_eq!(SortKey::fromStr("Course-Asc"), Some(SortKey::CourseAsc));
        assert_eq!(SortKey::fromStr("bogus"), None);
    }

    #[test]
    fn test_dom_ids_do_not_collide_after_sanitizing() {
        // "C++" and "C--" both became "course-C--" with plain dash replacement
        let a = ContainerKey::course("C++").domId();
        let b = ContainerKey::course("C--").domId();
        assert_ne!(a, b);

        let w1 = ContainerKey::week("A-B", "Week 1").domId();
        let w2 = ContainerKey::week("A", "B-Week 1").domId();
        assert_ne!(w1, w2);
        assert!(w1.starts_with("week-A"));
    }

    #[test]
    fn test_dom_id_keeps_alphanumerics() {
        assert_eq!(ContainerKey::course("Algo2").domId(), "course-Algo2");
    }
}
