// Settings model, persisted under the "settings" key

use serde::{Deserialize, Serialize};

/// Title words the extractor looks for when no keywords were configured
pub const DEFAULT_KEYWORDS: &str = "Tutoraufgabe,Exercise,Hausaufgabe";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_keywords")]
    pub keywords: String, // comma-joined
}

fn default_keywords() -> String {
    DEFAULT_KEYWORDS.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
        }
    }
}

impl Settings {
    /// Keywords as an ordered list, blanks dropped
    pub fn keywordList(&self) -> Vec<String> {
        self.keywords
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn fromKeywords(keywords: &[String]) -> Self {
        Self {
            keywords: keywords.join(","),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keywords() {
        let settings = Settings::default();
        assert_eq!(settings.keywordList(), vec!["Tutoraufgabe", "Exercise", "Hausaufgabe"]);
    }

    #[test]
    fn test_keyword_list_skips_blanks() {
        let settings = Settings { keywords: " a , ,b,".to_string() };
        assert_eq!(settings.keywordList(), vec!["a", "b"]);
        assert_eq!(Settings::fromKeywords(&settings.keywordList()).keywords, "a,b");
    }

    #[test]
    fn test_missing_keywords_field_uses_default() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.keywords, DEFAULT_KEYWORDS);
    }
}
