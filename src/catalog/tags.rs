// Tag list editing shared by exercise tags and the extraction keyword list

use crate::error::{AppError, AppResult};

/// Trim and lowercase a tag; None when nothing is left
pub fn normalizeTag(raw: &str) -> Option<String> {
    let tag = raw.trim().to_lowercase();
    if tag.is_empty() { None } else { Some(tag) }
}

/// Add a tag. Returns Ok(false) when it was already present.
pub fn addTag(tags: &mut Vec<String>, raw: &str) -> AppResult<bool> {
    let tag = normalizeTag(raw).ok_or_else(|| AppError::validation("Tag must not be empty"))?;
    if tags.contains(&tag) {
        return Ok(false);
    }
    tags.push(tag);
    Ok(true)
}

/// Remove by exact match. Returns false when the tag was absent.
pub fn removeTag(tags: &mut Vec<String>, tag: &str) -> bool {
    let before = tags.len();
    tags.retain(|t| t != tag);
    tags.len() != before
}

/// Normalize a tag list read from disk: lowercase, drop blanks and duplicates, keep order
pub fn normalizeTagList<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags = Vec::new();
    for t in raw {
        if let Some(tag) = normalizeTag(t.as_ref()) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }
    tags
}
