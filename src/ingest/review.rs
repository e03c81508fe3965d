//! Review formatting.
//!
//! OpenReview stores a review as note content: a map from section key
//! (`summary`, `strengths`, ...) to `{ "value": ... }`. Only the sections
//! the feedback agents look at are kept.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Result, RevfeedError};

/// Section headers kept in the formatted review.
pub const REVIEW_SECTIONS: [&str; 4] = ["Summary", "Strengths", "Weaknesses", "Questions"];

/// Title-case a note content key: `strengths_and_weaknesses` -> `Strengths And Weaknesses`.
pub fn section_header(key: &str) -> String {
    key.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the kept sections as `**Header**: value`, separated by blank lines,
/// in note order.
pub fn format_review(content: &Map<String, Value>) -> String {
    content
        .iter()
        .filter_map(|(key, section)| {
            let header = section_header(key);
            if !REVIEW_SECTIONS.contains(&header.as_str()) {
                return None;
            }
            let value = section.get("value").unwrap_or(section);
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some(format!("**{}**: {}", header, text))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Load a review. A `.json` file holds note content (or a full note with a
/// `content` field) and is formatted; any other file is used verbatim.
pub fn load_review(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| RevfeedError::ReviewNotFound(format!("{}: {}", path.display(), e)))?;

    if !path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        return Ok(raw);
    }

    let note: Value = serde_json::from_str(&raw)?;
    let content = note
        .get("content")
        .unwrap_or(&note)
        .as_object()
        .ok_or_else(|| RevfeedError::ReviewNotFound(format!("{} holds no review content object", path.display())))?;

    Ok(format_review(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_section_header() {
        assert_eq!(section_header("summary"), "Summary");
        assert_eq!(section_header("WEAKNESSES"), "Weaknesses");
        assert_eq!(section_header("strengths_and_weaknesses"), "Strengths And Weaknesses");
        assert_eq!(section_header(""), "");
    }

    #[test]
    fn test_format_review_keeps_known_sections_in_order() {
        let note = json!({
            "summary": { "value": "The paper proposes X." },
            "soundness": { "value": "3 good" },
            "strengths": { "value": "Clear writing." },
            "weaknesses": { "value": "Weak baselines." },
            "questions": { "value": "Why 5 seeds?" },
            "rating": { "value": 6 }
        });

        let formatted = format_review(note.as_object().unwrap());

        assert_eq!(
            formatted,
            "**Summary**: The paper proposes X.\n\n**Strengths**: Clear writing.\n\n\
             **Weaknesses**: Weak baselines.\n\n**Questions**: Why 5 seeds?"
        );
    }

    #[test]
    fn test_format_review_empty() {
        let note = json!({ "rating": { "value": 3 } });
        assert_eq!(format_review(note.as_object().unwrap()), "");
    }

    #[test]
    fn test_load_review_json_note() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("review.json");
        fs::write(
            &path,
            json!({ "id": "r1", "content": { "weaknesses": { "value": "No ablation." } } }).to_string(),
        )
        .unwrap();

        assert_eq!(load_review(&path).unwrap(), "**Weaknesses**: No ablation.");
    }

    #[test]
    fn test_load_review_plain_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("review.md");
        fs::write(&path, "**Weaknesses**: anything").unwrap();

        assert_eq!(load_review(&path).unwrap(), "**Weaknesses**: anything");
    }

    #[test]
    fn test_load_review_errors() {
        assert!(matches!(
            load_review(Path::new("/nonexistent/review.txt")),
            Err(RevfeedError::ReviewNotFound(_))
        ));

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("review.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(load_review(&path), Err(RevfeedError::ReviewNotFound(_))));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(load_review(&path), Err(RevfeedError::Json(_))));
    }
}
