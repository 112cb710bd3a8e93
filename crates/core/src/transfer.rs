//! Import and export of question banks as JSON documents.
//!
//! An import document has the bank shape (`topik1`/`topik2` → year →
//! category → array of questions). Only the shape is checked; individual
//! questions are accepted as-is. A question missing its `level`, `year` or
//! `type` takes them from the path it is filed under.

use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{Category, Level, QuestionBank};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    #[error("invalid import format: {reason}")]
    InvalidFormat { reason: String },
}

impl ImportError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("failed to serialize question bank: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Parse and validate raw import text into a partial bank.
///
/// # Errors
///
/// Returns `ImportError::InvalidFormat` if the text is not JSON, lacks both
/// level keys, or does not follow the level → year → category → array shape.
pub fn parse_import(raw: &str) -> Result<QuestionBank, ImportError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| ImportError::invalid(format!("not valid JSON: {err}")))?;
    validate_import(value)
}

/// Validate an already parsed document and decode it into a partial bank.
///
/// Keys other than the two level keys are ignored.
///
/// # Errors
///
/// Returns `ImportError::InvalidFormat` when the shape is wrong.
pub fn validate_import(value: Value) -> Result<QuestionBank, ImportError> {
    let Value::Object(mut root) = value else {
        return Err(ImportError::invalid("top level must be an object"));
    };

    let mut levels = Map::new();
    for level in Level::ALL {
        match root.remove(level.as_str()) {
            None | Some(Value::Null) => {}
            Some(mut level_value) => {
                check_level(level, &mut level_value)?;
                levels.insert(level.as_str().to_string(), level_value);
            }
        }
    }

    if levels.is_empty() {
        return Err(ImportError::invalid("expected a `topik1` or `topik2` key"));
    }

    serde_json::from_value(Value::Object(levels))
        .map_err(|err| ImportError::invalid(format!("unreadable question: {err}")))
}

fn check_level(level: Level, value: &mut Value) -> Result<(), ImportError> {
    let Value::Object(years) = value else {
        return Err(ImportError::invalid(format!("`{level}` must map years to categories")));
    };
    for (year, categories) in years.iter_mut() {
        let Value::Object(categories) = categories else {
            return Err(ImportError::invalid(format!(
                "`{level}.{year}` must map categories to question arrays"
            )));
        };
        for (category_key, questions) in categories.iter_mut() {
            let Ok(category) = category_key.parse::<Category>() else {
                return Err(ImportError::invalid(format!(
                    "unknown category `{category_key}` under `{level}.{year}`"
                )));
            };
            let Value::Array(questions) = questions else {
                return Err(ImportError::invalid(format!(
                    "`{level}.{year}.{category}` must be an array"
                )));
            };
            for question in questions {
                let Value::Object(question) = question else {
                    return Err(ImportError::invalid(format!(
                        "`{level}.{year}.{category}` must contain question objects"
                    )));
                };
                fill_from_path(question, level, year, category);
            }
        }
    }
    Ok(())
}

/// Fill `level`, `year` and `type` from the bucket path when a question
/// leaves them out or carries values the bank cannot file. Numeric ids are
/// read as strings.
fn fill_from_path(
    question: &mut Map<String, Value>,
    level: Level,
    year: &str,
    category: Category,
) {
    let level_ok = parses::<Level>(question, "level");
    let type_ok = parses::<Category>(question, "type");
    let year_ok = match question.get("year") {
        Some(Value::String(_)) => true,
        Some(Value::Number(n)) => n.is_i64(),
        _ => false,
    };

    if !level_ok {
        question.insert("level".to_string(), Value::from(level.as_str()));
    }
    if !type_ok {
        question.insert("type".to_string(), Value::from(category.as_str()));
    }
    if !year_ok {
        question.insert("year".to_string(), Value::from(year));
    }
    if let Some(id) = question.get("id").and_then(Value::as_number).map(ToString::to_string) {
        question.insert("id".to_string(), Value::from(id));
    }
}

fn parses<T: FromStr>(question: &Map<String, Value>, key: &str) -> bool {
    question
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|text| text.parse::<T>().is_ok())
}

/// Pretty-printed JSON of the full bank, keys in insertion order.
///
/// # Errors
///
/// Returns `ExportError::Serialize` if serialization fails.
pub fn export_bank(bank: &QuestionBank) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(bank)?)
}

/// Download name for an export made on `date`.
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("topik-questions-export-{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;

    const SAMPLE: &str = r#"{
        "topik1": {
            "2024": {
                "listening": [
                    { "id": "2024-l1-1", "year": "2024", "type": "listening", "level": "topik1",
                      "part": 1, "question": "q1", "options": ["a", "b", "c", "d"], "answer": 2 }
                ],
                "reading": []
            }
        },
        "topik2": {
            "2024": {
                "writing": [
                    { "id": "2024-w2-1", "year": "2024", "type": "writing", "level": "topik2",
                      "part": 1, "question": "essay", "answer": null }
                ]
            }
        }
    }"#;

    #[test]
    fn parses_valid_document() {
        let bank = parse_import(SAMPLE).unwrap();
        assert_eq!(bank.total_questions(), 2);
        assert_eq!(bank.bucket(Level::Topik1, "2024", Category::Listening)[0].answer(), Some(2));
    }

    #[test]
    fn rejects_unparsable_text() {
        let err = parse_import("{ not json").unwrap_err();
        assert!(matches!(err, ImportError::InvalidFormat { .. }));
    }

    #[test]
    fn rejects_missing_level_keys() {
        assert!(parse_import(r#"{ "questions": [] }"#).is_err());
        assert!(parse_import(r#"{ "topik1": null }"#).is_err());
        assert!(parse_import("[]").is_err());
    }

    #[test]
    fn rejects_wrong_shape_below_level() {
        assert!(parse_import(r#"{ "topik1": [] }"#).is_err());
        assert!(parse_import(r#"{ "topik1": { "2024": [] } }"#).is_err());
        assert!(parse_import(r#"{ "topik1": { "2024": { "listening": {} } } }"#).is_err());
        assert!(parse_import(r#"{ "topik1": { "2024": { "speaking": [] } } }"#).is_err());
    }

    #[test]
    fn accepts_one_level_and_ignores_unknown_keys() {
        let bank = parse_import(r#"{ "topik2": {}, "version": 3 }"#).unwrap();
        assert_eq!(bank.total_questions(), 0);
        assert!(bank.level(Level::Topik2).is_some());
        assert!(bank.level(Level::Topik1).is_none());
    }

    #[test]
    fn export_then_parse_reproduces_bank() {
        let bank = parse_import(SAMPLE).unwrap();
        let exported = export_bank(&bank).unwrap();
        assert!(exported.contains('\n'));
        let reparsed = parse_import(&exported).unwrap();
        assert_eq!(reparsed, bank);
    }

    fn only_question(raw: &str, level: Level, year: &str, category: Category) -> Question {
        let bank = parse_import(raw).unwrap();
        let bucket = bank.bucket(level, year, category);
        assert_eq!(bucket.len(), 1);
        bucket[0].clone()
    }

    #[test]
    fn missing_level_year_and_type_come_from_the_path() {
        let raw = r#"{ "topik1": { "2024": { "reading": [
            { "id": "2024-r1-9", "question": "q", "options": ["a", "b"], "answer": 1 }
        ] } } }"#;
        let question = only_question(raw, Level::Topik1, "2024", Category::Reading);
        assert_eq!(question.level, Level::Topik1);
        assert_eq!(question.year, "2024");
        assert_eq!(question.category(), Category::Reading);
        assert!(question.matches_path(Level::Topik1, "2024", Category::Reading));
    }

    #[test]
    fn numeric_year_and_null_fields_are_accepted() {
        let raw = r#"{ "topik2": { "2024": { "listening": [
            { "id": 7, "year": 2024, "type": "listening", "level": "topik2",
              "part": null, "question": "q", "options": null, "answer": null }
        ] } } }"#;
        let question = only_question(raw, Level::Topik2, "2024", Category::Listening);
        assert_eq!(question.id.as_str(), "7");
        assert_eq!(question.year, "2024");
        assert_eq!(question.part, 1);
        assert!(question.options().is_empty());
        assert!(!question.is_graded());
    }

    #[test]
    fn unknown_type_and_level_are_replaced_by_the_path() {
        let raw = r#"{ "topik1": { "2023": { "writing": [
            { "id": "x", "year": "2023", "type": "speaking", "level": "beginner",
              "question": "q" }
        ] } } }"#;
        let question = only_question(raw, Level::Topik1, "2023", Category::Writing);
        assert_eq!(question.category(), Category::Writing);
        assert_eq!(question.level, Level::Topik1);
    }

    #[test]
    fn unknown_question_fields_survive_export() {
        let raw = r#"{ "topik1": { "2024": { "reading": [
            { "id": "2024-r1-1", "year": "2024", "type": "reading", "level": "topik1",
              "part": 1, "question": "q", "options": ["a", "b"], "answer": 0,
              "tags": ["grammar"], "source": { "round": 91 } }
        ] } } }"#;
        let exported = export_bank(&parse_import(raw).unwrap()).unwrap();
        let exported: Value = serde_json::from_str(&exported).unwrap();
        let original: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(exported["topik1"], original["topik1"]);
    }

    #[test]
    fn rejects_entries_that_are_not_objects() {
        let err = parse_import(r#"{ "topik1": { "2024": { "reading": [42] } } }"#).unwrap_err();
        assert!(matches!(err, ImportError::InvalidFormat { .. }));
    }

    #[test]
    fn export_file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "topik-questions-export-2024-03-09.json");
    }
}
