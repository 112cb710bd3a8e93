use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::level::{Category, Level};

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 6;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question text cannot be empty")]
    EmptyPrompt,

    #[error("year cannot be empty")]
    EmptyYear,

    #[error("part must be >= 1")]
    InvalidPart,

    #[error("expected {MIN_OPTIONS}-{MAX_OPTIONS} options, got {count}")]
    OptionCount { count: usize },

    #[error("answer index {answer} is out of range for {options} options")]
    AnswerOutOfRange { answer: usize, options: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Accepts `2` as well as `"2"`, which hand-edited files contain. `null`
/// reads as absent.
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<T> {
        Number(T),
        Text(String),
    }

    match Option::<Lenient<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Lenient::Number(n)) => Ok(Some(n)),
        Some(Lenient::Text(text)) => text.trim().parse().map(Some).map_err(D::Error::custom),
    }
}

/// Years are strings on the wire, but `2024` is read as `"2024"`.
fn lenient_year<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Text(String),
        Number(i64),
    }

    Ok(match Year::deserialize(deserializer)? {
        Year::Text(text) => text,
        Year::Number(n) => n.to_string(),
    })
}

/// Shape-specific payload of a question, keyed by its `type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    Listening {
        content: Option<String>,
        audio_url: Option<String>,
        options: Vec<String>,
        answer: Option<usize>,
    },
    Reading {
        content: Option<String>,
        options: Vec<String>,
        answer: Option<usize>,
    },
    Writing {
        content: Option<String>,
        image_url: Option<String>,
    },
}

impl QuestionKind {
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            QuestionKind::Listening { .. } => Category::Listening,
            QuestionKind::Reading { .. } => Category::Reading,
            QuestionKind::Writing { .. } => Category::Writing,
        }
    }
}

/// A single practice item.
///
/// `level`, `year` and the kind's category duplicate the bank path the question
/// is filed under. Wire fields the model does not interpret are kept in
/// `extra` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    pub id: QuestionId,
    pub year: String,
    pub level: Level,
    pub part: u32,
    pub prompt: String,
    pub explanation: Option<String>,
    pub kind: QuestionKind,
    pub extra: Map<String, Value>,
}

/// Flat wire shape of a question.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionRecord {
    #[serde(default)]
    id: QuestionId,
    #[serde(deserialize_with = "lenient_year")]
    year: String,
    #[serde(rename = "type")]
    category: Category,
    level: Level,
    #[serde(default, deserialize_with = "lenient_number")]
    part: Option<u32>,
    #[serde(default)]
    question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    answer: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn keep(extra: &mut Map<String, Value>, key: &str, value: Option<impl Into<Value>>) {
    if let Some(value) = value {
        extra.insert(key.to_string(), value.into());
    }
}

impl From<QuestionRecord> for Question {
    fn from(record: QuestionRecord) -> Self {
        let mut extra = record.extra;
        let kind = match record.category {
            Category::Listening => {
                keep(&mut extra, "imageUrl", record.image_url);
                QuestionKind::Listening {
                    content: record.content,
                    audio_url: record.audio_url,
                    options: record.options.unwrap_or_default(),
                    answer: record.answer,
                }
            }
            Category::Reading => {
                keep(&mut extra, "audioUrl", record.audio_url);
                keep(&mut extra, "imageUrl", record.image_url);
                QuestionKind::Reading {
                    content: record.content,
                    options: record.options.unwrap_or_default(),
                    answer: record.answer,
                }
            }
            Category::Writing => {
                keep(&mut extra, "audioUrl", record.audio_url);
                keep(&mut extra, "options", record.options);
                keep(&mut extra, "answer", record.answer);
                QuestionKind::Writing {
                    content: record.content,
                    image_url: record.image_url,
                }
            }
        };

        Self {
            id: record.id,
            year: record.year,
            level: record.level,
            part: record.part.unwrap_or(1),
            prompt: record.question,
            explanation: record.explanation,
            kind,
            extra,
        }
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        let category = question.category();
        let mut record = Self {
            id: question.id,
            year: question.year,
            category,
            level: question.level,
            part: Some(question.part),
            question: question.prompt,
            content: None,
            audio_url: None,
            image_url: None,
            options: None,
            answer: None,
            explanation: question.explanation,
            extra: question.extra,
        };
        match question.kind {
            QuestionKind::Listening {
                content,
                audio_url,
                options,
                answer,
            } => {
                record.content = content;
                record.audio_url = audio_url;
                record.options = Some(options);
                record.answer = answer;
            }
            QuestionKind::Reading {
                content,
                options,
                answer,
            } => {
                record.content = content;
                record.options = Some(options);
                record.answer = answer;
            }
            QuestionKind::Writing { content, image_url } => {
                record.content = content;
                record.image_url = image_url;
            }
        }
        record
    }
}

impl Question {
    #[must_use]
    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Correct option index, or `None` for ungraded items.
    #[must_use]
    pub fn answer(&self) -> Option<usize> {
        match &self.kind {
            QuestionKind::Listening { answer, .. } | QuestionKind::Reading { answer, .. } => {
                *answer
            }
            QuestionKind::Writing { .. } => None,
        }
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        match &self.kind {
            QuestionKind::Listening { options, .. } | QuestionKind::Reading { options, .. } => {
                options
            }
            QuestionKind::Writing { .. } => &[],
        }
    }

    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            QuestionKind::Listening { content, .. }
            | QuestionKind::Reading { content, .. }
            | QuestionKind::Writing { content, .. } => content.as_deref(),
        }
    }

    #[must_use]
    pub fn is_graded(&self) -> bool {
        self.answer().is_some()
    }

    /// Whether `selected` matches the correct option.
    ///
    /// Ungraded questions are never correct; a missing selection never is either.
    #[must_use]
    pub fn is_correct(&self, selected: Option<usize>) -> bool {
        match (self.answer(), selected) {
            (Some(answer), Some(selected)) => answer == selected,
            _ => false,
        }
    }

    /// Whether this question is filed consistently under the given bank path.
    #[must_use]
    pub fn matches_path(&self, level: Level, year: &str, category: Category) -> bool {
        self.level == level && self.year == year && self.category() == category
    }

    /// Check the invariants required for manually entered questions.
    ///
    /// Imported questions are accepted as-is and do not go through this check.
    ///
    /// # Errors
    ///
    /// Returns the first `QuestionError` found.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.id.is_blank() {
            return Err(QuestionError::EmptyId);
        }
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.year.trim().is_empty() {
            return Err(QuestionError::EmptyYear);
        }
        if self.part == 0 {
            return Err(QuestionError::InvalidPart);
        }
        if !self.category().is_gradable() {
            return Ok(());
        }

        let count = self.options().len();
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&count) {
            return Err(QuestionError::OptionCount { count });
        }
        if let Some(answer) = self.answer() {
            if answer >= count {
                return Err(QuestionError::AnswerOutOfRange {
                    answer,
                    options: count,
                });
            }
        }
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
