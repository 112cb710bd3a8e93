use serde::{Deserialize, Serialize};

use topik_core::model::{Category, Level, Question, QuestionBank, WrongAnswerSet};

use crate::config::MockDurations;

/// What kind of practice to set up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum SessionRequest {
    /// One `(level, year, category)` bucket, untimed.
    Regular {
        level: Level,
        year: String,
        category: Category,
    },
    /// Every category of a level's year, timed.
    Mock { level: Level, year: String },
    /// The current wrong-answer set, untimed.
    WrongReview,
}

/// Practice mode of a planned session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionMode {
    Regular,
    Mock,
    WrongReview,
}

impl SessionRequest {
    #[must_use]
    pub fn mode(&self) -> SessionMode {
        match self {
            SessionRequest::Regular { .. } => SessionMode::Regular,
            SessionRequest::Mock { .. } => SessionMode::Mock,
            SessionRequest::WrongReview => SessionMode::WrongReview,
        }
    }
}

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub mode: SessionMode,
    pub questions: Vec<Question>,
    /// Countdown length; `None` for untimed sessions.
    pub timer_secs: Option<u32>,
}

impl SessionPlan {
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Snapshots the questions a request selects.
pub struct SessionBuilder<'a> {
    bank: &'a QuestionBank,
    wrong_answers: &'a WrongAnswerSet,
    durations: MockDurations,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(bank: &'a QuestionBank, wrong_answers: &'a WrongAnswerSet) -> Self {
        Self {
            bank,
            wrong_answers,
            durations: MockDurations::default(),
        }
    }

    #[must_use]
    pub fn with_durations(mut self, durations: MockDurations) -> Self {
        self.durations = durations;
        self
    }

    /// Build the plan for `request`.
    ///
    /// Missing years or buckets yield an empty plan rather than an error.
    #[must_use]
    pub fn build(self, request: &SessionRequest) -> SessionPlan {
        let mode = request.mode();
        match request {
            SessionRequest::Regular {
                level,
                year,
                category,
            } => SessionPlan {
                mode,
                questions: self.bank.bucket(*level, year, *category).to_vec(),
                timer_secs: None,
            },
            SessionRequest::Mock { level, year } => {
                let questions: Vec<Question> = level
                    .mock_categories()
                    .iter()
                    .flat_map(|category| self.bank.bucket(*level, year, *category))
                    .cloned()
                    .collect();
                let timer_secs = (!questions.is_empty()).then(|| self.durations.for_level(*level));
                SessionPlan {
                    mode,
                    questions,
                    timer_secs,
                }
            }
            SessionRequest::WrongReview => SessionPlan {
                mode,
                questions: self.wrong_answers.questions().to_vec(),
                timer_secs: None,
            },
        }
    }
}
