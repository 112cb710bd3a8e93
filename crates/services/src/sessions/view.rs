use topik_core::model::{AnswerSheet, Question, QuestionId, Score};

use super::plan::SessionMode;
use crate::persistence::Durability;

/// How a single question ended up in a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Correct,
    Incorrect,
    Unanswered,
    /// No answer key (writing prompts); never scored.
    Ungraded,
}

/// Presentation-agnostic review line for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub id: QuestionId,
    pub selected: Option<usize>,
    pub correct: Option<usize>,
    pub status: OutcomeStatus,
}

impl QuestionOutcome {
    #[must_use]
    pub fn from_question(question: &Question, answers: &AnswerSheet) -> Self {
        let selected = answers.get(&question.id);
        let correct = question.answer();
        let status = match (correct, selected) {
            (None, _) => OutcomeStatus::Ungraded,
            (Some(_), None) => OutcomeStatus::Unanswered,
            (Some(_), Some(_)) if question.is_correct(selected) => OutcomeStatus::Correct,
            (Some(_), Some(_)) => OutcomeStatus::Incorrect,
        };
        Self {
            id: question.id.clone(),
            selected,
            correct,
            status,
        }
    }
}

/// Read-only results of a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResults {
    pub mode: SessionMode,
    pub score: Score,
    pub outcomes: Vec<QuestionOutcome>,
    /// Ids added to the wrong-answer set by this session.
    pub newly_missed: Vec<QuestionId>,
    /// Whether the wrong-answer update reached storage; `None` if nothing changed.
    pub durability: Option<Durability>,
    /// Whether the session ended because the countdown ran out.
    pub timed_out: bool,
}

impl SessionResults {
    pub(crate) fn build(
        mode: SessionMode,
        questions: &[Question],
        answers: &AnswerSheet,
        timed_out: bool,
    ) -> Self {
        Self {
            mode,
            score: Score::compute(questions, answers),
            outcomes: questions
                .iter()
                .map(|q| QuestionOutcome::from_question(q, answers))
                .collect(),
            newly_missed: Vec::new(),
            durability: None,
            timed_out,
        }
    }

    #[must_use]
    pub fn outcome(&self, id: &QuestionId) -> Option<&QuestionOutcome> {
        self.outcomes.iter().find(|o| &o.id == id)
    }
}
