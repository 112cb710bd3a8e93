use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::answers::AnswerSheet;
use crate::model::ids::QuestionId;
use crate::model::question::Question;
use crate::model::stats::WeakAreaBreakdown;

/// Previously missed questions, unique by id, in the order they were first missed.
///
/// Entries are only removed by `clear`; answering a question correctly later
/// does not take it out of the set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WrongAnswerSet {
    questions: Vec<Question>,
}

impl WrongAnswerSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries, dropping repeated ids (first one wins).
    #[must_use]
    pub fn from_persisted(questions: Vec<Question>) -> Self {
        let mut seen = HashSet::new();
        let questions = questions
            .into_iter()
            .filter(|q| seen.insert(q.id.clone()))
            .collect();
        Self { questions }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.questions.iter().any(|q| &q.id == id)
    }

    /// Append every graded question of a session that was answered wrongly or
    /// not at all, skipping ids already present.
    ///
    /// Returns the ids that were added, in session order.
    pub fn record_misses(&mut self, questions: &[Question], answers: &AnswerSheet) -> Vec<QuestionId> {
        let mut known: HashSet<QuestionId> = self.questions.iter().map(|q| q.id.clone()).collect();
        let mut added = Vec::new();
        for question in questions.iter().filter(|q| answers.is_miss(q)) {
            if known.insert(question.id.clone()) {
                added.push(question.id.clone());
                self.questions.push(question.clone());
            }
        }
        added
    }

    pub fn clear(&mut self) {
        self.questions.clear();
    }

    #[must_use]
    pub fn breakdown(&self) -> WeakAreaBreakdown {
        let mut breakdown = WeakAreaBreakdown::default();
        for question in &self.questions {
            breakdown.record(question.category());
        }
        breakdown
    }
}
