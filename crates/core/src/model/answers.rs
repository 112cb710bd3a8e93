use std::collections::HashMap;

use crate::model::ids::QuestionId;
use crate::model::question::Question;
use crate::model::stats::rounded_percentage;

/// Selected option per question id for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    selections: HashMap<QuestionId, usize>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record or overwrite the selection for a question.
    ///
    /// The option index is not checked against the question's option count.
    pub fn record(&mut self, id: QuestionId, option: usize) {
        self.selections.insert(id, option);
    }

    #[must_use]
    pub fn get(&self, id: &QuestionId) -> Option<usize> {
        self.selections.get(id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }

    /// Whether the selection for `question` differs from its correct answer.
    ///
    /// Ungraded questions are never misses.
    #[must_use]
    pub fn is_miss(&self, question: &Question) -> bool {
        question.is_graded() && !question.is_correct(self.get(&question.id))
    }
}

impl FromIterator<(QuestionId, usize)> for AnswerSheet {
    fn from_iter<T: IntoIterator<Item = (QuestionId, usize)>>(iter: T) -> Self {
        Self {
            selections: iter.into_iter().collect(),
        }
    }
}

/// Score of a finished session. Only graded questions count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub graded: usize,
    pub correct_count: usize,
    pub percentage: u8,
}

impl Score {
    #[must_use]
    pub fn compute(questions: &[Question], answers: &AnswerSheet) -> Self {
        let graded = questions.iter().filter(|q| q.is_graded()).count();
        let correct_count = questions
            .iter()
            .filter(|q| q.is_graded() && q.is_correct(answers.get(&q.id)))
            .count();
        Self {
            graded,
            correct_count,
            percentage: rounded_percentage(correct_count, graded),
        }
    }
}
