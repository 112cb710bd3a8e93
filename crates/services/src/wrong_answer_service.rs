use storage::repository::Storage;
use topik_core::model::{AnswerSheet, Question, QuestionId, WeakAreaBreakdown, WrongAnswerSet};

use crate::persistence::Durability;

/// Ids newly added to the wrong-answer set by a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMisses {
    pub added: Vec<QuestionId>,
    /// `None` when nothing was added and nothing was written.
    pub durability: Option<Durability>,
}

/// Owns the wrong-answer set and writes it through to storage.
#[derive(Clone)]
pub struct WrongAnswerService {
    storage: Storage,
    set: WrongAnswerSet,
}

impl WrongAnswerService {
    #[must_use]
    pub fn new(storage: Storage, set: WrongAnswerSet) -> Self {
        Self { storage, set }
    }

    #[must_use]
    pub fn set(&self) -> &WrongAnswerSet {
        &self.set
    }

    #[must_use]
    pub fn breakdown(&self) -> WeakAreaBreakdown {
        self.set.breakdown()
    }

    /// Record the misses of a finished session.
    pub async fn record_misses(
        &mut self,
        questions: &[Question],
        answers: &AnswerSheet,
    ) -> RecordedMisses {
        let added = self.set.record_misses(questions, answers);
        if added.is_empty() {
            return RecordedMisses {
                added,
                durability: None,
            };
        }
        tracing::info!(added = added.len(), total = self.set.len(), "recorded wrong answers");
        RecordedMisses {
            added,
            durability: Some(self.persist().await),
        }
    }

    /// Empty the set; the empty list is persisted too.
    pub async fn clear(&mut self) -> Durability {
        self.set.clear();
        tracing::info!("wrong answers cleared");
        self.persist().await
    }

    async fn persist(&self) -> Durability {
        Durability::from_write(
            self.storage.save_wrong_answers(&self.set).await,
            "wrong answers",
        )
    }
}
