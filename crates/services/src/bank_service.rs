use storage::repository::Storage;
use topik_core::model::{
    BankStatistics, Category, ConfirmReplace, Level, MergeReport, Question, QuestionBank,
    QuestionId, UpsertOutcome,
};

use crate::error::BankServiceError;
use crate::persistence::Durability;

/// Result of adding or replacing a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertResult {
    pub outcome: UpsertOutcome,
    /// `None` when the change was declined and nothing was written.
    pub durability: Option<Durability>,
}

/// Owns the question bank and writes it through to storage after every change.
#[derive(Clone)]
pub struct BankService {
    storage: Storage,
    bank: QuestionBank,
}

impl BankService {
    #[must_use]
    pub fn new(storage: Storage, bank: QuestionBank) -> Self {
        Self { storage, bank }
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn statistics(&self) -> BankStatistics {
        self.bank.statistics()
    }

    #[must_use]
    pub fn years(&self, level: Level) -> Vec<&str> {
        self.bank.years(level)
    }

    #[must_use]
    pub fn suggest_id(&self, level: Level, year: &str, category: Category) -> QuestionId {
        self.bank.suggest_id(level, year, category)
    }

    /// Validate and insert a manually entered question.
    ///
    /// A question whose id already exists in its bucket replaces the old one
    /// only if `confirm` agrees.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::Question` if the question fails validation;
    /// the bank is left untouched.
    pub async fn upsert(
        &mut self,
        question: Question,
        confirm: &mut impl ConfirmReplace,
    ) -> Result<UpsertResult, BankServiceError> {
        question.validate()?;
        let id = question.id.clone();
        let outcome = self.bank.upsert(question, confirm);
        if !outcome.is_applied() {
            tracing::info!(%id, "replacement declined");
            return Ok(UpsertResult {
                outcome,
                durability: None,
            });
        }

        tracing::info!(%id, ?outcome, "question saved");
        Ok(UpsertResult {
            outcome,
            durability: Some(self.persist().await),
        })
    }

    /// Merge a validated partial bank.
    pub(crate) async fn merge(&mut self, partial: QuestionBank) -> (MergeReport, Durability) {
        let report = self.bank.merge(partial);
        for id in &report.drifted {
            tracing::warn!(%id, "question filed under a path that disagrees with its fields");
        }
        (report, self.persist().await)
    }

    /// Reset the bank to an empty `topik1`/`topik2` shell.
    pub async fn clear(&mut self) -> Durability {
        self.bank.clear();
        tracing::info!("question bank cleared");
        self.persist().await
    }

    async fn persist(&self) -> Durability {
        Durability::from_write(self.storage.save_bank(&self.bank).await, "question bank")
    }
}
