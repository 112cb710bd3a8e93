use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use topik_core::model::{Question, QuestionBank, WrongAnswerSet};

/// Key holding the JSON array of missed questions.
pub const WRONG_ANSWERS_KEY: &str = "wrongAnswers";

/// Key holding the JSON question bank.
pub const QUESTION_BANK_KEY: &str = "questionBank";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable string store addressed by key.
///
/// Values are opaque JSON text; the typed helpers on [`Storage`] do the
/// encoding.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| StorageError::Connection("poisoned lock".into()))?;
        Ok(guard.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| StorageError::Connection("poisoned lock".into()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Aggregate storage facade used by the services layer.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        Self { kv }
    }

    /// Load the persisted question bank, if one was ever saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored value does not
    /// decode, or any backend error.
    pub async fn load_bank(&self) -> Result<Option<QuestionBank>, StorageError> {
        self.kv
            .load(QUESTION_BANK_KEY)
            .await?
            .map(|raw| decode(&raw))
            .transpose()
    }

    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    pub async fn save_bank(&self, bank: &QuestionBank) -> Result<(), StorageError> {
        self.kv.save(QUESTION_BANK_KEY, &encode(bank)?).await
    }

    /// Load the persisted wrong-answer set, if one was ever saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored value does not
    /// decode, or any backend error.
    pub async fn load_wrong_answers(&self) -> Result<Option<WrongAnswerSet>, StorageError> {
        let questions: Option<Vec<Question>> = self
            .kv
            .load(WRONG_ANSWERS_KEY)
            .await?
            .map(|raw| decode(&raw))
            .transpose()?;
        Ok(questions.map(WrongAnswerSet::from_persisted))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    pub async fn save_wrong_answers(&self, set: &WrongAnswerSet) -> Result<(), StorageError> {
        self.kv.save(WRONG_ANSWERS_KEY, &encode(set)?).await
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|err| StorageError::Serialization(err.to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|err| StorageError::Serialization(err.to_string()))
}
