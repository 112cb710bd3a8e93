use storage::repository::StorageError;

/// Whether a mutation reached durable storage.
///
/// Persistence failures never roll back in-memory state; they are reported
/// here so callers can surface them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Durability {
    Persisted,
    Unsaved { reason: String },
}

impl Durability {
    /// Convert a write result, logging a warning when it failed.
    pub(crate) fn from_write(result: Result<(), StorageError>, what: &'static str) -> Self {
        match result {
            Ok(()) => Self::Persisted,
            Err(err) => {
                tracing::warn!(error = %err, what, "failed to persist change; keeping in-memory state");
                Self::Unsaved {
                    reason: err.to_string(),
                }
            }
        }
    }

    #[must_use]
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted)
    }
}
