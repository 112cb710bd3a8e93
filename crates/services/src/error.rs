//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use topik_core::model::QuestionError;
use topik_core::transfer::{ExportError, ImportError};

/// Errors emitted by `BankService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankServiceError {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors emitted by the session controller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no session has been set up")]
    NotStarted,
    #[error("no questions available for session")]
    Empty,
    #[error("session already completed")]
    Completed,
}

/// Errors emitted while bootstrapping the app state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppStateError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("bundled question bank is unreadable: {0}")]
    Defaults(#[source] ImportError),
}
