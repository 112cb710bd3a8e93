#![forbid(unsafe_code)]

pub mod app_state;
pub mod bank_service;
pub mod config;
pub mod error;
pub mod import_service;
pub mod persistence;
pub mod sessions;
pub mod wrong_answer_service;

pub use topik_core::Clock;
pub use sessions as session;

pub use app_state::AppState;
pub use bank_service::{BankService, UpsertResult};
pub use config::{AppConfig, MockDurations};
pub use error::{AppStateError, BankServiceError, SessionError};
pub use import_service::{ExportFile, ImportService, ImportSummary};
pub use persistence::Durability;
pub use wrong_answer_service::{RecordedMisses, WrongAnswerService};

pub use sessions::{
    Advance, CountdownTicker, Direction, SessionController, SessionPhase, SessionRequest,
    SessionResults, Tick, TickReport,
};
