use storage::repository::{Storage, StorageError};
use topik_core::defaults::default_bank;
use topik_core::model::{
    ConfirmReplace, LearningOverview, Question, QuestionBank, QuestionId, WrongAnswerSet,
};

use crate::Clock;
use crate::bank_service::{BankService, UpsertResult};
use crate::config::AppConfig;
use crate::error::{AppStateError, BankServiceError, SessionError};
use crate::import_service::{ExportFile, ImportService, ImportSummary};
use crate::persistence::Durability;
use crate::sessions::{
    Advance, Direction, SessionController, SessionPhase, SessionRequest, SessionResults, Tick,
    TickReport,
};
use crate::wrong_answer_service::WrongAnswerService;

/// Everything the app works with, owned in one place and passed explicitly.
pub struct AppState {
    config: AppConfig,
    bank: BankService,
    wrong_answers: WrongAnswerService,
    imports: ImportService,
    session: SessionController,
}

impl AppState {
    /// Build state backed by `SQLite` at `config.db_url`.
    ///
    /// # Errors
    ///
    /// Returns `AppStateError` if the database cannot be opened or read.
    pub async fn new_sqlite(config: AppConfig, clock: Clock) -> Result<Self, AppStateError> {
        let storage = Storage::sqlite(&config.db_url).await?;
        Self::load(storage, config, clock).await
    }

    /// Load persisted state, falling back to the bundled bank and an empty
    /// wrong-answer set when nothing usable is stored.
    ///
    /// # Errors
    ///
    /// Returns `AppStateError::Storage` if the store cannot be read at all,
    /// or `AppStateError::Defaults` if the bundled bank is unreadable.
    pub async fn load(
        storage: Storage,
        config: AppConfig,
        clock: Clock,
    ) -> Result<Self, AppStateError> {
        let bank = match or_fallback(storage.load_bank().await, "question bank")? {
            Some(bank) => bank,
            None => default_bank().map_err(AppStateError::Defaults)?,
        };
        let wrong_answers =
            or_fallback(storage.load_wrong_answers().await, "wrong answers")?.unwrap_or_default();

        tracing::info!(
            questions = bank.total_questions(),
            wrong_answers = wrong_answers.len(),
            "app state loaded"
        );

        Ok(Self {
            session: SessionController::new(config.mock_durations),
            bank: BankService::new(storage.clone(), bank),
            wrong_answers: WrongAnswerService::new(storage, wrong_answers),
            imports: ImportService::new(clock),
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        self.bank.bank()
    }

    #[must_use]
    pub fn bank_service(&self) -> &BankService {
        &self.bank
    }

    #[must_use]
    pub fn wrong_answers(&self) -> &WrongAnswerSet {
        self.wrong_answers.set()
    }

    #[must_use]
    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// Headline numbers for the learning-analysis view.
    #[must_use]
    pub fn overview(&self) -> LearningOverview {
        LearningOverview::new(self.bank.bank().total_questions(), self.wrong_answers.breakdown())
    }

    // ─── Question bank ────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `BankServiceError::Question` if the question is invalid.
    pub async fn add_question(
        &mut self,
        question: Question,
        confirm: &mut impl ConfirmReplace,
    ) -> Result<UpsertResult, BankServiceError> {
        self.bank.upsert(question, confirm).await
    }

    pub async fn clear_bank(&mut self) -> Durability {
        self.bank.clear().await
    }

    /// # Errors
    ///
    /// Returns `BankServiceError::Import` if `raw` is malformed.
    pub async fn import(&mut self, raw: &str) -> Result<ImportSummary, BankServiceError> {
        self.imports.import(raw, &mut self.bank).await
    }

    /// # Errors
    ///
    /// Returns `BankServiceError::Export` if serialization fails.
    pub fn export(&self) -> Result<ExportFile, BankServiceError> {
        self.imports.export(&self.bank)
    }

    pub async fn clear_wrong_answers(&mut self) -> Durability {
        self.wrong_answers.clear().await
    }

    // ─── Sessions ─────────────────────────────────────────────────────────────

    pub fn start_session(&mut self, request: &SessionRequest) -> SessionPhase {
        self.session
            .setup(request, self.bank.bank(), self.wrong_answers.set())
    }

    /// # Errors
    ///
    /// Returns `SessionError` when the session does not accept input.
    pub fn submit_answer(&mut self, id: QuestionId, option: usize) -> Result<(), SessionError> {
        self.session.submit_answer(id, option)
    }

    /// # Errors
    ///
    /// Returns `SessionError` when the session does not accept input.
    pub async fn advance(&mut self, direction: Direction) -> Result<Advance, SessionError> {
        self.session.advance(direction, &mut self.wrong_answers).await
    }

    /// # Errors
    ///
    /// Returns `SessionError` when there is no running session.
    pub async fn finish(&mut self) -> Result<&SessionResults, SessionError> {
        self.session.finish(&mut self.wrong_answers).await
    }

    pub async fn tick(&mut self, tick: Tick) -> TickReport {
        self.session.tick(tick, &mut self.wrong_answers).await
    }
}

/// Undecodable stored values are replaced by defaults; other failures propagate.
fn or_fallback<T>(
    loaded: Result<Option<T>, StorageError>,
    what: &'static str,
) -> Result<Option<T>, StorageError> {
    match loaded {
        Err(StorageError::Serialization(reason)) => {
            tracing::warn!(what, %reason, "stored value is unreadable; using defaults");
            Ok(None)
        }
        other => other,
    }
}
