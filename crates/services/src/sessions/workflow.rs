use topik_core::TickOutcome;
use topik_core::model::{Question, QuestionBank, QuestionId, WrongAnswerSet};

use super::plan::{SessionBuilder, SessionRequest};
use super::progress::SessionProgress;
use super::service::{Direction, PracticeSession, Step};
use super::ticker::{CountdownTicker, Tick};
use super::view::SessionResults;
use crate::config::MockDurations;
use crate::error::SessionError;
use crate::wrong_answer_service::WrongAnswerService;

/// Lifecycle of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    /// Set up with no questions; input is rejected until the next setup.
    Setup,
    InProgress,
    Completed,
}

/// Result of stepping through the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved { cursor: usize },
    Stayed { cursor: usize },
    /// `Next` on the last question finished the session.
    Finished,
}

/// Result of feeding a tick to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickReport {
    /// Stale generation, no session, or no armed countdown.
    Ignored,
    Running { remaining: u32 },
    /// Time ran out and the session was finished.
    Expired,
}

/// Drives one practice session at a time.
///
/// Every `setup` replaces the previous session and bumps the generation, so
/// ticks issued for an older session are ignored.
pub struct SessionController {
    durations: MockDurations,
    generation: u64,
    session: Option<PracticeSession>,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(MockDurations::default())
    }
}

impl SessionController {
    #[must_use]
    pub fn new(durations: MockDurations) -> Self {
        Self {
            durations,
            generation: 0,
            session: None,
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match &self.session {
            None => SessionPhase::Idle,
            Some(session) if session.is_complete() => SessionPhase::Completed,
            Some(session) if session.is_empty() => SessionPhase::Setup,
            Some(_) => SessionPhase::InProgress,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&PracticeSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.session.as_ref()?.current_question()
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        self.session.as_ref().map(PracticeSession::progress)
    }

    /// Results of the completed session, if any.
    #[must_use]
    pub fn results(&self) -> Option<&SessionResults> {
        self.session.as_ref()?.results()
    }

    /// A ticker for the current session, when it is timed and still running.
    ///
    /// Callable outside a runtime; the ticker's timer starts when it is first
    /// polled.
    #[must_use]
    pub fn ticker(&self) -> Option<CountdownTicker> {
        let session = self.session.as_ref()?;
        session
            .countdown()
            .is_armed()
            .then(|| CountdownTicker::new(self.generation))
    }

    /// Replace any current session with one built from `request`.
    pub fn setup(
        &mut self,
        request: &SessionRequest,
        bank: &QuestionBank,
        wrong_answers: &WrongAnswerSet,
    ) -> SessionPhase {
        let plan = SessionBuilder::new(bank, wrong_answers)
            .with_durations(self.durations)
            .build(request);
        self.generation += 1;
        tracing::info!(
            generation = self.generation,
            mode = ?plan.mode,
            questions = plan.total(),
            timer_secs = ?plan.timer_secs,
            "session set up"
        );
        self.session = Some(PracticeSession::new(plan));
        self.phase()
    }

    /// Record or overwrite an answer; the cursor does not move.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted`, `Empty` or `Completed` when the
    /// session does not accept input.
    pub fn submit_answer(&mut self, id: QuestionId, option: usize) -> Result<(), SessionError> {
        self.active_mut()?.submit(id, option);
        Ok(())
    }

    /// Move the cursor; `Next` on the last question finishes the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the session does not accept input.
    pub async fn advance(
        &mut self,
        direction: Direction,
        wrong_answers: &mut WrongAnswerService,
    ) -> Result<Advance, SessionError> {
        let step = self.active_mut()?.step(direction);
        match step {
            Step::Moved { cursor } => Ok(Advance::Moved { cursor }),
            Step::Stayed { cursor } => Ok(Advance::Stayed { cursor }),
            Step::PastEnd => {
                self.complete(wrong_answers, false).await?;
                Ok(Advance::Finished)
            }
        }
    }

    /// Score the session and record its misses.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when there is no running session.
    pub async fn finish(
        &mut self,
        wrong_answers: &mut WrongAnswerService,
    ) -> Result<&SessionResults, SessionError> {
        self.complete(wrong_answers, false).await
    }

    /// Feed one elapsed second to the countdown.
    pub async fn tick(&mut self, tick: Tick, wrong_answers: &mut WrongAnswerService) -> TickReport {
        if tick.generation != self.generation {
            tracing::debug!(
                tick = tick.generation,
                current = self.generation,
                "ignoring stale tick"
            );
            return TickReport::Ignored;
        }
        let Some(session) = self.session.as_mut() else {
            return TickReport::Ignored;
        };
        let outcome = session.tick();
        match outcome {
            TickOutcome::Idle => TickReport::Ignored,
            TickOutcome::Running { remaining } => {
                tracing::debug!(remaining, "countdown tick");
                TickReport::Running { remaining }
            }
            TickOutcome::Expired => {
                tracing::info!(generation = self.generation, "time is up");
                match self.complete(wrong_answers, true).await {
                    Ok(_) => TickReport::Expired,
                    Err(_) => TickReport::Ignored,
                }
            }
        }
    }

    fn active_mut(&mut self) -> Result<&mut PracticeSession, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NotStarted)?;
        if session.is_complete() {
            return Err(SessionError::Completed);
        }
        if session.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(session)
    }

    async fn complete(
        &mut self,
        wrong_answers: &mut WrongAnswerService,
        timed_out: bool,
    ) -> Result<&SessionResults, SessionError> {
        let session = self.active_mut()?;
        let recorded = wrong_answers
            .record_misses(session.questions(), session.answers())
            .await;
        let results = session.complete(timed_out);
        results.newly_missed = recorded.added;
        results.durability = recorded.durability;
        tracing::info!(
            correct = results.score.correct_count,
            graded = results.score.graded,
            percentage = results.score.percentage,
            timed_out,
            "session completed"
        );
        Ok(results)
    }
}
