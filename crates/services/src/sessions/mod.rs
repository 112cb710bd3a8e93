mod plan;
mod progress;
mod service;
mod ticker;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{SessionBuilder, SessionMode, SessionPlan, SessionRequest};
pub use progress::SessionProgress;
pub use service::{Direction, PracticeSession, Step};
pub use ticker::{CountdownTicker, Tick};
pub use view::{OutcomeStatus, QuestionOutcome, SessionResults};
pub use workflow::{Advance, SessionController, SessionPhase, TickReport};
