use serde::{Deserialize, Serialize};

use topik_core::model::{AnswerSheet, Question, QuestionId};
use topik_core::{Countdown, TickOutcome};

use super::plan::{SessionMode, SessionPlan};
use super::progress::SessionProgress;
use super::view::SessionResults;

/// Direction for stepping through a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Previous,
    Next,
}

/// What a step did to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved { cursor: usize },
    /// Already at the boundary; `Previous` stays put.
    Stayed { cursor: usize },
    /// `Next` on the last question; the session should finish.
    PastEnd,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory practice session over a snapshot of questions.
///
/// Answers may be changed freely until the session is completed; the cursor
/// always stays within `[0, len - 1]`.
pub struct PracticeSession {
    mode: SessionMode,
    questions: Vec<Question>,
    cursor: usize,
    answers: AnswerSheet,
    countdown: Countdown,
    results: Option<SessionResults>,
}

impl PracticeSession {
    /// Start a session from a plan, arming its countdown if it is timed.
    #[must_use]
    pub fn new(plan: SessionPlan) -> Self {
        let countdown = plan.timer_secs.map_or_else(Countdown::disarmed, Countdown::armed);
        Self {
            mode: plan.mode,
            questions: plan.questions,
            cursor: 0,
            answers: AnswerSheet::new(),
            countdown,
            results: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.results.is_some()
    }

    #[must_use]
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    #[must_use]
    pub fn results(&self) -> Option<&SessionResults> {
        self.results.as_ref()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.questions.len(),
            answered: self.answers.len(),
            cursor: self.cursor,
            remaining_secs: self
                .countdown
                .is_armed()
                .then(|| self.countdown.remaining()),
            is_complete: self.is_complete(),
        }
    }

    /// Record or overwrite the selected option for a question.
    pub fn submit(&mut self, id: QuestionId, option: usize) {
        self.answers.record(id, option);
    }

    pub fn step(&mut self, direction: Direction) -> Step {
        let last = self.questions.len().saturating_sub(1);
        match direction {
            Direction::Previous if self.cursor == 0 => Step::Stayed { cursor: 0 },
            Direction::Previous => {
                self.cursor -= 1;
                Step::Moved {
                    cursor: self.cursor,
                }
            }
            Direction::Next if self.cursor >= last => Step::PastEnd,
            Direction::Next => {
                self.cursor += 1;
                Step::Moved {
                    cursor: self.cursor,
                }
            }
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.countdown.tick()
    }

    /// Disarm the countdown and freeze the results.
    ///
    /// Calling this again returns the already computed results.
    pub fn complete(&mut self, timed_out: bool) -> &mut SessionResults {
        self.countdown.disarm();
        let (mode, questions, answers) = (self.mode, &self.questions, &self.answers);
        self.results
            .get_or_insert_with(|| SessionResults::build(mode, questions, answers, timed_out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topik_core::model::{Level, QuestionKind};

    fn plan(count: usize, timer_secs: Option<u32>) -> SessionPlan {
        let questions = (0..count)
            .map(|i| Question {
                id: QuestionId::new(format!("q{i}")),
                year: "2023".into(),
                level: Level::Topik1,
                part: 1,
                prompt: "q".into(),
                explanation: None,
                extra: Default::default(),
                kind: QuestionKind::Listening {
                    content: None,
                    audio_url: None,
                    options: vec!["a".into(), "b".into()],
                    answer: Some(1),
                },
            })
            .collect();
        SessionPlan {
            mode: SessionMode::Regular,
            questions,
            timer_secs,
        }
    }

    #[test]
    fn cursor_is_clamped_and_next_on_last_is_past_end() {
        let mut session = PracticeSession::new(plan(2, None));
        assert_eq!(session.step(Direction::Previous), Step::Stayed { cursor: 0 });
        assert_eq!(session.step(Direction::Next), Step::Moved { cursor: 1 });
        assert_eq!(session.step(Direction::Next), Step::PastEnd);
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.step(Direction::Previous), Step::Moved { cursor: 0 });
    }

    #[test]
    fn submit_overwrites_without_moving() {
        let mut session = PracticeSession::new(plan(3, None));
        session.submit(QuestionId::new("q0"), 0);
        session.submit(QuestionId::new("q0"), 1);
        assert_eq!(session.answers().get(&QuestionId::new("q0")), Some(1));
        assert_eq!(session.progress().answered, 1);
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn timed_plan_arms_countdown_and_complete_disarms_it() {
        let mut session = PracticeSession::new(plan(1, Some(1800)));
        assert_eq!(session.progress().remaining_secs, Some(1800));
        assert_eq!(session.progress().clock_label().as_deref(), Some("30:00"));

        session.submit(QuestionId::new("q0"), 1);
        let score = session.complete(false).score;
        assert_eq!(score.percentage, 100);
        assert!(!session.countdown().is_armed());
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert_eq!(session.progress().remaining_secs, None);
    }

    #[test]
    fn untimed_plan_never_ticks() {
        let mut session = PracticeSession::new(plan(1, None));
        assert_eq!(session.tick(), TickOutcome::Idle);
    }
}
