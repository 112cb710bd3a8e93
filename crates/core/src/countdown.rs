//! Cooperative exam countdown.
//!
//! The countdown never schedules anything itself: whoever owns it calls
//! [`Countdown::tick`] once per elapsed second. Reaching zero while armed
//! reports [`TickOutcome::Expired`] exactly once and disarms the countdown.

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is not armed; nothing happened.
    Idle,
    Running { remaining: u32 },
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown {
    remaining: u32,
    armed: bool,
}

impl Countdown {
    /// An armed countdown starting at `seconds`.
    #[must_use]
    pub fn armed(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            armed: true,
        }
    }

    /// A countdown that never fires.
    #[must_use]
    pub fn disarmed() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.armed {
            return TickOutcome::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.armed = false;
            return TickOutcome::Expired;
        }
        TickOutcome::Running {
            remaining: self.remaining,
        }
    }
}

/// `MM:SS` rendering of a second count; minutes grow past two digits if needed.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_exactly_once_after_full_duration() {
        let mut countdown = Countdown::armed(3);
        assert_eq!(countdown.tick(), TickOutcome::Running { remaining: 2 });
        assert_eq!(countdown.tick(), TickOutcome::Running { remaining: 1 });
        assert_eq!(countdown.tick(), TickOutcome::Expired);
        assert!(!countdown.is_armed());
        assert_eq!(countdown.tick(), TickOutcome::Idle);
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn disarmed_countdown_never_fires() {
        let mut countdown = Countdown::armed(1);
        countdown.disarm();
        assert_eq!(countdown.tick(), TickOutcome::Idle);
        assert_eq!(Countdown::disarmed().tick(), TickOutcome::Idle);
    }

    #[test]
    fn zero_length_countdown_expires_on_first_tick() {
        let mut countdown = Countdown::armed(0);
        assert_eq!(countdown.tick(), TickOutcome::Expired);
    }

    #[test]
    fn topik1_mock_runs_1800_ticks() {
        let mut countdown = Countdown::armed(1800);
        let mut ticks = 0;
        loop {
            ticks += 1;
            if countdown.tick() == TickOutcome::Expired {
                break;
            }
        }
        assert_eq!(ticks, 1800);
    }

    #[test]
    fn format_clock_pads_minutes_and_seconds() {
        assert_eq!(format_clock(1800), "30:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(0), "00:00");
    }
}
