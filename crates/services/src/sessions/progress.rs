use topik_core::countdown::format_clock;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    /// Zero-based index of the current question.
    pub cursor: usize,
    /// Seconds left on an armed countdown.
    pub remaining_secs: Option<u32>,
    pub is_complete: bool,
}

impl SessionProgress {
    /// `MM:SS` of the remaining time, if the session is timed.
    #[must_use]
    pub fn clock_label(&self) -> Option<String> {
        self.remaining_secs.map(format_clock)
    }
}
