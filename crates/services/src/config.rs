//! Environment-driven configuration for the practice engine.

use topik_core::model::Level;

pub const DEFAULT_DB_URL: &str = "sqlite://topik.sqlite3";

/// Countdown length of a mock exam, per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockDurations {
    pub topik1_secs: u32,
    pub topik2_secs: u32,
}

impl MockDurations {
    #[must_use]
    pub fn for_level(&self, level: Level) -> u32 {
        match level {
            Level::Topik1 => self.topik1_secs,
            Level::Topik2 => self.topik2_secs,
        }
    }
}

impl Default for MockDurations {
    fn default() -> Self {
        Self {
            topik1_secs: Level::Topik1.mock_duration_secs(),
            topik2_secs: Level::Topik2.mock_duration_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_url: String,
    pub mock_durations: MockDurations,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.to_owned(),
            mock_durations: MockDurations::default(),
        }
    }
}

impl AppConfig {
    /// Read `TOPIK_DB_URL`, `TOPIK_MOCK_SECS_TOPIK1` and `TOPIK_MOCK_SECS_TOPIK2`.
    ///
    /// Missing, blank or unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let db_url = lookup("TOPIK_DB_URL")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.db_url);
        let secs = |key: &str, fallback: u32| {
            lookup(key)
                .and_then(|value| value.trim().parse::<u32>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(fallback)
        };

        Self {
            db_url,
            mock_durations: MockDurations {
                topik1_secs: secs("TOPIK_MOCK_SECS_TOPIK1", defaults.mock_durations.topik1_secs),
                topik2_secs: secs("TOPIK_MOCK_SECS_TOPIK2", defaults.mock_durations.topik2_secs),
            },
        }
    }
}
