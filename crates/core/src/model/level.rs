use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelError {
    #[error("unknown exam level: {0}")]
    UnknownLevel(String),

    #[error("unknown question category: {0}")]
    UnknownCategory(String),
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// Exam level. TOPIK I covers beginner material, TOPIK II intermediate/advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Topik1,
    Topik2,
}

impl Level {
    pub const ALL: [Level; 2] = [Level::Topik1, Level::Topik2];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Topik1 => "topik1",
            Level::Topik2 => "topik2",
        }
    }

    /// Digit used in generated question ids (`2023-l1-1`, `2023-r2-4`).
    #[must_use]
    pub fn digit(self) -> char {
        match self {
            Level::Topik1 => '1',
            Level::Topik2 => '2',
        }
    }

    /// Length of a mock exam at this level, in seconds.
    ///
    /// TOPIK I runs 30 minutes, TOPIK II runs 50 minutes.
    #[must_use]
    pub fn mock_duration_secs(self) -> u32 {
        match self {
            Level::Topik1 => 30 * 60,
            Level::Topik2 => 50 * 60,
        }
    }

    /// Categories that make up a mock exam, in exam order.
    #[must_use]
    pub fn mock_categories(self) -> &'static [Category] {
        match self {
            Level::Topik1 => &[Category::Listening, Category::Reading],
            Level::Topik2 => &[Category::Listening, Category::Reading, Category::Writing],
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "topik1" => Ok(Level::Topik1),
            "topik2" => Ok(Level::Topik2),
            other => Err(LevelError::UnknownLevel(other.to_string())),
        }
    }
}

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

/// Question category; doubles as the `type` discriminator of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Listening,
    Reading,
    Writing,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Listening, Category::Reading, Category::Writing];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Listening => "listening",
            Category::Reading => "reading",
            Category::Writing => "writing",
        }
    }

    /// First letter of the category, used in generated ids.
    #[must_use]
    pub fn initial(self) -> char {
        match self {
            Category::Listening => 'l',
            Category::Reading => 'r',
            Category::Writing => 'w',
        }
    }

    /// Writing items are essays and never carry a correct option.
    #[must_use]
    pub fn is_gradable(self) -> bool {
        !matches!(self, Category::Writing)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "listening" => Ok(Category::Listening),
            "reading" => Ok(Category::Reading),
            "writing" => Ok(Category::Writing),
            other => Err(LevelError::UnknownCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_durations_match_exam_lengths() {
        assert_eq!(Level::Topik1.mock_duration_secs(), 1800);
        assert_eq!(Level::Topik2.mock_duration_secs(), 3000);
    }

    #[test]
    fn only_topik2_mock_includes_writing() {
        assert!(!Level::Topik1.mock_categories().contains(&Category::Writing));
        assert_eq!(
            Level::Topik2.mock_categories(),
            &[Category::Listening, Category::Reading, Category::Writing]
        );
    }

    #[test]
    fn parse_round_trips_wire_names() {
        for level in Level::ALL {
            assert_eq!(level.as_str().parse::<Level>().unwrap(), level);
        }
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("speaking".parse::<Category>().is_err());
        assert!("topik3".parse::<Level>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Level::Topik2).unwrap(), "\"topik2\"");
        assert_eq!(
            serde_json::from_str::<Category>("\"writing\"").unwrap(),
            Category::Writing
        );
    }
}
