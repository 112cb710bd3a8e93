use crate::model::level::{Category, Level};

/// Year and question counts for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStatistics {
    pub level: Level,
    pub year_count: usize,
    pub question_count: usize,
}

/// Per-level counts over the whole bank. Always lists every level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankStatistics {
    pub levels: Vec<LevelStatistics>,
}

impl BankStatistics {
    #[must_use]
    pub fn for_level(&self, level: Level) -> LevelStatistics {
        self.levels
            .iter()
            .copied()
            .find(|stats| stats.level == level)
            .unwrap_or(LevelStatistics {
                level,
                year_count: 0,
                question_count: 0,
            })
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.levels.iter().map(|s| s.question_count).sum()
    }
}

/// Missed-question counts per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeakAreaBreakdown {
    pub listening: usize,
    pub reading: usize,
    pub writing: usize,
}

impl WeakAreaBreakdown {
    pub fn record(&mut self, category: Category) {
        match category {
            Category::Listening => self.listening += 1,
            Category::Reading => self.reading += 1,
            Category::Writing => self.writing += 1,
        }
    }

    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Listening => self.listening,
            Category::Reading => self.reading,
            Category::Writing => self.writing,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.listening + self.reading + self.writing
    }

    /// Share of all misses that fall in `category`, rounded to a whole percent.
    #[must_use]
    pub fn share(&self, category: Category) -> u8 {
        rounded_percentage(self.count(category), self.total())
    }
}

/// Headline numbers for the learning-analysis view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LearningOverview {
    pub total_questions: usize,
    pub wrong_count: usize,
    /// Share of the bank not sitting in the wrong-answer set; 100 when nothing was missed.
    pub accuracy: u8,
    pub weak_areas: WeakAreaBreakdown,
}

impl LearningOverview {
    #[must_use]
    pub fn new(total_questions: usize, weak_areas: WeakAreaBreakdown) -> Self {
        let wrong_count = weak_areas.total();
        let accuracy = if wrong_count == 0 || total_questions == 0 {
            100
        } else {
            rounded_percentage(total_questions.saturating_sub(wrong_count), total_questions)
        };
        Self {
            total_questions,
            wrong_count,
            accuracy,
            weak_areas,
        }
    }
}

/// `round(100 * part / whole)` with halves rounded up, or 0 when `whole` is 0.
#[must_use]
pub fn rounded_percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u128;
    let whole = whole as u128;
    let pct = (200 * part + whole) / (2 * whole);
    u8::try_from(pct).unwrap_or(100)
}
