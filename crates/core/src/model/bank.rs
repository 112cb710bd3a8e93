use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;
use crate::model::level::{Category, Level};
use crate::model::question::Question;
use crate::model::stats::{BankStatistics, LevelStatistics};

//
// ─── REPLACEMENT CONFIRMATION ──────────────────────────────────────────────────
//

/// Decides whether an incoming question may replace one with the same id.
pub trait ConfirmReplace {
    fn confirm_replace(&mut self, existing: &Question, incoming: &Question) -> bool;
}

impl<F> ConfirmReplace for F
where
    F: FnMut(&Question, &Question) -> bool,
{
    fn confirm_replace(&mut self, existing: &Question, incoming: &Question) -> bool {
        self(existing, incoming)
    }
}

/// Fixed answer to the replacement prompt, for callers that decide up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacePolicy {
    Overwrite,
    Decline,
}

impl ConfirmReplace for ReplacePolicy {
    fn confirm_replace(&mut self, _existing: &Question, _incoming: &Question) -> bool {
        matches!(self, ReplacePolicy::Overwrite)
    }
}

/// What `QuestionBank::upsert` did with the incoming question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted { position: usize },
    Replaced { position: usize },
    /// An entry with the same id exists and replacement was declined.
    Declined,
}

impl UpsertOutcome {
    #[must_use]
    pub fn is_applied(self) -> bool {
        !matches!(self, UpsertOutcome::Declined)
    }
}

/// Result of merging a partial bank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added: usize,
    /// Questions whose own level/year/type disagree with the path they were filed under.
    pub drifted: Vec<QuestionId>,
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// Questions of one exam year, grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearSet {
    buckets: IndexMap<Category, Vec<Question>>,
}

impl YearSet {
    #[must_use]
    pub fn bucket(&self, category: Category) -> &[Question] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn categories(&self) -> impl Iterator<Item = (Category, &[Question])> {
        self.buckets.iter().map(|(c, qs)| (*c, qs.as_slice()))
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// All years of one level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelSet {
    years: IndexMap<String, YearSet>,
}

impl LevelSet {
    #[must_use]
    pub fn year(&self, year: &str) -> Option<&YearSet> {
        self.years.get(year)
    }

    pub fn years(&self) -> impl Iterator<Item = (&str, &YearSet)> {
        self.years.iter().map(|(y, set)| (y.as_str(), set))
    }

    #[must_use]
    pub fn year_count(&self) -> usize {
        self.years.len()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.years.values().map(YearSet::question_count).sum()
    }
}

/// Hierarchical question store: level → year → category → ordered questions.
///
/// Key order is insertion order and is preserved through serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    levels: IndexMap<Level, LevelSet>,
}

impl QuestionBank {
    /// A bank with no levels at all.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cleared shape: both levels present, no years.
    #[must_use]
    pub fn empty_shell() -> Self {
        let mut bank = Self::new();
        for level in Level::ALL {
            bank.levels.insert(level, LevelSet::default());
        }
        bank
    }

    pub fn clear(&mut self) {
        *self = Self::empty_shell();
    }

    #[must_use]
    pub fn level(&self, level: Level) -> Option<&LevelSet> {
        self.levels.get(&level)
    }

    pub fn levels(&self) -> impl Iterator<Item = (Level, &LevelSet)> {
        self.levels.iter().map(|(l, set)| (*l, set))
    }

    #[must_use]
    pub fn year(&self, level: Level, year: &str) -> Option<&YearSet> {
        self.level(level).and_then(|set| set.year(year))
    }

    /// Years available for a level, in insertion order.
    #[must_use]
    pub fn years(&self, level: Level) -> Vec<&str> {
        self.level(level)
            .map(|set| set.years().map(|(y, _)| y).collect())
            .unwrap_or_default()
    }

    /// Questions at one path; empty when any level of the path is missing.
    #[must_use]
    pub fn bucket(&self, level: Level, year: &str, category: Category) -> &[Question] {
        self.year(level, year)
            .map(|set| set.bucket(category))
            .unwrap_or_default()
    }

    /// Every question with the path it is filed under.
    pub fn iter(&self) -> impl Iterator<Item = (Level, &str, Category, &Question)> {
        self.levels.iter().flat_map(|(level, set)| {
            set.years.iter().flat_map(move |(year, year_set)| {
                year_set.buckets.iter().flat_map(move |(category, questions)| {
                    questions
                        .iter()
                        .map(move |q| (*level, year.as_str(), *category, q))
                })
            })
        })
    }

    #[must_use]
    pub fn find(&self, id: &QuestionId) -> Option<&Question> {
        self.iter().map(|(_, _, _, q)| q).find(|q| &q.id == id)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.levels.values().map(LevelSet::question_count).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_questions() == 0
    }

    fn bucket_mut(&mut self, level: Level, year: &str, category: Category) -> &mut Vec<Question> {
        self.levels
            .entry(level)
            .or_default()
            .years
            .entry(year.to_string())
            .or_default()
            .buckets
            .entry(category)
            .or_default()
    }

    /// Insert a question under its own `(level, year, type)` path.
    ///
    /// An existing entry with the same id in that bucket is replaced in place only
    /// when `confirm` agrees; otherwise the bank is left untouched.
    pub fn upsert(&mut self, question: Question, confirm: &mut impl ConfirmReplace) -> UpsertOutcome {
        let level = question.level;
        let category = question.category();
        let year = question.year.clone();
        let bucket = self.bucket_mut(level, &year, category);

        match bucket.iter().position(|q| q.id == question.id) {
            Some(position) => {
                if !confirm.confirm_replace(&bucket[position], &question) {
                    return UpsertOutcome::Declined;
                }
                bucket[position] = question;
                UpsertOutcome::Replaced { position }
            }
            None => {
                bucket.push(question);
                UpsertOutcome::Inserted {
                    position: bucket.len() - 1,
                }
            }
        }
    }

    /// Append every bucket of `partial` onto the matching bucket of this bank.
    ///
    /// Ids are not deduplicated; the count is the number of questions in `partial`.
    pub fn merge(&mut self, partial: QuestionBank) -> MergeReport {
        let mut report = MergeReport::default();
        for (level, level_set) in partial.levels {
            let target_level = self.levels.entry(level).or_default();
            for (year, year_set) in level_set.years {
                let target_year = target_level.years.entry(year.clone()).or_default();
                for (category, questions) in year_set.buckets {
                    report.drifted.extend(
                        questions
                            .iter()
                            .filter(|q| !q.matches_path(level, &year, category))
                            .map(|q| q.id.clone()),
                    );
                    report.added += questions.len();
                    target_year
                        .buckets
                        .entry(category)
                        .or_default()
                        .extend(questions);
                }
            }
        }
        report
    }

    #[must_use]
    pub fn statistics(&self) -> BankStatistics {
        let levels = Level::ALL
            .iter()
            .map(|level| {
                let set = self.level(*level);
                LevelStatistics {
                    level: *level,
                    year_count: set.map_or(0, LevelSet::year_count),
                    question_count: set.map_or(0, LevelSet::question_count),
                }
            })
            .collect();
        BankStatistics { levels }
    }

    /// Next free id of the form `<year>-<c><n>-<k>` for a bucket.
    #[must_use]
    pub fn suggest_id(&self, level: Level, year: &str, category: Category) -> QuestionId {
        let prefix = format!("{year}-{}{}", category.initial(), level.digit());
        let mut seq = self.bucket(level, year, category).len() + 1;
        loop {
            let candidate = QuestionId::new(format!("{prefix}-{seq}"));
            if self.find(&candidate).is_none() {
                return candidate;
            }
            seq += 1;
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::QuestionKind;

    fn question(id: &str, level: Level, year: &str, category: Category) -> Question {
        let kind = match category {
            Category::Listening => QuestionKind::Listening {
                content: None,
                audio_url: None,
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                answer: Some(1),
            },
            Category::Reading => QuestionKind::Reading {
                content: Some("passage".into()),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                answer: Some(0),
            },
            Category::Writing => QuestionKind::Writing {
                content: None,
                image_url: None,
            },
        };
        Question {
            id: QuestionId::new(id),
            year: year.into(),
            level,
            part: 1,
            prompt: format!("prompt {id}"),
            explanation: None,
            extra: Default::default(),
            kind,
        }
    }

    #[test]
    fn upsert_creates_intermediate_levels() {
        let mut bank = QuestionBank::new();
        let outcome = bank.upsert(
            question("2024-l1-1", Level::Topik1, "2024", Category::Listening),
            &mut ReplacePolicy::Decline,
        );
        assert_eq!(outcome, UpsertOutcome::Inserted { position: 0 });
        assert_eq!(bank.bucket(Level::Topik1, "2024", Category::Listening).len(), 1);
        assert_eq!(bank.years(Level::Topik1), vec!["2024"]);
    }

    #[test]
    fn upsert_declined_leaves_bank_untouched() {
        let mut bank = QuestionBank::new();
        let original = question("x", Level::Topik1, "2023", Category::Reading);
        bank.upsert(original.clone(), &mut ReplacePolicy::Overwrite);

        let mut replacement = original.clone();
        replacement.prompt = "changed".into();
        let mut asked = 0;
        let outcome = bank.upsert(replacement, &mut |_: &Question, _: &Question| {
            asked += 1;
            false
        });

        assert_eq!(asked, 1);
        assert_eq!(outcome, UpsertOutcome::Declined);
        assert!(!outcome.is_applied());
        assert_eq!(bank.bucket(Level::Topik1, "2023", Category::Reading)[0], original);
    }

    #[test]
    fn upsert_confirmed_replaces_in_place() {
        let mut bank = QuestionBank::new();
        for id in ["a", "b", "c"] {
            bank.upsert(
                question(id, Level::Topik2, "2023", Category::Listening),
                &mut ReplacePolicy::Decline,
            );
        }
        let mut replacement = question("b", Level::Topik2, "2023", Category::Listening);
        replacement.prompt = "new prompt".into();

        let outcome = bank.upsert(replacement, &mut ReplacePolicy::Overwrite);

        assert_eq!(outcome, UpsertOutcome::Replaced { position: 1 });
        let bucket = bank.bucket(Level::Topik2, "2023", Category::Listening);
        let ids: Vec<_> = bucket.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(bucket[1].prompt, "new prompt");
    }

    #[test]
    fn merge_appends_without_dedup_and_counts_partial() {
        let mut bank = QuestionBank::new();
        bank.upsert(
            question("dup", Level::Topik1, "2023", Category::Listening),
            &mut ReplacePolicy::Decline,
        );

        let mut partial = QuestionBank::new();
        partial.upsert(
            question("dup", Level::Topik1, "2023", Category::Listening),
            &mut ReplacePolicy::Decline,
        );
        partial.upsert(
            question("new", Level::Topik2, "2020", Category::Writing),
            &mut ReplacePolicy::Decline,
        );

        let report = bank.merge(partial);

        assert_eq!(report.added, 2);
        assert!(report.drifted.is_empty());
        assert_eq!(bank.bucket(Level::Topik1, "2023", Category::Listening).len(), 2);
        assert_eq!(bank.bucket(Level::Topik2, "2020", Category::Writing).len(), 1);
    }

    #[test]
    fn merge_reports_drifted_paths() {
        let json = r#"{ "topik1": { "2023": { "reading": [
            { "id": "odd", "year": "1999", "type": "reading", "level": "topik1",
              "question": "q", "options": ["a", "b"], "answer": 0 }
        ] } } }"#;
        let partial: QuestionBank = serde_json::from_str(json).unwrap();
        let mut bank = QuestionBank::empty_shell();
        let report = bank.merge(partial);
        assert_eq!(report.added, 1);
        assert_eq!(report.drifted, vec![QuestionId::new("odd")]);
        assert_eq!(bank.bucket(Level::Topik1, "2023", Category::Reading).len(), 1);
    }

    #[test]
    fn clear_resets_to_shell() {
        let mut bank = QuestionBank::new();
        bank.upsert(
            question("a", Level::Topik1, "2023", Category::Listening),
            &mut ReplacePolicy::Decline,
        );
        bank.clear();
        assert_eq!(bank, QuestionBank::empty_shell());
        assert_eq!(
            serde_json::to_string(&bank).unwrap(),
            r#"{"topik1":{},"topik2":{}}"#
        );
    }

    #[test]
    fn statistics_count_years_and_questions() {
        let mut bank = QuestionBank::new();
        bank.upsert(
            question("a", Level::Topik1, "2023", Category::Listening),
            &mut ReplacePolicy::Decline,
        );
        bank.upsert(
            question("b", Level::Topik1, "2022", Category::Reading),
            &mut ReplacePolicy::Decline,
        );
        bank.upsert(
            question("c", Level::Topik1, "2022", Category::Listening),
            &mut ReplacePolicy::Decline,
        );

        let stats = bank.statistics();
        let topik1 = stats.for_level(Level::Topik1);
        assert_eq!(topik1.year_count, 2);
        assert_eq!(topik1.question_count, 3);
        assert_eq!(stats.for_level(Level::Topik2).question_count, 0);
        assert_eq!(stats.total_questions(), 3);
    }

    #[test]
    fn suggest_id_skips_taken_ids() {
        let mut bank = QuestionBank::new();
        bank.upsert(
            question("2024-l1-2", Level::Topik1, "2024", Category::Listening),
            &mut ReplacePolicy::Decline,
        );
        assert_eq!(
            bank.suggest_id(Level::Topik1, "2024", Category::Listening),
            QuestionId::new("2024-l1-3")
        );
        assert_eq!(
            bank.suggest_id(Level::Topik2, "2024", Category::Writing),
            QuestionId::new("2024-w2-1")
        );
    }

    #[test]
    fn serialization_preserves_insertion_order() {
        let mut bank = QuestionBank::new();
        bank.upsert(
            question("b", Level::Topik2, "2024", Category::Reading),
            &mut ReplacePolicy::Decline,
        );
        bank.upsert(
            question("a", Level::Topik1, "2020", Category::Listening),
            &mut ReplacePolicy::Decline,
        );
        let json = serde_json::to_string(&bank).unwrap();
        let topik2 = json.find("topik2").unwrap();
        let topik1 = json.find("topik1").unwrap();
        assert!(topik2 < topik1);
    }
}
