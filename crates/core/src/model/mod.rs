mod answers;
mod bank;
mod ids;
mod level;
mod question;
mod stats;
mod wrong_answers;

pub use answers::{AnswerSheet, Score};
pub use bank::{
    ConfirmReplace, LevelSet, MergeReport, QuestionBank, ReplacePolicy, UpsertOutcome, YearSet,
};
pub use ids::{ParseIdError, QuestionId};
pub use level::{Category, Level, LevelError};
pub use question::{MAX_OPTIONS, MIN_OPTIONS, Question, QuestionError, QuestionKind};
pub use stats::{
    BankStatistics, LearningOverview, LevelStatistics, WeakAreaBreakdown, rounded_percentage,
};
pub use wrong_answers::WrongAnswerSet;
