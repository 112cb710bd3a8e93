//! The question bank bundled with the application.

use crate::model::QuestionBank;
use crate::transfer::{ImportError, parse_import};

const DEFAULT_BANK_JSON: &str = include_str!("../assets/default_bank.json");

/// Decode the bundled sample bank.
///
/// # Errors
///
/// Returns `ImportError` if the bundled asset does not have the bank shape.
pub fn default_bank() -> Result<QuestionBank, ImportError> {
    parse_import(DEFAULT_BANK_JSON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Level, QuestionId};

    #[test]
    fn bundled_bank_decodes() {
        let bank = default_bank().unwrap();
        assert_eq!(bank.total_questions(), 44);
        assert_eq!(bank.bucket(Level::Topik1, "2023", Category::Listening).len(), 10);
        assert_eq!(bank.bucket(Level::Topik2, "2023", Category::Writing).len(), 2);
    }

    #[test]
    fn bundled_questions_are_valid_and_filed_consistently() {
        let bank = default_bank().unwrap();
        for (level, year, category, question) in bank.iter() {
            assert!(question.validate().is_ok(), "{} is invalid", question.id);
            assert!(question.matches_path(level, year, category), "{} drifted", question.id);
        }
        assert!(bank.find(&QuestionId::new("2023-l1-1")).is_some());
    }
}
