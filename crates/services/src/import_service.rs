use topik_core::model::QuestionId;
use topik_core::transfer::{export_bank, export_file_name, parse_import};

use crate::Clock;
use crate::bank_service::BankService;
use crate::error::BankServiceError;
use crate::persistence::Durability;

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub added_count: usize,
    /// Imported questions whose own level/year/type disagree with where they were filed.
    pub drifted: Vec<QuestionId>,
    pub durability: Durability,
}

/// Serialized bank ready to be written to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
}

/// Imports JSON documents into the bank and exports it back out.
#[derive(Debug, Clone, Copy)]
pub struct ImportService {
    clock: Clock,
}

impl ImportService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    /// Validate `raw` and merge it into the bank.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::Import` if the document is malformed; the
    /// bank is left untouched.
    pub async fn import(
        &self,
        raw: &str,
        bank: &mut BankService,
    ) -> Result<ImportSummary, BankServiceError> {
        let partial = parse_import(raw).inspect_err(|err| {
            tracing::warn!(error = %err, "rejected import");
        })?;
        let (report, durability) = bank.merge(partial).await;
        tracing::info!(added = report.added, "imported questions");
        Ok(ImportSummary {
            added_count: report.added,
            drifted: report.drifted,
            durability,
        })
    }

    /// Export the full bank under a date-stamped file name.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::Export` if serialization fails.
    pub fn export(&self, bank: &BankService) -> Result<ExportFile, BankServiceError> {
        let contents = export_bank(bank.bank())?;
        Ok(ExportFile {
            file_name: export_file_name(self.clock.today()),
            contents,
        })
    }
}
