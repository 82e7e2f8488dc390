//! Transaction sources
//!
//! This module defines where transactions come from. A source produces the
//! complete, ordered list of transactions of a ledger; the finder and the
//! renderers never know which source was used. The source is selected at
//! runtime from the command line.

use crate::cli::{LintConfig, SourceType};
use crate::types::{LedgerError, Transaction};

pub mod csv_export;
pub mod ledger_command;

pub use csv_export::CsvExportSource;
pub use ledger_command::LedgerCommandSource;

/// Source of transactions for duplicate detection
pub trait TransactionSource: Send + Sync {
    /// Read every transaction, in the order they appear in the ledger
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input cannot be opened or read
    /// - A register row is malformed
    /// - A transaction does not balance or has fewer than two postings
    fn read_transactions(&self) -> Result<Vec<Transaction>, LedgerError>;
}

/// Create a transaction source based on the configuration
///
/// # Arguments
///
/// * `config` - Lint configuration; `source`, `file` and `ledger_bin` are used
///
/// # Returns
///
/// A boxed trait object implementing the TransactionSource trait
pub fn create_source(config: &LintConfig) -> Box<dyn TransactionSource> {
    match config.source {
        SourceType::Csv => Box::new(CsvExportSource::new(config.file.clone())),
        SourceType::Ledger => Box::new(LedgerCommandSource::new(
            config.ledger_bin.clone(),
            config.file.clone(),
        )),
    }
}
