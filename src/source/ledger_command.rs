//! Live ledger source
//!
//! Asks the `ledger` binary for its register on every read, so the journal
//! is always evaluated with ledger's own rules (automated transactions,
//! includes, price directives).

use crate::io::ledger_process::read_from_ledger;
use crate::source::TransactionSource;
use crate::types::{LedgerError, Transaction};
use std::path::PathBuf;

/// Default name of the ledger binary, looked up on `PATH`
pub const DEFAULT_LEDGER_BIN: &str = "ledger";

#[derive(Debug, Clone)]
pub struct LedgerCommandSource {
    program: String,
    journal: Option<PathBuf>,
}

impl LedgerCommandSource {
    /// Create a source running `program`; without a journal ledger falls
    /// back to its own default (`LEDGER_FILE`, `~/.ledgerrc`)
    pub fn new(program: String, journal: Option<PathBuf>) -> Self {
        Self { program, journal }
    }
}

impl Default for LedgerCommandSource {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_BIN.to_string(), None)
    }
}

impl TransactionSource for LedgerCommandSource {
    fn read_transactions(&self) -> Result<Vec<Transaction>, LedgerError> {
        read_from_ledger(&self.program, self.journal.as_deref())
    }
}
