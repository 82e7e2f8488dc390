//! Exported register source
//!
//! Reads a register that was exported ahead of time with
//! `ledger csv --csv-format ...`, either from a file or from standard input.

use crate::io::register_reader::read_transactions;
use crate::source::TransactionSource;
use crate::types::{LedgerError, Transaction};
use std::fs::File;
use std::io;
use std::path::PathBuf;

/// Register export read from a file, or standard input when no path is given
#[derive(Debug, Clone, Default)]
pub struct CsvExportSource {
    path: Option<PathBuf>,
}

impl CsvExportSource {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl TransactionSource for CsvExportSource {
    fn read_transactions(&self) -> Result<Vec<Transaction>, LedgerError> {
        match &self.path {
            Some(path) => {
                log::debug!("Reading register export from {}", path.display());
                let file = File::open(path).map_err(|e| match e.kind() {
                    io::ErrorKind::NotFound => LedgerError::FileNotFound {
                        path: path.display().to_string(),
                    },
                    _ => e.into(),
                })?;
                read_transactions(file)
            }
            None => {
                log::debug!("Reading register export from standard input");
                read_transactions(io::stdin().lock())
            }
        }
    }
}
