//! Ledger Lint Library
//! # Overview
//!
//! This library finds likely duplicate entries in a plain-text accounting
//! journal, working from the register that the `ledger` tool exports as CSV.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (FlattenedRecord, Posting, Transaction, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`io`] - Register reading:
//!   - [`io::escaping`] - Backslash escapes to standard CSV quoting
//!   - [`io::csv_format`] - Row layout and conversion
//!   - [`io::ledger_process`] - Running the ledger binary
//! - [`core`] - Business logic components:
//!   - [`core::assembler`] - Grouping rows into balanced transactions
//!   - [`core::finder`] - Duplicate detection
//!   - [`core::suppression`] - Suppression directives in notes
//! - [`report`] - Plain and checkstyle output
//! - [`source`] - Pluggable transaction sources
//!
//! # Duplicate Kinds
//!
//! - **Amount duplicate**: two postings to the same account for the same
//!   amount whose dates are at most N days apart
//! - **Code duplicate**: two transactions carrying the same code, with or
//!   without a leading `#`
//!
//! Either kind is silenced by a note on one side naming the date of the
//! other, e.g. `; SuppressDuplicates: 2016/03/22`.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod report;
pub mod source;
pub mod types;

pub use core::{Duplicate, DuplicateFinder, FinderConfig};
pub use io::read_transactions;
pub use report::{render, ReportFormat};
pub use types::{FlattenedRecord, LedgerError, Posting, Transaction};

/// Find every duplicate candidate in `transactions`, in detection order
pub fn find_duplicates(transactions: &[Transaction], window_days: i64) -> Vec<Duplicate<'_>> {
    let mut finder = DuplicateFinder::new(FinderConfig::new(window_days));
    finder.add_all(transactions);
    finder.into_duplicates()
}
