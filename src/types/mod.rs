//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: Register records, transactions and postings
//! - `error`: Error types for the ledger linter

pub mod error;
pub mod transaction;

pub use error::LedgerError;
pub use transaction::{
    amount_text, ClearingState, FlattenedRecord, Posting, PostingRef, Transaction,
    TransactionKey, DATE_FORMAT,
};
