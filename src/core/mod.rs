//! Core business logic module
//!
//! This module contains the duplicate detection components:
//! - `assembler` - Folding register records into balanced transactions
//! - `suppression` - Parsing suppression directives out of notes
//! - `duplicate` - Duplicate candidates and their renderings
//! - `finder` - Incremental duplicate detection over a ledger

pub mod assembler;
pub mod duplicate;
pub mod finder;
pub mod suppression;

pub use assembler::{next_transaction, TransactionAssembler, BALANCE_TOLERANCE};
pub use duplicate::{AmountPair, CodePair, Duplicate};
pub use finder::{DuplicateFinder, FinderConfig, DEFAULT_WINDOW_DAYS};
pub use suppression::{is_date_suppressed, suppressed_dates, SuppressionKind};
