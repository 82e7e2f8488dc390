//! I/O module
//!
//! Handles reading ledger register exports.
//!
//! # Components
//!
//! - `escaping` - Translates backslash escapes into standard CSV quoting
//! - `csv_format` - Column layout and row conversion
//! - `register_reader` - Streaming reader with iterator interface
//! - `ledger_process` - Runs the `ledger` binary and reads its export

pub mod csv_format;
pub mod escaping;
pub mod ledger_process;
pub mod register_reader;

pub use csv_format::{convert_csv_record, parse_record, LedgerCsvRecord};
pub use escaping::EscapingReader;
pub use ledger_process::{read_from_ledger, CSV_FORMAT};
pub use register_reader::{read_transactions, RegisterReader};
