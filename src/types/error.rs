//! Error types for the ledger linter
//!
//! This module defines all error types that can occur while reading the
//! register export, rebuilding transactions and writing reports.
//! Errors are designed to be descriptive and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **I/O Errors**: File not found, broken pipes, etc.
//! - **Format Errors**: Malformed CSV, fields that cannot be parsed
//! - **Imbalance / Structural Errors**: Rows that do not form a valid
//!   double-entry transaction
//! - **Subprocess Errors**: The ledger program could not be run or failed
//!
//! Every error is fatal: the linter is a single-pass batch tool and stops at
//! the first one.

use crate::types::transaction::FlattenedRecord;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger linter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// The CSV reader rejected the input
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    CsvError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A register row or one of its fields could not be parsed
    #[error("Format error in row {row}, column {column} ('{value}'): {message}")]
    FormatError {
        /// 1-based record number in the export
        row: u64,
        /// Name of the offending column
        column: String,
        /// Raw field text (empty when the column is missing)
        value: String,
        message: String,
    },

    /// The postings of a transaction do not sum to zero
    #[error(
        "Transaction at {src_file}:{beg_line} does not balance (sum {sum}):{}",
        records.iter().map(|r| format!("\n    {}", r)).collect::<String>()
    )]
    ImbalanceError {
        src_file: String,
        beg_line: u32,
        /// Computed sum of all posting amounts
        sum: Decimal,
        /// Every record considered for the transaction
        records: Vec<FlattenedRecord>,
    },

    /// A transaction has fewer than two postings
    #[error("Transaction at {src_file}:{beg_line} has {postings} posting(s), at least 2 are required")]
    StructuralError {
        src_file: String,
        beg_line: u32,
        postings: usize,
    },

    /// The ledger subprocess could not be started or failed
    #[error("Failed to run '{program}': {message}")]
    SubprocessError { program: String, message: String },

    /// Writing the structured report failed
    #[error("XML error: {message}")]
    XmlError { message: String },
}

// Conversion from io::Error to LedgerError
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to LedgerError
impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        // Extract line number if available
        let line = error.position().map(|pos| pos.line());

        LedgerError::CsvError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a FormatError
    pub fn format_error(row: u64, column: &str, value: &str, message: &str) -> Self {
        LedgerError::FormatError {
            row,
            column: column.to_string(),
            value: value.to_string(),
            message: message.to_string(),
        }
    }

    /// Create an ImbalanceError
    pub fn imbalance(src_file: &str, beg_line: u32, sum: Decimal, records: Vec<FlattenedRecord>) -> Self {
        LedgerError::ImbalanceError {
            src_file: src_file.to_string(),
            beg_line,
            sum,
            records,
        }
    }

    /// Create a StructuralError
    pub fn structural(src_file: &str, beg_line: u32, postings: usize) -> Self {
        LedgerError::StructuralError {
            src_file: src_file.to_string(),
            beg_line,
            postings,
        }
    }

    /// Create a SubprocessError
    pub fn subprocess(program: &str, message: impl ToString) -> Self {
        LedgerError::SubprocessError {
            program: program.to_string(),
            message: message.to_string(),
        }
    }

    /// Create an XmlError from any displayable writer error
    pub fn xml(error: impl std::fmt::Display) -> Self {
        LedgerError::XmlError {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClearingState;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn record(line: u32, amount: Decimal) -> FlattenedRecord {
        FlattenedRecord {
            src_file: "a.ledger".to_string(),
            xact_beg_line: 4,
            xact_notes: vec![],
            date: NaiveDate::from_ymd_opt(2016, 3, 21).unwrap(),
            code: String::new(),
            payee: "Store".to_string(),
            beg_line: line,
            account: "Expenses:Grocery".to_string(),
            currency: "$".to_string(),
            amount,
            state: ClearingState::Uncleared,
            notes: vec![],
        }
    }

    #[rstest]
    #[case::file_not_found(
        LedgerError::FileNotFound { path: "register.csv".to_string() },
        "File not found: register.csv"
    )]
    #[case::io_error(
        LedgerError::IoError { message: "Broken pipe".to_string() },
        "I/O error: Broken pipe"
    )]
    #[case::csv_error_with_line(
        LedgerError::CsvError { line: Some(42), message: "unequal lengths".to_string() },
        "CSV parse error at line 42: unequal lengths"
    )]
    #[case::csv_error_without_line(
        LedgerError::CsvError { line: None, message: "unequal lengths".to_string() },
        "CSV parse error: unequal lengths"
    )]
    #[case::format_error(
        LedgerError::format_error(3, "date", "2016-03-21", "expected YYYY/MM/DD"),
        "Format error in row 3, column date ('2016-03-21'): expected YYYY/MM/DD"
    )]
    #[case::structural(
        LedgerError::structural("a.ledger", 4, 1),
        "Transaction at a.ledger:4 has 1 posting(s), at least 2 are required"
    )]
    #[case::subprocess(
        LedgerError::subprocess("ledger", "exit status: 1"),
        "Failed to run 'ledger': exit status: 1"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_imbalance_display_lists_every_record() {
        let error = LedgerError::imbalance(
            "a.ledger",
            4,
            Decimal::new(5, 1),
            vec![record(5, Decimal::new(105, 1)), record(6, Decimal::new(-10, 0))],
        );

        assert_eq!(
            error.to_string(),
            "Transaction at a.ledger:4 does not balance (sum 0.5):\n    \
             a.ledger:5 2016/03/21 Store Expenses:Grocery $10.5\n    \
             a.ledger:6 2016/03/21 Store Expenses:Grocery $-10"
        );
    }

    #[test]
    fn test_imbalance_display_keeps_sub_cent_amounts() {
        let error = LedgerError::imbalance(
            "a.ledger",
            4,
            Decimal::new(11, 4),
            vec![record(5, Decimal::new(10011, 4)), record(6, Decimal::new(-100, 2))],
        );

        let text = error.to_string();
        assert!(text.contains("(sum 0.0011)"));
        assert!(text.contains("a.ledger:5 2016/03/21 Store Expenses:Grocery $1.0011"));
        assert!(text.contains("a.ledger:6 2016/03/21 Store Expenses:Grocery $-1.00"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "Broken pipe");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Broken pipe");
    }
}
