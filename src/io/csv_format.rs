//! CSV format handling for ledger register exports
//!
//! This module centralizes all register format concerns, providing:
//! - The fixed column layout of the export
//! - `LedgerCsvRecord`, the raw (string) shape of one row
//! - Conversion from raw rows into typed `FlattenedRecord`s
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{ClearingState, FlattenedRecord, LedgerError, DATE_FORMAT};
use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// Number of fields in every register row
pub const COLUMN_COUNT: usize = 12;

/// Column names, in export order
pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "filename",
    "xact.beg_line",
    "xact.note",
    "date",
    "code",
    "payee",
    "beg_line",
    "account",
    "commodity",
    "quantity",
    "state",
    "note",
];

/// Raw register row
///
/// Field order matches `COLUMNS`. Deserialized positionally from a
/// header-less CSV record.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LedgerCsvRecord {
    pub filename: String,
    pub xact_beg_line: String,
    pub xact_note: String,
    pub date: String,
    pub code: String,
    pub payee: String,
    pub beg_line: String,
    pub account: String,
    pub commodity: String,
    pub quantity: String,
    pub state: String,
    pub note: String,
}

impl LedgerCsvRecord {
    /// Extract a raw row from a CSV record
    ///
    /// # Arguments
    ///
    /// * `record` - The CSV record as read from the export
    /// * `row` - 1-based record number, used in error messages
    ///
    /// # Errors
    ///
    /// Returns a FormatError naming the first missing column, or the first
    /// unexpected one when the row is too long.
    pub fn from_string_record(record: &StringRecord, row: u64) -> Result<Self, LedgerError> {
        if record.len() < COLUMN_COUNT {
            return Err(LedgerError::format_error(
                row,
                COLUMNS[record.len()],
                "",
                "missing column",
            ));
        }
        if record.len() > COLUMN_COUNT {
            return Err(LedgerError::format_error(
                row,
                &format!("#{}", COLUMN_COUNT + 1),
                &record[COLUMN_COUNT],
                &format!("expected {} columns, found {}", COLUMN_COUNT, record.len()),
            ));
        }

        Ok(record.deserialize(None)?)
    }
}

/// Convert a raw register row into a FlattenedRecord
///
/// This function:
/// - Parses both line-number columns as integers
/// - Parses the date as `YYYY/MM/DD`
/// - Parses the quantity as a decimal (thousands separators are ignored)
/// - Splits both note columns into lines
/// - Takes the clearing state from the first character of its column
///
/// # Arguments
///
/// * `raw` - The raw register row
/// * `row` - 1-based record number, used in error messages
///
/// # Returns
///
/// Result containing either:
/// - Ok(FlattenedRecord) - Successfully converted record
/// - Err(LedgerError::FormatError) - The offending column and its text
pub fn convert_csv_record(raw: LedgerCsvRecord, row: u64) -> Result<FlattenedRecord, LedgerError> {
    let xact_beg_line = parse_line_number(&raw.xact_beg_line, row, COLUMNS[1])?;
    let beg_line = parse_line_number(&raw.beg_line, row, COLUMNS[6])?;

    let date = NaiveDate::parse_from_str(&raw.date, DATE_FORMAT).map_err(|e| {
        LedgerError::format_error(row, COLUMNS[3], &raw.date, &format!("expected YYYY/MM/DD: {}", e))
    })?;

    let amount = parse_amount(&raw.quantity).ok_or_else(|| {
        LedgerError::format_error(row, COLUMNS[9], &raw.quantity, "not a decimal number")
    })?;

    Ok(FlattenedRecord {
        src_file: raw.filename,
        xact_beg_line,
        xact_notes: split_notes(&raw.xact_note),
        date,
        code: raw.code,
        payee: raw.payee,
        beg_line,
        account: raw.account,
        currency: raw.commodity,
        amount,
        state: ClearingState::from_field(&raw.state),
        notes: split_notes(&raw.note),
    })
}

/// Parse one CSV record all the way to a FlattenedRecord
pub fn parse_record(record: &StringRecord, row: u64) -> Result<FlattenedRecord, LedgerError> {
    let raw = LedgerCsvRecord::from_string_record(record, row)?;
    convert_csv_record(raw, row)
}

fn parse_line_number(text: &str, row: u64, column: &str) -> Result<u32, LedgerError> {
    text.trim()
        .parse::<u32>()
        .map_err(|e| LedgerError::format_error(row, column, text, &format!("not a line number: {}", e)))
}

fn parse_amount(text: &str) -> Option<Decimal> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Split a joined note column into its lines; an empty column has none
fn split_notes(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(str::to_string).collect()
}
