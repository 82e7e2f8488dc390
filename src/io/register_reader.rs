//! Register reader with iterator interface
//!
//! Provides a streaming iterator over flattened register records from a
//! ledger CSV export. Delegates format concerns to the csv_format module and
//! escape translation to the escaping module.
//!
//! # Architecture
//!
//! ```text
//! byte source → EscapingReader → csv::Reader → RegisterReader → FlattenedRecords
//!                                                   ↓
//!                                          TransactionAssembler → Transactions
//! ```
//!
//! # Error Handling
//!
//! Every error is fatal. The iterator yields it once; callers are expected
//! to stop there (`collect::<Result<Vec<_>, _>>()` does).

use crate::core::TransactionAssembler;
use crate::io::csv_format::parse_record;
use crate::io::escaping::EscapingReader;
use crate::types::{FlattenedRecord, LedgerError, Transaction};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::time::Instant;

/// Streaming reader over register rows
pub struct RegisterReader<R: Read> {
    reader: csv::Reader<EscapingReader<R>>,
    record: StringRecord,
    row: u64,
}

impl<R: Read> RegisterReader<R> {
    /// Create a new RegisterReader over a raw (backslash-escaped) export
    ///
    /// The CSV reader is configured to:
    /// - Expect no header row
    /// - Keep whitespace (notes and payees are taken verbatim)
    /// - Use an 8KB buffer for efficient I/O
    pub fn new(source: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(EscapingReader::new(source));

        Self {
            reader,
            record: StringRecord::new(),
            row: 0,
        }
    }
}

impl<R: Read> Iterator for RegisterReader<R> {
    type Item = Result<FlattenedRecord, LedgerError>;

    /// Get the next register row
    ///
    /// # Returns
    ///
    /// * `Some(Ok(FlattenedRecord))` - Successfully parsed row
    /// * `Some(Err(LedgerError))` - CSV or format error
    /// * `None` - End of input reached
    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                self.row += 1;
                Some(parse_record(&self.record, self.row))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// Read every transaction from a register export
///
/// Rows are parsed and folded into transactions in a single pass; the first
/// error aborts the read.
///
/// # Arguments
///
/// * `source` - Byte source producing the backslash-escaped export
///
/// # Returns
///
/// * `Ok(Vec<Transaction>)` in file order
/// * `Err(LedgerError)` for the first format, imbalance or structural error
pub fn read_transactions<R: Read>(source: R) -> Result<Vec<Transaction>, LedgerError> {
    let start = Instant::now();

    let transactions = TransactionAssembler::new(RegisterReader::new(source))
        .inspect(|result| {
            if let Ok(xact) = result {
                log::trace!("Assembled transaction:\n{}", xact);
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::info!(
        "Read {} transactions in {:?}",
        transactions.len(),
        start.elapsed()
    );
    Ok(transactions)
}
