//! Transaction assembly
//!
//! Folds runs of flattened register records into double-entry transactions.
//! Consecutive records belong to the same transaction while their
//! (source file, transaction start line) identity is unchanged. Each closed
//! run is validated before a `Transaction` is built:
//!
//! - it must hold at least two records
//! - its amounts must sum to zero within `BALANCE_TOLERANCE`
//!
//! Two entry points share the same validation:
//! - `next_transaction` consumes exactly one run from the front of a slice
//! - `TransactionAssembler` streams over a fallible record iterator with a
//!   one-record lookahead

use crate::types::{FlattenedRecord, LedgerError, Transaction};
use rust_decimal::Decimal;
use std::iter::Peekable;

/// Largest absolute sum still accepted as balanced (0.001)
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

/// Build one transaction from the front of `records`
///
/// # Arguments
///
/// * `records` - Remaining register records, in file order (non-empty)
///
/// # Returns
///
/// * `Ok((Transaction, rest))` - the transaction built from the first run and
///   the records following it
/// * `Err(LedgerError)` - the first run is not a valid transaction
///
/// # Errors
///
/// Returns an error if:
/// - `records` is empty or its first run has fewer than two records
/// - the amounts of the first run do not sum to zero
pub fn next_transaction(
    records: &[FlattenedRecord],
) -> Result<(Transaction, &[FlattenedRecord]), LedgerError> {
    let first = records
        .first()
        .ok_or_else(|| LedgerError::structural("", 0, 0))?;
    let key = first.key();

    let run_len = records
        .iter()
        .take_while(|record| record.belongs_to(&key))
        .count();
    let (run, rest) = records.split_at(run_len);

    Ok((build_transaction(run.to_vec())?, rest))
}

/// Validate a closed run and turn it into a transaction
fn build_transaction(run: Vec<FlattenedRecord>) -> Result<Transaction, LedgerError> {
    let first = match run.first() {
        Some(first) => first,
        None => return Err(LedgerError::structural("", 0, 0)),
    };

    if run.len() < 2 {
        return Err(LedgerError::structural(
            &first.src_file,
            first.xact_beg_line,
            run.len(),
        ));
    }

    let sum: Decimal = run.iter().map(|record| record.amount).sum();
    if sum.abs() > BALANCE_TOLERANCE {
        let (src_file, beg_line) = (first.src_file.clone(), first.xact_beg_line);
        return Err(LedgerError::imbalance(&src_file, beg_line, sum, run));
    }

    Ok(Transaction::from_run(run))
}

/// Streaming transaction assembler
///
/// Wraps an iterator of register records and yields one transaction per
/// run. Only the current run plus one peeked record are held in memory.
pub struct TransactionAssembler<I>
where
    I: Iterator<Item = Result<FlattenedRecord, LedgerError>>,
{
    records: Peekable<I>,
}

impl<I> TransactionAssembler<I>
where
    I: Iterator<Item = Result<FlattenedRecord, LedgerError>>,
{
    pub fn new(records: I) -> Self {
        Self {
            records: records.peekable(),
        }
    }
}

impl<I> Iterator for TransactionAssembler<I>
where
    I: Iterator<Item = Result<FlattenedRecord, LedgerError>>,
{
    type Item = Result<Transaction, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e)),
        };
        let key = first.key();
        let mut run = vec![first];

        loop {
            let next = self.records.next_if(|item| match item {
                Ok(record) => record.belongs_to(&key),
                // Errors are fatal; report them instead of a partial run
                Err(_) => true,
            });
            match next {
                Some(Ok(record)) => run.push(record),
                Some(Err(e)) => return Some(Err(e)),
                None => break,
            }
        }

        Some(build_transaction(run))
    }
}
