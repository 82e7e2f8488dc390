//! Transaction-related types for the ledger linter
//!
//! This module defines the flattened register record produced by the row
//! parser, and the reconstructed double-entry `Transaction` / `Posting` pair
//! the duplicate finder works on.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

/// Date layout used by ledger for register output and suppression notes
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Column at which posting amounts are right-aligned in ledger syntax
const AMOUNT_ALIGNMENT_COL: usize = 65;

const INDENT: &str = "    ";

/// Clearing state of a posting
///
/// Ledger marks postings as cleared (`*`) or pending (`!`). Postings without
/// a mark are `Uncleared`. Any other leading character is kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearingState {
    /// No clearing mark
    #[default]
    Uncleared,

    /// Marked with `!`
    Pending,

    /// Marked with `*`
    Cleared,

    /// Any other mark (kept so nothing is lost)
    Other(char),
}

impl ClearingState {
    /// Derive the clearing state from the first character of a register field
    ///
    /// An empty field yields `Uncleared`.
    pub fn from_field(field: &str) -> Self {
        match field.chars().next() {
            None => ClearingState::Uncleared,
            Some('*') => ClearingState::Cleared,
            Some('!') => ClearingState::Pending,
            Some(other) => ClearingState::Other(other),
        }
    }

    /// The mark character, or `None` for uncleared postings
    pub fn mark(&self) -> Option<char> {
        match self {
            ClearingState::Uncleared => None,
            ClearingState::Pending => Some('!'),
            ClearingState::Cleared => Some('*'),
            ClearingState::Other(c) => Some(*c),
        }
    }
}

/// One row of the register export
///
/// Carries both the transaction-level fields (repeated on every row of the
/// same transaction) and the posting-level fields. Records are consumed by
/// the assembler as soon as a transaction boundary is seen.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedRecord {
    /// Journal file the transaction was read from
    pub src_file: String,

    /// 1-based line of the transaction header
    pub xact_beg_line: u32,

    /// Transaction notes, one entry per note line
    pub xact_notes: Vec<String>,

    pub date: NaiveDate,

    /// Transaction code (e.g. a check number); empty when absent
    pub code: String,

    pub payee: String,

    /// 1-based line of the posting
    pub beg_line: u32,

    pub account: String,

    /// Currency symbol, e.g. `$`
    pub currency: String,

    /// Signed posting amount
    pub amount: Decimal,

    pub state: ClearingState,

    /// Posting notes, one entry per note line
    pub notes: Vec<String>,
}

impl FlattenedRecord {
    /// Identity of the transaction this row belongs to
    pub fn key(&self) -> TransactionKey {
        TransactionKey {
            src_file: self.src_file.clone(),
            beg_line: self.xact_beg_line,
        }
    }

    /// Whether this row belongs to the transaction identified by `key`
    pub fn belongs_to(&self, key: &TransactionKey) -> bool {
        self.xact_beg_line == key.beg_line && self.src_file == key.src_file
    }
}

impl fmt::Display for FlattenedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {} {} {} {}{}",
            self.src_file,
            self.beg_line,
            self.date.format(DATE_FORMAT),
            self.payee,
            self.account,
            self.currency,
            self.amount
        )
    }
}

/// Identity of a transaction: its source file and header line
///
/// Postings refer back to their owning transaction through this key. It never
/// implies ownership; transactions own their postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionKey {
    pub src_file: String,
    pub beg_line: u32,
}

impl fmt::Display for TransactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.src_file, self.beg_line)
    }
}

/// One account/amount line within a transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    pub account: String,
    pub currency: String,
    pub amount: Decimal,
    pub state: ClearingState,
    pub notes: Vec<String>,

    /// 1-based line of the posting in its source file
    pub beg_line: u32,

    /// Back-reference to the owning transaction
    xact: TransactionKey,
}

impl Posting {
    /// Currency symbol followed by the amount rounded to two places
    pub fn amount_text(&self) -> String {
        amount_text(&self.currency, self.amount)
    }

    /// Identity of the owning transaction
    pub fn transaction_key(&self) -> &TransactionKey {
        &self.xact
    }
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.state.mark() {
            Some(mark) => format!("{}{} {}", INDENT, mark, self.account),
            None => format!("{}{}", INDENT, self.account),
        };
        let suffix = format!("  {}", self.amount_text());
        let used = prefix.chars().count() + suffix.chars().count();
        let padding = AMOUNT_ALIGNMENT_COL.saturating_sub(used);
        write!(f, "{}{}{}", prefix, " ".repeat(padding), suffix)
    }
}

/// A balanced group of postings sharing date, payee and code
///
/// Built once by the assembler from a run of flattened records and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub src_file: String,

    /// 1-based line of the transaction header
    pub beg_line: u32,

    pub date: NaiveDate,

    /// Optional code; empty when the transaction has none
    pub code: String,

    pub payee: String,
    pub notes: Vec<String>,
    postings: Vec<Posting>,
}

impl Transaction {
    /// Build a transaction from a run of records sharing one identity
    ///
    /// Transaction-level fields are taken from the first record. Each record
    /// becomes one posting, in order, pointing back at this transaction.
    /// Validation (posting count, balance) is the assembler's job.
    pub(crate) fn from_run(run: Vec<FlattenedRecord>) -> Self {
        let first = &run[0];
        let mut xact = Transaction {
            src_file: first.src_file.clone(),
            beg_line: first.xact_beg_line,
            date: first.date,
            code: first.code.clone(),
            payee: first.payee.clone(),
            notes: first.xact_notes.clone(),
            postings: Vec::with_capacity(run.len()),
        };

        let key = xact.key();
        xact.postings = run
            .into_iter()
            .map(|record| Posting {
                account: record.account,
                currency: record.currency,
                amount: record.amount,
                state: record.state,
                notes: record.notes,
                beg_line: record.beg_line,
                xact: key.clone(),
            })
            .collect();
        xact
    }

    /// Identity of this transaction
    pub fn key(&self) -> TransactionKey {
        TransactionKey {
            src_file: self.src_file.clone(),
            beg_line: self.beg_line,
        }
    }

    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    /// Date formatted the way ledger prints it (`YYYY/MM/DD`)
    pub fn date_text(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Postings paired with a borrowed reference to this transaction
    pub fn posting_refs(&self) -> impl Iterator<Item = PostingRef<'_>> {
        self.postings.iter().map(move |posting| PostingRef {
            xact: self,
            posting,
        })
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date_text())?;
        if !self.code.is_empty() {
            write!(f, " (#{})", self.code.trim_start_matches('#'))?;
        }
        write!(f, " {}", self.payee)?;
        for note in &self.notes {
            write!(f, "\n{}; {}", INDENT, note)?;
        }
        for posting in &self.postings {
            write!(f, "\n{}", posting)?;
        }
        Ok(())
    }
}

/// A posting together with its owning transaction
///
/// Gives the finder and renderers access to shared transaction fields
/// (date, payee, source file) without the posting owning the transaction.
#[derive(Debug, Clone, Copy)]
pub struct PostingRef<'a> {
    pub xact: &'a Transaction,
    pub posting: &'a Posting,
}

/// Format an amount as ledger prints it: currency then two decimals
pub fn amount_text(currency: &str, amount: Decimal) -> String {
    format!("{}{:.2}", currency, amount.round_dp(2))
}
