//! Incremental duplicate finder
//!
//! This module provides the DuplicateFinder that scans transactions in file
//! order and collects duplicate candidates as it goes.
//!
//! # Detection
//!
//! - **Code duplicates**: transactions whose codes match once both are
//!   normalized to start with `#`, regardless of date.
//! - **Amount duplicates**: postings with the same account and amount text
//!   whose transaction dates are at most `window_days` apart.
//!
//! Every candidate is reported once, when its second occurrence is added.
//! An entry is never compared with itself or with later entries, so the
//! order transactions are added in decides which side is "first".
//!
//! Postings are bucketed by account and amount, and a new posting is compared
//! against the dates in its bucket, so the cost does not grow with the window.
//!
//! # Negative windows
//!
//! A negative `window_days` disables amount detection entirely (not even
//! same-day matches are reported). Code detection is unaffected.

use crate::core::duplicate::{AmountPair, CodePair, Duplicate};
use crate::types::{PostingRef, Transaction, DATE_FORMAT};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Default number of days searched on each side of a posting's date
pub const DEFAULT_WINDOW_DAYS: i64 = 3;

/// Configuration for duplicate detection
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinderConfig {
    /// Days searched on each side of a posting's date; 0 means same day only
    /// and a negative value disables amount detection
    pub window_days: i64,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl FinderConfig {
    /// Create a new FinderConfig, warning when amount detection is disabled
    pub fn new(window_days: i64) -> Self {
        if window_days < 0 {
            log::warn!(
                "Duplicate window is negative ({}), amount duplicate detection is disabled",
                window_days
            );
        }
        Self { window_days }
    }
}

/// Lookup key for amount duplicates; dates are compared per bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AmountKey {
    account: String,
    amount: String,
}

/// Duplicate finder
///
/// Borrows the transactions it is given for as long as it lives; the
/// candidates it reports point straight into them.
#[derive(Debug)]
pub struct DuplicateFinder<'a> {
    config: FinderConfig,
    by_amount: HashMap<AmountKey, Vec<PostingRef<'a>>>,
    by_code: HashMap<String, Vec<&'a Transaction>>,
    duplicates: Vec<Duplicate<'a>>,
}

impl<'a> DuplicateFinder<'a> {
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            by_amount: HashMap::new(),
            by_code: HashMap::new(),
            duplicates: Vec::new(),
        }
    }

    /// Add a transaction, recording candidates against everything added so far
    pub fn add(&mut self, xact: &'a Transaction) {
        self.add_code(xact);
        for posting in xact.posting_refs() {
            self.add_posting(posting);
        }
    }

    /// Add every transaction of a ledger in order
    pub fn add_all<I>(&mut self, transactions: I)
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        for xact in transactions {
            self.add(xact);
        }
    }

    /// Candidates found so far, in detection order
    pub fn duplicates(&self) -> &[Duplicate<'a>] {
        &self.duplicates
    }

    pub fn into_duplicates(self) -> Vec<Duplicate<'a>> {
        self.duplicates
    }

    fn add_code(&mut self, xact: &'a Transaction) {
        if xact.code.is_empty() {
            return;
        }
        let code = normalize_code(&xact.code);
        let earlier = self.by_code.entry(code).or_default();

        for &other in earlier.iter() {
            let candidate = Duplicate::from(CodePair::new(other, xact));
            if !candidate.is_suppressed() {
                log::debug!("Code duplicate at {}:{}", xact.src_file, xact.beg_line);
                self.duplicates.push(candidate);
            }
        }
        earlier.push(xact);
    }

    fn add_posting(&mut self, posting: PostingRef<'a>) {
        let key = AmountKey {
            account: posting.posting.account.clone(),
            amount: posting.posting.amount_text(),
        };
        let date = posting.xact.date;

        let matches = match self.by_amount.get(&key) {
            Some(earlier) if self.config.window_days >= 0 => {
                window_matches(earlier, date, self.config.window_days)
            }
            _ => Vec::new(),
        };

        for earlier in matches {
            let candidate = Duplicate::from(AmountPair::new(earlier, posting));
            if !candidate.is_suppressed() {
                log::debug!(
                    "Amount duplicate {} {} on {} at {}:{}",
                    key.amount,
                    key.account,
                    date.format(DATE_FORMAT),
                    posting.xact.src_file,
                    posting.posting.beg_line
                );
                self.duplicates.push(candidate);
            }
        }

        self.by_amount.entry(key).or_default().push(posting);
    }
}

/// Earlier postings dated at most `window_days` from `date`
///
/// Ordered by distance, the earlier date before the later one at equal
/// distance, then by insertion.
fn window_matches<'a>(earlier: &[PostingRef<'a>], date: NaiveDate, window_days: i64) -> Vec<PostingRef<'a>> {
    let mut matches: Vec<(i64, PostingRef<'a>)> = earlier
        .iter()
        .map(|other| (other.xact.date.signed_duration_since(date).num_days(), *other))
        .filter(|(offset, _)| offset.abs() <= window_days)
        .collect();
    matches.sort_by_key(|(offset, _)| (offset.abs(), *offset > 0));
    matches.into_iter().map(|(_, other)| other).collect()
}

/// Codes compare equal with or without a leading `#`
pub fn normalize_code(code: &str) -> String {
    if code.starts_with('#') {
        code.to_string()
    } else {
        format!("#{}", code)
    }
}
