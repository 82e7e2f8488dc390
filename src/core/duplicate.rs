//! Duplicate candidates
//!
//! A candidate is either a pair of postings that share account and amount
//! within the date window, or a pair of transactions that share a code.
//! Both shapes expose the same capabilities so renderers never need to know
//! which one they hold:
//!
//! - `render_text` - the plain report block
//! - `is_suppressed` - whether a note on either side silences the pair
//! - `contribute` - add one diagnostic per side to a structured report

use crate::core::suppression::{is_date_suppressed, SuppressionKind};
use crate::report::checkstyle::CheckstyleReport;
use crate::types::{PostingRef, Transaction};

/// Two postings with the same account and amount, close in time
///
/// `one` was ingested before `two`.
#[derive(Debug, Clone, Copy)]
pub struct AmountPair<'a> {
    pub one: PostingRef<'a>,
    pub two: PostingRef<'a>,
}

impl<'a> AmountPair<'a> {
    pub fn new(one: PostingRef<'a>, two: PostingRef<'a>) -> Self {
        Self { one, two }
    }

    fn render_text(&self) -> String {
        format!(
            "Possible duplicate {} {}\n\t{}\n\t{}",
            self.one.posting.amount_text(),
            self.one.posting.account,
            location_line(self.one.xact, self.one.posting.beg_line),
            location_line(self.two.xact, self.two.posting.beg_line),
        )
    }

    fn is_suppressed(&self) -> bool {
        suppresses(self.two, self.one) || suppresses(self.one, self.two)
    }

    fn contribute(&self, report: &mut CheckstyleReport) {
        add_amount_diagnostic(report, self.one, self.two);
        add_amount_diagnostic(report, self.two, self.one);
    }
}

/// Whether `side` carries an amount directive naming the date of `other`
///
/// Both the posting's own notes and its transaction's notes are consulted.
fn suppresses(side: PostingRef<'_>, other: PostingRef<'_>) -> bool {
    let date = other.xact.date;
    is_date_suppressed(SuppressionKind::Amount, date, &side.posting.notes)
        || is_date_suppressed(SuppressionKind::Amount, date, &side.xact.notes)
}

fn add_amount_diagnostic(report: &mut CheckstyleReport, side: PostingRef<'_>, other: PostingRef<'_>) {
    let message = format!(
        "Possible duplicate of {} {} {} {} at {}:{}",
        other.xact.date_text(),
        other.xact.payee,
        other.posting.amount_text(),
        other.posting.account,
        other.xact.src_file,
        other.posting.beg_line,
    );
    report.add(&side.xact.src_file, side.posting.beg_line, message);
}

/// Two transactions carrying the same code
#[derive(Debug, Clone)]
pub struct CodePair<'a> {
    /// The matched code; keeps the `#` prefix when either side used one
    pub code: String,
    pub one: &'a Transaction,
    pub two: &'a Transaction,
}

impl<'a> CodePair<'a> {
    pub fn new(one: &'a Transaction, two: &'a Transaction) -> Self {
        let code = if two.code.starts_with('#') {
            two.code.clone()
        } else {
            one.code.clone()
        };
        Self { code, one, two }
    }

    fn render_text(&self) -> String {
        format!(
            "Code duplicate ({})\n\t{}\n\t{}",
            self.code,
            location_line(self.one, self.one.beg_line),
            location_line(self.two, self.two.beg_line),
        )
    }

    fn is_suppressed(&self) -> bool {
        is_date_suppressed(SuppressionKind::Code, self.one.date, &self.two.notes)
            || is_date_suppressed(SuppressionKind::Code, self.two.date, &self.one.notes)
    }

    fn contribute(&self, report: &mut CheckstyleReport) {
        add_code_diagnostic(report, self.one, self.two);
        add_code_diagnostic(report, self.two, self.one);
    }
}

fn add_code_diagnostic(report: &mut CheckstyleReport, side: &Transaction, other: &Transaction) {
    let message = format!(
        "Possible duplicate of {} ({}) at {}:{}",
        other.date_text(),
        other.code,
        other.src_file,
        other.beg_line,
    );
    report.add(&side.src_file, side.beg_line, message);
}

fn location_line(xact: &Transaction, line: u32) -> String {
    format!(
        "at {} {} ({}:{})",
        xact.date_text(),
        xact.payee,
        xact.src_file,
        line
    )
}

/// A detected duplicate candidate
#[derive(Debug, Clone)]
pub enum Duplicate<'a> {
    Amount(AmountPair<'a>),
    Code(CodePair<'a>),
}

impl Duplicate<'_> {
    /// Plain-text block describing both occurrences
    pub fn render_text(&self) -> String {
        match self {
            Duplicate::Amount(pair) => pair.render_text(),
            Duplicate::Code(pair) => pair.render_text(),
        }
    }

    /// Whether a suppression note on either side silences this candidate
    pub fn is_suppressed(&self) -> bool {
        match self {
            Duplicate::Amount(pair) => pair.is_suppressed(),
            Duplicate::Code(pair) => pair.is_suppressed(),
        }
    }

    /// Add one diagnostic per side to a structured report
    pub fn contribute(&self, report: &mut CheckstyleReport) {
        match self {
            Duplicate::Amount(pair) => pair.contribute(report),
            Duplicate::Code(pair) => pair.contribute(report),
        }
    }
}

impl<'a> From<AmountPair<'a>> for Duplicate<'a> {
    fn from(pair: AmountPair<'a>) -> Self {
        Duplicate::Amount(pair)
    }
}

impl<'a> From<CodePair<'a>> for Duplicate<'a> {
    fn from(pair: CodePair<'a>) -> Self {
        Duplicate::Code(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembler::next_transaction;
    use crate::types::{ClearingState, FlattenedRecord};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn xact(line: u32, day: u32, code: &str, notes: &[&str], posting_notes: &[&str]) -> Transaction {
        let base = FlattenedRecord {
            src_file: "main.ledger".to_string(),
            xact_beg_line: line,
            xact_notes: notes.iter().map(|s| s.to_string()).collect(),
            date: NaiveDate::from_ymd_opt(2016, 3, day).unwrap(),
            code: code.to_string(),
            payee: format!("Payee {}", line),
            beg_line: line + 1,
            account: "Expenses:Grocery".to_string(),
            currency: "$".to_string(),
            amount: Decimal::new(1000, 2),
            state: ClearingState::Uncleared,
            notes: posting_notes.iter().map(|s| s.to_string()).collect(),
        };
        let other = FlattenedRecord {
            beg_line: line + 2,
            account: "Liabilities:Credit Card".to_string(),
            amount: Decimal::new(-1000, 2),
            notes: vec![],
            ..base.clone()
        };
        next_transaction(&[base, other]).unwrap().0
    }

    fn first_posting(xact: &Transaction) -> PostingRef<'_> {
        xact.posting_refs().next().unwrap()
    }

    #[test]
    fn test_amount_pair_render_text() {
        let one = xact(9, 21, "", &[], &[]);
        let two = xact(13, 22, "", &[], &[]);
        let pair = Duplicate::from(AmountPair::new(first_posting(&one), first_posting(&two)));

        assert_eq!(
            pair.render_text(),
            "Possible duplicate $10.00 Expenses:Grocery\n\
             \tat 2016/03/21 Payee 9 (main.ledger:10)\n\
             \tat 2016/03/22 Payee 13 (main.ledger:14)"
        );
    }

    #[test]
    fn test_amount_pair_suppressed_by_posting_note() {
        let one = xact(9, 22, "", &[], &[]);
        let two = xact(13, 25, "", &[], &["SuppressDuplicates: 2016/03/22"]);
        let pair = AmountPair::new(first_posting(&one), first_posting(&two));
        assert!(Duplicate::from(pair).is_suppressed());
    }

    #[test]
    fn test_amount_pair_suppressed_by_earlier_side() {
        let one = xact(9, 22, "", &["SuppressAmountDuplicates: 2016/03/25"], &[]);
        let two = xact(13, 25, "", &[], &[]);
        let pair = AmountPair::new(first_posting(&one), first_posting(&two));
        assert!(Duplicate::from(pair).is_suppressed());
    }

    #[test]
    fn test_amount_pair_not_suppressed_by_other_dates_or_kinds() {
        let one = xact(9, 22, "", &["SuppressCodeDuplicates: 2016/03/25"], &[]);
        let two = xact(13, 25, "", &[], &["SuppressDuplicates: 2016/03/21"]);
        let pair = AmountPair::new(first_posting(&one), first_posting(&two));
        assert!(!Duplicate::from(pair).is_suppressed());
    }

    #[test]
    fn test_code_pair_keeps_prefixed_code() {
        let plain = xact(9, 21, "1042", &[], &[]);
        let prefixed = xact(13, 22, "#1042", &[], &[]);

        assert_eq!(CodePair::new(&plain, &prefixed).code, "#1042");
        assert_eq!(CodePair::new(&prefixed, &plain).code, "#1042");
        assert_eq!(CodePair::new(&plain, &plain).code, "1042");
    }

    #[test]
    fn test_code_pair_render_text() {
        let one = xact(9, 21, "1042", &[], &[]);
        let two = xact(13, 29, "#1042", &[], &[]);
        let pair = Duplicate::from(CodePair::new(&one, &two));

        assert_eq!(
            pair.render_text(),
            "Code duplicate (#1042)\n\
             \tat 2016/03/21 Payee 9 (main.ledger:9)\n\
             \tat 2016/03/29 Payee 13 (main.ledger:13)"
        );
    }

    #[test]
    fn test_code_pair_suppression() {
        let one = xact(9, 21, "1042", &[], &[]);
        let two = xact(13, 29, "1042", &["SuppressCodeDuplicates: 2016/03/21"], &[]);
        assert!(Duplicate::from(CodePair::new(&one, &two)).is_suppressed());

        let three = xact(17, 30, "1042", &["SuppressDuplicates: 2016/03/21"], &[]);
        assert!(!Duplicate::from(CodePair::new(&one, &three)).is_suppressed());
    }

    #[test]
    fn test_contribute_adds_one_diagnostic_per_side() {
        let one = xact(9, 21, "", &[], &[]);
        let two = xact(13, 22, "", &[], &[]);
        let pair = Duplicate::from(AmountPair::new(first_posting(&one), first_posting(&two)));

        let mut report = CheckstyleReport::new();
        pair.contribute(&mut report);

        let diagnostics = report.diagnostics("main.ledger");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].line, 10);
        assert_eq!(
            diagnostics[0].message,
            "Possible duplicate of 2016/03/22 Payee 13 $10.00 Expenses:Grocery at main.ledger:14"
        );
        assert_eq!(diagnostics[1].line, 14);
        assert_eq!(
            diagnostics[1].message,
            "Possible duplicate of 2016/03/21 Payee 9 $10.00 Expenses:Grocery at main.ledger:10"
        );
    }
}
