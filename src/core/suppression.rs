//! Suppression directives embedded in notes
//!
//! Users silence a known false positive by adding a note such as
//!
//! ```text
//! ; SuppressDuplicates: 2016/03/22, 2016/03/23
//! ```
//!
//! to one side of the pair. The dates name the other occurrence(s). Parsing
//! of a note line stops at the first token that is not a bare date; a valid
//! date followed by trailing text is still honoured.

use crate::types::DATE_FORMAT;
use chrono::NaiveDate;

/// Note prefixes that suppress amount duplicates
pub const AMOUNT_SUPPRESSION_PREFIXES: &[&str] = &["SuppressDuplicates", "SuppressAmountDuplicates"];

/// Note prefixes that suppress code duplicates
pub const CODE_SUPPRESSION_PREFIXES: &[&str] = &["SuppressCodeDuplicates"];

/// Length of a `YYYY/MM/DD` date
const DATE_LEN: usize = 10;

/// Which kind of duplicate a directive applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressionKind {
    Amount,
    Code,
}

impl SuppressionKind {
    pub fn prefixes(&self) -> &'static [&'static str] {
        match self {
            SuppressionKind::Amount => AMOUNT_SUPPRESSION_PREFIXES,
            SuppressionKind::Code => CODE_SUPPRESSION_PREFIXES,
        }
    }
}

/// Collect every date suppressed by directives of `kind` in `notes`
pub fn suppressed_dates<S: AsRef<str>>(kind: SuppressionKind, notes: &[S]) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    for line in notes {
        let line = line.as_ref();
        for prefix in kind.prefixes() {
            let marker = format!("{}:", prefix);
            if let Some(index) = line.find(&marker) {
                parse_date_list(&line[index + marker.len()..], &mut dates);
            }
        }
    }
    dates
}

/// Whether `notes` contain a directive of `kind` naming `date`
pub fn is_date_suppressed<S: AsRef<str>>(kind: SuppressionKind, date: NaiveDate, notes: &[S]) -> bool {
    suppressed_dates(kind, notes).contains(&date)
}

fn parse_date_list(list: &str, dates: &mut Vec<NaiveDate>) {
    for candidate in list.split(',') {
        let candidate = candidate.trim();
        let token = match candidate.get(..DATE_LEN) {
            Some(token) => token,
            None => break,
        };
        if let Ok(date) = NaiveDate::parse_from_str(token, DATE_FORMAT) {
            dates.push(date);
        }
        if candidate.len() > DATE_LEN {
            // trailing text after a date ends this line
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[rstest]
    #[case::no_notes(&[], &[])]
    #[case::single(&["SuppressAmountDuplicates: 2016/04/03"], &["2016/04/03"])]
    #[case::list(
        &["SuppressAmountDuplicates: 2016/04/03, 2016/04/04,2016/04/05"],
        &["2016/04/03", "2016/04/04", "2016/04/05"]
    )]
    #[case::several_lines(
        &[
            "SuppressAmountDuplicates: 2016/02/03",
            "some irrelevant stuff here: 2016/02/04",
            "SuppressAmountDuplicates: 2016/02/05",
        ],
        &["2016/02/03", "2016/02/05"]
    )]
    #[case::short_prefix(&[" SuppressDuplicates: 2016/03/22"], &["2016/03/22"])]
    #[case::trailing_text_stops_line(
        &["SuppressDuplicates: 2016/03/22 see bank statement, 2016/03/23"],
        &["2016/03/22"]
    )]
    #[case::short_token_stops_line(&["SuppressDuplicates: 2016/3/1, 2016/03/23"], &[])]
    #[case::invalid_date_is_skipped(
        &["SuppressDuplicates: 2016/13/45, 2016/03/23"],
        &["2016/03/23"]
    )]
    #[case::code_prefix_ignored(&["SuppressCodeDuplicates: 2016/03/22"], &[])]
    fn test_amount_suppressed_dates(#[case] notes: &[&str], #[case] expected: &[&str]) {
        let expected: Vec<_> = expected.iter().map(|d| date(d)).collect();
        assert_eq!(suppressed_dates(SuppressionKind::Amount, notes), expected);
    }

    #[rstest]
    #[case::code_prefix(&["SuppressCodeDuplicates: 2016/03/22"], true)]
    #[case::amount_prefix(&["SuppressDuplicates: 2016/03/22"], false)]
    #[case::other_date(&["SuppressCodeDuplicates: 2016/03/21"], false)]
    fn test_code_suppression(#[case] notes: &[&str], #[case] expected: bool) {
        assert_eq!(
            is_date_suppressed(SuppressionKind::Code, date("2016/03/22"), notes),
            expected
        );
    }
}
