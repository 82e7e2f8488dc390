//! Plain-text report
//!
//! One block per candidate, separated by newlines, followed by a blank line
//! and the total number of candidates.

use crate::core::Duplicate;
use crate::types::LedgerError;
use std::io::Write;

pub fn write_plain<W: Write>(duplicates: &[Duplicate<'_>], mut out: W) -> Result<(), LedgerError> {
    for duplicate in duplicates {
        writeln!(out, "{}", duplicate.render_text())?;
    }
    writeln!(out)?;
    writeln!(out, "{} potential duplicates found", duplicates.len())?;
    Ok(())
}
