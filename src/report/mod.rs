//! Report rendering
//!
//! Candidates are rendered either as plain text for a terminal or as a
//! checkstyle document for editors and CI tooling.

pub mod checkstyle;
pub mod plain;

pub use checkstyle::{write_checkstyle, CheckstyleReport, Diagnostic};
pub use plain::write_plain;

use crate::core::Duplicate;
use crate::types::LedgerError;
use clap::ValueEnum;
use std::io::Write;

/// Output format of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Human readable blocks and a summary line
    #[default]
    Plain,
    /// Checkstyle XML
    Checkstyle,
}

/// Render `duplicates` to `out` in the requested format
pub fn render<W: Write>(
    format: ReportFormat,
    duplicates: &[Duplicate<'_>],
    out: W,
) -> Result<(), LedgerError> {
    log::debug!("Rendering {} candidates as {:?}", duplicates.len(), format);
    match format {
        ReportFormat::Plain => write_plain(duplicates, out),
        ReportFormat::Checkstyle => write_checkstyle(duplicates, out),
    }
}
