use crate::core::DEFAULT_WINDOW_DAYS;
use crate::report::ReportFormat;
use crate::source::ledger_command::DEFAULT_LEDGER_BIN;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Find likely duplicate entries in a ledger journal
#[derive(Parser, Debug)]
#[command(name = "ledger-lint")]
#[command(about = "Find likely duplicate entries in a ledger journal", long_about = None)]
pub struct CliArgs {
    /// Ledger journal, or exported register when reading from csv
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        help = "Ledger journal (ledger source) or register export (csv source)"
    )]
    pub file: Option<PathBuf>,

    /// Where transactions are read from
    #[arg(
        long = "source",
        value_name = "SOURCE",
        default_value = "ledger",
        help = "Transaction source: 'ledger' runs the ledger binary, 'csv' reads an export"
    )]
    pub source: SourceType,

    /// Ledger binary to run
    #[arg(
        long = "ledger-bin",
        value_name = "PATH",
        env = "LEDGER_BIN",
        default_value = DEFAULT_LEDGER_BIN,
        help = "Path or name of the ledger binary"
    )]
    pub ledger_bin: String,

    /// Day window for amount duplicates
    #[arg(
        short = 'd',
        long = "dupdays",
        value_name = "DAYS",
        default_value_t = DEFAULT_WINDOW_DAYS,
        allow_negative_numbers = true,
        help = "Days to search on each side of a posting; negative disables amount duplicates"
    )]
    pub dupdays: i64,

    /// Emit checkstyle XML instead of plain text
    #[arg(short = 'c', long = "checkstyle", help = "Output checkstyle XML")]
    pub checkstyle: bool,
}

/// Available transaction sources
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceType {
    Ledger,
    Csv,
}

/// Resolved configuration for one lint run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LintConfig {
    pub source: SourceType,
    pub file: Option<PathBuf>,
    pub ledger_bin: String,
    pub window_days: i64,
    pub format: ReportFormat,
}

impl CliArgs {
    /// Create a LintConfig from CLI arguments
    pub fn to_lint_config(&self) -> LintConfig {
        LintConfig {
            source: self.source,
            file: self.file.clone(),
            ledger_bin: self.ledger_bin.clone(),
            window_days: self.dupdays,
            format: if self.checkstyle {
                ReportFormat::Checkstyle
            } else {
                ReportFormat::Plain
            },
        }
    }
}
