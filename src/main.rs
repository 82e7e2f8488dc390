//! Ledger Lint CLI
//!
//! Command-line interface for finding likely duplicate entries in a ledger
//! journal.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- -f main.ledger
//! cargo run -- -f main.ledger --dupdays 5 --checkstyle > duplicates.xml
//! ledger csv --csv-format ... | cargo run -- --source csv
//! RUST_LOG=debug cargo run -- --source csv -f register.csv
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success (whether or not duplicates were found)
//! - 1: Error (ledger failed, file not found, malformed register, etc.)

use env_logger::Env;
use ledger_lint::cli;
use ledger_lint::source;
use ledger_lint::{find_duplicates, render, LedgerError};
use std::io::{self, Write};
use std::process;

fn run(config: &cli::LintConfig) -> Result<(), LedgerError> {
    let transactions = source::create_source(config).read_transactions()?;
    let duplicates = find_duplicates(&transactions, config.window_days);
    log::info!(
        "{} potential duplicates among {} transactions",
        duplicates.len(),
        transactions.len()
    );

    let stdout = io::stdout();
    let mut output = io::BufWriter::new(stdout.lock());
    render(config.format, &duplicates, &mut output)?;
    output.flush()?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Parse command-line arguments using clap
    let args = cli::parse_args();
    let config = args.to_lint_config();
    log::debug!("Configuration: {:?}", config);

    if let Err(e) = run(&config) {
        log::error!("{}", e);
        process::exit(1);
    }
}
