//! Ledger subprocess source
//!
//! Runs `ledger csv` with a custom format that emits the twelve register
//! columns and parses its standard output while the process runs.
//!
//! Standard output is drained on a reader thread until the pipe closes,
//! even when parsing stops early, so the child never blocks on a full pipe.
//! Standard error is forwarded to our own on a second thread.

use crate::io::register_reader::read_transactions;
use crate::types::{LedgerError, Transaction};
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

/// Format string passed to `ledger csv --csv-format`
///
/// Column order must match `csv_format::COLUMNS`.
pub const CSV_FORMAT: &str = concat!(
    r#"%(quoted(filename)),"#,
    r#"%(quoted(xact.beg_line)),"#,
    r#"%(quoted(join(xact.note))),"#,
    r#"%(quoted(date)),"#,
    r#"%(quoted(code)),"#,
    r#"%(quoted(payee)),"#,
    r#"%(quoted(beg_line)),"#,
    r#"%(quoted(display_account)),"#,
    r#"%(quoted(commodity(scrub(display_amount)))),"#,
    r#"%(quoted(quantity(scrub(display_amount)))),"#,
    r#"%(quoted(cleared ? "*" : (pending ? "!" : ""))),"#,
    r#"%(quoted(join(note)))"#,
    r#"\n"#,
);

/// Build the `ledger csv` invocation for `file` (or ledger's default journal)
pub fn ledger_command(program: &str, file: Option<&Path>) -> Command {
    let mut command = Command::new(program);
    command.arg("csv").arg("--csv-format").arg(CSV_FORMAT);
    if let Some(file) = file {
        command.arg("-f").arg(file);
    }
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    command
}

/// Run ledger and read every transaction it reports
///
/// # Errors
///
/// - `SubprocessError` if the program cannot be started, cannot be waited
///   for, or exits unsuccessfully
/// - any read error from the register export, once the process succeeded
pub fn read_from_ledger(program: &str, file: Option<&Path>) -> Result<Vec<Transaction>, LedgerError> {
    let mut command = ledger_command(program, file);
    log::debug!("Running {:?}", command);

    let mut child = command
        .spawn()
        .map_err(|e| LedgerError::subprocess(program, e))?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| LedgerError::subprocess(program, "standard output was not captured"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| LedgerError::subprocess(program, "standard error was not captured"))?;

    let reader = thread::spawn(move || {
        let result = read_transactions(&mut stdout);
        let _ = io::copy(&mut stdout, &mut io::sink());
        result
    });
    let forwarder = thread::spawn(move || {
        let _ = io::copy(&mut stderr, &mut io::stderr());
    });

    let status = child
        .wait()
        .map_err(|e| LedgerError::subprocess(program, e))?;
    let result = reader
        .join()
        .map_err(|_| LedgerError::subprocess(program, "register reader thread panicked"))?;
    if forwarder.join().is_err() {
        log::warn!("Standard error forwarder for '{}' panicked", program);
    }

    if !status.success() {
        return Err(LedgerError::subprocess(program, status));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let command = ledger_command("ledger", Some(Path::new("main.ledger")));
        let args: Vec<_> = command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();

        assert_eq!(command.get_program(), "ledger");
        assert_eq!(args, vec!["csv", "--csv-format", CSV_FORMAT, "-f", "main.ledger"]);
    }

    #[test]
    fn test_command_line_without_file() {
        let command = ledger_command("ledger", None);
        assert_eq!(command.get_args().count(), 3);
    }

    #[test]
    fn test_format_has_one_field_per_column() {
        assert_eq!(CSV_FORMAT.matches("%(quoted(").count(), crate::io::csv_format::COLUMN_COUNT);
        assert!(CSV_FORMAT.ends_with(r"\n"));
    }

    #[test]
    fn test_missing_program() {
        let error = read_from_ledger("/nonexistent/ledger-binary", None).unwrap_err();
        assert!(matches!(
            error,
            LedgerError::SubprocessError { ref program, .. } if program == "/nonexistent/ledger-binary"
        ));
    }

    #[cfg(unix)]
    mod fake_ledger {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::PathBuf;
        use tempfile::TempDir;

        const REGISTER: &str = concat!(
            "\"main.ledger\",\"1\",\"\",\"2016/03/21\",\"\",\"Store\",\"2\",\"Expenses:Grocery\",\"$\",\"10.00\",\"\",\"\"\n",
            "\"main.ledger\",\"1\",\"\",\"2016/03/21\",\"\",\"Store\",\"3\",\"Assets:Checking\",\"$\",\"-10.00\",\"\",\"\"\n",
        );

        /// Write an executable script standing in for the ledger binary
        fn fake_ledger(dir: &TempDir, body: &str) -> PathBuf {
            let data = dir.path().join("register.csv");
            fs::write(&data, REGISTER).unwrap();

            let script = dir.path().join("ledger");
            let text = format!(
                "#!/bin/sh\n[ \"$1\" = csv ] && [ \"$2\" = --csv-format ] || exit 64\n{}\n",
                body.replace("$DATA", &data.to_string_lossy())
            );
            fs::write(&script, text).unwrap();
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
            script
        }

        #[test]
        fn test_reads_transactions_from_subprocess() {
            let dir = TempDir::new().unwrap();
            let script = fake_ledger(&dir, "cat \"$DATA\"");

            let transactions = read_from_ledger(&script.to_string_lossy(), None).unwrap();
            assert_eq!(transactions.len(), 1);
            assert_eq!(transactions[0].payee, "Store");
        }

        #[test]
        fn test_non_zero_exit_is_an_error() {
            let dir = TempDir::new().unwrap();
            let script = fake_ledger(&dir, "cat \"$DATA\"\necho 'Error: no journal' >&2\nexit 1");

            let error = read_from_ledger(&script.to_string_lossy(), None).unwrap_err();
            assert!(matches!(error, LedgerError::SubprocessError { .. }));
        }

        #[test]
        fn test_parse_error_still_drains_output() {
            let dir = TempDir::new().unwrap();
            // Far more output than a pipe buffer holds, on both streams
            let script = fake_ledger(
                &dir,
                "echo 'not,a,register'\n\
                 yes 'warning: unbalanced virtual posting' | head -c 98304 >&2\n\
                 yes \"$(cat \"$DATA\")\" | head -c 2097152",
            );

            let error = read_from_ledger(&script.to_string_lossy(), None).unwrap_err();
            assert!(matches!(error, LedgerError::FormatError { row: 1, .. }));
        }
    }
}
