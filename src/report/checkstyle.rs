//! Checkstyle XML report
//!
//! Diagnostics are grouped per source file, files in the order they were
//! first reported. Each duplicate candidate contributes one diagnostic per
//! side, each pointing at the other occurrence.
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <checkstyle version="7.2">
//!   <file name="main.ledger">
//!     <error line="10" severity="warning" message="..." source="dupdetector"/>
//!   </file>
//! </checkstyle>
//! ```

use crate::core::Duplicate;
use crate::types::LedgerError;
use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Write;

pub const CHECKSTYLE_VERSION: &str = "7.2";
pub const SEVERITY: &str = "warning";
pub const SOURCE: &str = "dupdetector";

/// A single diagnostic attached to a line of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub severity: &'static str,
    pub message: String,
    pub source: &'static str,
}

/// Diagnostics grouped per file
#[derive(Debug, Default)]
pub struct CheckstyleReport {
    files: IndexMap<String, Vec<Diagnostic>>,
}

impl CheckstyleReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a report from every candidate
    pub fn from_duplicates(duplicates: &[Duplicate<'_>]) -> Self {
        let mut report = Self::new();
        for duplicate in duplicates {
            duplicate.contribute(&mut report);
        }
        report
    }

    pub fn add(&mut self, file: &str, line: u32, message: String) {
        let diagnostic = Diagnostic {
            line,
            severity: SEVERITY,
            message,
            source: SOURCE,
        };
        match self.files.get_mut(file) {
            Some(diagnostics) => diagnostics.push(diagnostic),
            None => {
                self.files.insert(file.to_string(), vec![diagnostic]);
            }
        }
    }

    /// Diagnostics reported against `file`, in insertion order
    pub fn diagnostics(&self, file: &str) -> &[Diagnostic] {
        self.files.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Serialize the report as indented checkstyle XML
    pub fn write_to<W: Write>(&self, out: W) -> Result<(), LedgerError> {
        let mut wr = Writer::new_with_indent(out, b' ', 2);

        wr.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(LedgerError::xml)?;

        let root = BytesStart::new("checkstyle").with_attributes([("version", CHECKSTYLE_VERSION)]);
        wr.write_event(Event::Start(root)).map_err(LedgerError::xml)?;

        for (name, diagnostics) in &self.files {
            let file = BytesStart::new("file").with_attributes([("name", name.as_str())]);
            wr.write_event(Event::Start(file)).map_err(LedgerError::xml)?;

            for diagnostic in diagnostics {
                let line = diagnostic.line.to_string();
                let error = BytesStart::new("error").with_attributes([
                    ("line", line.as_str()),
                    ("severity", diagnostic.severity),
                    ("message", diagnostic.message.as_str()),
                    ("source", diagnostic.source),
                ]);
                wr.write_event(Event::Empty(error)).map_err(LedgerError::xml)?;
            }

            wr.write_event(Event::End(BytesEnd::new("file")))
                .map_err(LedgerError::xml)?;
        }

        wr.write_event(Event::End(BytesEnd::new("checkstyle")))
            .map_err(LedgerError::xml)?;
        wr.get_mut().write_all(b"\n")?;
        Ok(())
    }
}

/// Write every candidate as a checkstyle document
pub fn write_checkstyle<W: Write>(duplicates: &[Duplicate<'_>], out: W) -> Result<(), LedgerError> {
    CheckstyleReport::from_duplicates(duplicates).write_to(out)
}
