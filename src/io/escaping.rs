//! Backslash-escape transcoder for ledger CSV output
//!
//! Ledger quotes register fields but escapes embedded characters with a
//! backslash (`\"`, `\\`). The `csv` crate only understands RFC 4180 style
//! doubled quotes. `EscapingReader` sits between the two and rewrites the
//! stream on the fly:
//!
//! - bytes outside quoted fields pass through unchanged
//! - inside a quoted field `\"` becomes `""`
//! - inside a quoted field `\x` becomes `x` for any other byte
//!
//! # State Machine
//!
//! ```text
//! Unquoted --'"'--> Quoted --'\'--> Escape
//!    ^                 |               |
//!    +-------'"'-------+<--any byte----+
//! ```
//!
//! The state survives across `read` calls, so escapes split over chunk
//! boundaries are handled correctly.

use std::io::{self, Read};

/// Size of the chunk read from the underlying source
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Outside a quoted field
    Unquoted,
    /// Inside a quoted field
    Quoted,
    /// Inside a quoted field, previous byte was a backslash
    Escape,
}

/// Reader adapter translating backslash escapes into doubled quotes
#[derive(Debug)]
pub struct EscapingReader<R: Read> {
    inner: R,
    chunk: Box<[u8]>,
    /// Read cursor into `chunk`
    pos: usize,
    /// Number of valid bytes in `chunk`
    filled: usize,
    /// Escape output that did not fit into the caller's buffer
    pending: [u8; 2],
    pending_start: usize,
    pending_end: usize,
    state: State,
}

impl<R: Read> EscapingReader<R> {
    /// Wrap `inner` using the default chunk size
    pub fn new(inner: R) -> Self {
        Self::with_chunk_size(inner, DEFAULT_CHUNK_SIZE)
    }

    /// Wrap `inner`, reading at most `chunk_size` bytes per underlying read
    pub fn with_chunk_size(inner: R, chunk_size: usize) -> Self {
        Self {
            inner,
            chunk: vec![0; chunk_size.max(1)].into_boxed_slice(),
            pos: 0,
            filled: 0,
            pending: [0; 2],
            pending_start: 0,
            pending_end: 0,
            state: State::Unquoted,
        }
    }

    fn flush_pending(&mut self, out: &mut [u8], written: &mut usize) {
        while *written < out.len() && self.pending_start < self.pending_end {
            out[*written] = self.pending[self.pending_start];
            *written += 1;
            self.pending_start += 1;
        }
    }

    fn queue(&mut self, bytes: &[u8]) {
        self.pending[..bytes.len()].copy_from_slice(bytes);
        self.pending_start = 0;
        self.pending_end = bytes.len();
    }

    /// Translate buffered input into `out` until either runs out
    fn transcode(&mut self, out: &mut [u8], written: &mut usize) {
        while *written < out.len() && self.pos < self.filled {
            let byte = self.chunk[self.pos];
            self.pos += 1;

            match self.state {
                State::Unquoted => {
                    out[*written] = byte;
                    *written += 1;
                    if byte == b'"' {
                        self.state = State::Quoted;
                    }
                }
                State::Quoted => match byte {
                    b'"' => {
                        out[*written] = byte;
                        *written += 1;
                        self.state = State::Unquoted;
                    }
                    b'\\' => self.state = State::Escape,
                    _ => {
                        out[*written] = byte;
                        *written += 1;
                    }
                },
                State::Escape => {
                    self.state = State::Quoted;
                    if byte == b'"' {
                        self.queue(b"\"\"");
                    } else {
                        self.queue(&[byte]);
                    }
                    self.flush_pending(out, written);
                }
            }
        }
    }
}

impl<R: Read> Read for EscapingReader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }

        let mut written = 0;
        self.flush_pending(out, &mut written);
        if self.pending_start < self.pending_end {
            return Ok(written);
        }

        loop {
            if self.pos == self.filled {
                if written > 0 {
                    return Ok(written);
                }
                let n = self.inner.read(&mut self.chunk)?;
                if n == 0 {
                    // A dangling backslash at end of input is dropped
                    return Ok(0);
                }
                self.pos = 0;
                self.filled = n;
            }

            self.transcode(out, &mut written);

            // Returning 0 would signal end of input, so keep pulling chunks
            // while a chunk produced nothing (e.g. a lone backslash)
            if written > 0 {
                return Ok(written);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn read_all_with(reader: &mut impl Read, out_size: usize) -> String {
        let mut result = Vec::new();
        let mut buf = vec![0; out_size];
        loop {
            let n = reader.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            result.extend_from_slice(&buf[..n]);
        }
        String::from_utf8(result).unwrap()
    }

    #[rstest]
    #[case::simple("abcdef", "abcdef")]
    #[case::quoted_without_escapes(r#"a"b"\c"#, r#"a"b"\c"#)]
    #[case::escaped_quote_and_backslash(r#"a"b\"\\"c"#, r#"a"b""\"c"#)]
    #[case::escaped_other_byte(r#""\n\x""#, r#""nx""#)]
    #[case::newline_inside_quotes("\"line one\nline two\"", "\"line one\nline two\"")]
    #[case::dangling_backslash("\"abc\\", "\"abc")]
    fn test_transcodes_across_chunk_boundaries(
        #[case] input: &str,
        #[case] expected: &str,
        #[values(1, 2, 3, 4096)] chunk_size: usize,
        #[values(1, 2, 64)] out_size: usize,
    ) {
        let mut reader = EscapingReader::with_chunk_size(input.as_bytes(), chunk_size);
        assert_eq!(read_all_with(&mut reader, out_size), expected);
    }

    #[test]
    fn test_one_byte_buffer_splits_doubled_quote() {
        let mut reader = EscapingReader::new(r#""\"""#.as_bytes());
        let mut buf = [0u8; 1];

        let mut seen = Vec::new();
        while reader.read(&mut buf).unwrap() == 1 {
            seen.push(buf[0]);
        }
        assert_eq!(seen, br#""""""#.to_vec());
    }

    #[test]
    fn test_empty_output_buffer_reads_nothing() {
        let mut reader = EscapingReader::new("abc".as_bytes());
        assert_eq!(reader.read(&mut []).unwrap(), 0);
        assert_eq!(read_all_with(&mut reader, 8), "abc");
    }

    #[test]
    fn test_csv_reader_recovers_original_fields() {
        let input = "\"say \\\"hi\\\"\",\"back\\\\slash\",\"multi\nline\"\n";
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(EscapingReader::with_chunk_size(input.as_bytes(), 3));

        let record = csv_reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "say \"hi\"");
        assert_eq!(&record[1], "back\\slash");
        assert_eq!(&record[2], "multi\nline");
    }
}
