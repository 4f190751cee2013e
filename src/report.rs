//! CSV report emitter
//!
//! One header row, then one row per matched call, streamed as matches are
//! found. Timestamps and the call address stay in hex; elapsed is decimal.
//! The source column is written as-is — embedded commas are not escaped,
//! which is an accepted limitation of the format.

use crate::domain::{CallAddress, Timestamp};
use std::io::{self, Write};

/// A fully resolved per-call record, emitted immediately and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedCall {
    pub start: Timestamp,
    pub end: Timestamp,
    pub elapsed: u64,
    pub image: String,
    pub symbol: String,
    pub call_addr: CallAddress,
    pub source: String,
}

/// Writes the timing table to any `Write` sink (stdout, file, test buffer).
pub struct ReportEmitter<W: Write> {
    out: W,
}

impl<W: Write> ReportEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write the column header row.
    ///
    /// # Errors
    /// Propagates I/O failures from the sink.
    pub fn write_header(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "start_time,end_time,elapsed,elf,sym_name,call_addr,source"
        )
    }

    /// Write one matched-call row.
    ///
    /// # Errors
    /// Propagates I/O failures from the sink.
    pub fn write_row(&mut self, call: &MatchedCall) -> io::Result<()> {
        writeln!(
            self.out,
            "{},{},{},{},{},{},{}",
            call.start, call.end, call.elapsed, call.image, call.symbol, call.call_addr, call.source
        )
    }

    /// Flush the underlying sink.
    ///
    /// # Errors
    /// Propagates I/O failures from the sink.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_call() -> MatchedCall {
        MatchedCall {
            start: Timestamp(0x110),
            end: Timestamp(0x120),
            elapsed: 16,
            image: "/bin/app".to_string(),
            symbol: "foo".to_string(),
            call_addr: CallAddress(0x4010),
            source: "foo at src/app.c:42".to_string(),
        }
    }

    #[test]
    fn test_header_columns() {
        let mut buf = Vec::new();
        ReportEmitter::new(&mut buf).write_header().unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "start_time,end_time,elapsed,elf,sym_name,call_addr,source\n"
        );
    }

    #[test]
    fn test_row_format() {
        let mut buf = Vec::new();
        ReportEmitter::new(&mut buf).write_row(&sample_call()).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "0x110,0x120,16,/bin/app,foo,0x4010,foo at src/app.c:42\n"
        );
    }

    #[test]
    fn test_elapsed_is_decimal() {
        let mut call = sample_call();
        call.elapsed = 0x30;
        let mut buf = Vec::new();
        ReportEmitter::new(&mut buf).write_row(&call).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains(",48,"));
    }
}
