//! # Pipeline driver
//!
//! One strictly sequential pass over the trace, in arrival order:
//!
//! ```text
//! raw line ─▶ parser ─▶ symbol cache ─▶ call address ─▶ matcher ─▶ source resolver ─▶ row
//! ```
//!
//! Rows are streamed to the emitter as matches are found; diagnostics go to
//! the log stream so they never corrupt the table. Recoverable anomalies
//! (non-trace lines, unresolvable symbols, unmatched ends) are counted and
//! skipped; an ordering violation or an I/O failure aborts the run with the
//! error propagated to the caller.

use crate::domain::{CallAddress, MatchError, PipelineError, Severity};
use crate::matcher::CallStackMatcher;
use crate::parser::{parse_line, EventKind, TraceEvent};
use crate::report::{MatchedCall, ReportEmitter};
use crate::symbolization::{AddressResolverService, SymbolTableCache};
use log::warn;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;

/// Marker emitted in the source column when resolution fails for a row.
const UNRESOLVED_SOURCE: &str = "??";

/// Counters accumulated over one run, reported at the end.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub lines_read: usize,
    pub events_parsed: usize,
    pub rows_emitted: usize,
    pub unresolved_symbols: usize,
    pub unmatched_ends: usize,
    pub source_failures: usize,
    /// Begin events still pending at end-of-input (truncated trace).
    pub leftover_begins: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines, {} events, {} rows (unresolved symbols: {}, unmatched ends: {}, source failures: {}, leftover begins: {})",
            self.lines_read,
            self.events_parsed,
            self.rows_emitted,
            self.unresolved_symbols,
            self.unmatched_ends,
            self.source_failures,
            self.leftover_begins,
        )
    }
}

/// Owns the per-run state and drives events through the stages.
///
/// The symbol cache and the pending-call stacks are explicit members, scoped
/// to one pipeline instance; there is no process-wide state, so independent
/// runs (and tests) cannot observe each other.
pub struct Pipeline<W: Write> {
    symbols: SymbolTableCache,
    resolver: Box<dyn AddressResolverService>,
    matcher: CallStackMatcher,
    emitter: ReportEmitter<W>,
    summary: Summary,
}

impl<W: Write> Pipeline<W> {
    pub fn new(
        symbols: SymbolTableCache,
        resolver: Box<dyn AddressResolverService>,
        out: W,
    ) -> Self {
        Self {
            symbols,
            resolver,
            matcher: CallStackMatcher::new(),
            emitter: ReportEmitter::new(out),
            summary: Summary::default(),
        }
    }

    /// Process the whole input and return the run's counters.
    ///
    /// # Errors
    /// Returns the first [`Severity::Fatal`] error: an ordering violation in
    /// the trace, or an I/O failure on input or output. Warnings are logged
    /// and counted, never returned.
    pub fn run(mut self, input: impl BufRead) -> Result<Summary, PipelineError> {
        self.emitter.write_header()?;

        for line in input.lines() {
            let line = line?;
            self.summary.lines_read += 1;

            let Some(event) = parse_line(&line) else {
                continue;
            };
            self.summary.events_parsed += 1;

            if let Err(err) = self.process_event(&event) {
                match err.severity() {
                    Severity::Warning => {
                        warn!("{err}");
                        match &err {
                            PipelineError::Symbol(_) => self.summary.unresolved_symbols += 1,
                            PipelineError::Match(MatchError::UnmatchedEnd { .. }) => {
                                self.summary.unmatched_ends += 1;
                            }
                            PipelineError::Match(_) | PipelineError::Io(_) => {}
                        }
                    }
                    Severity::Fatal => return Err(err),
                }
            }
        }

        self.finish()
    }

    fn process_event(&mut self, event: &TraceEvent) -> Result<(), PipelineError> {
        let base = self.symbols.resolve(&event.image, &event.symbol)?;
        let addr = CallAddress::new(base, event.offset);

        match event.kind {
            EventKind::Begin => self.matcher.begin(addr, event.timestamp)?,
            EventKind::End => {
                let span = self.matcher.end(addr, event.timestamp)?;

                let source = match self.resolver.describe(Path::new(&event.image), addr) {
                    Ok(source) => source,
                    Err(err) => {
                        warn!("{err}");
                        self.summary.source_failures += 1;
                        UNRESOLVED_SOURCE.to_string()
                    }
                };

                self.emitter.write_row(&MatchedCall {
                    start: span.start,
                    end: span.end,
                    elapsed: span.elapsed,
                    image: event.image.clone(),
                    symbol: event.symbol.clone(),
                    call_addr: addr,
                    source,
                })?;
                self.summary.rows_emitted += 1;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Summary, PipelineError> {
        for (addr, depth) in self.matcher.leftover() {
            warn!("{depth} begin event(s) at {addr} never ended");
            self.summary.leftover_begins += depth;
        }
        self.emitter.flush()?;
        Ok(self.summary)
    }
}
