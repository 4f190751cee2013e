//! Structured error types for finstr
//!
//! Using thiserror for automatic Display implementation and error chaining.
//!
//! The pipeline distinguishes recoverable anomalies (skip the event, keep
//! going) from whole-run failures. Rather than conflating both with process
//! exit, [`PipelineError::severity`] exposes the distinction as data and the
//! driver decides what to do with it.

use super::types::{CallAddress, Timestamp};
use std::path::PathBuf;
use thiserror::Error;

/// How bad a pipeline error is.
///
/// `Warning` errors drop a single event; `Fatal` errors terminate the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Fatal,
}

#[derive(Error, Debug)]
pub enum SymbolError {
    #[error("symbol `{symbol}` not found in {}", image.display())]
    NotFound { image: PathBuf, symbol: String },

    #[error("failed to read symbol table of {}: {detail}", image.display())]
    TableUnavailable { image: PathBuf, detail: String },
}

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("non-incrementing begin timestamps at {addr}: {prev} then {next}")]
    OutOfOrderBegin {
        addr: CallAddress,
        prev: Timestamp,
        next: Timestamp,
    },

    #[error("end timestamp {end} precedes begin {start} at {addr}")]
    EndBeforeBegin {
        addr: CallAddress,
        start: Timestamp,
        end: Timestamp,
    },

    #[error("end event at {addr} has no matching begin")]
    UnmatchedEnd { addr: CallAddress },
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("failed to load debug info for {}: {detail}", image.display())]
    NoDebugInfo { image: PathBuf, detail: String },

    #[error("address resolver command failed for {}: {detail}", image.display())]
    CommandFailed { image: PathBuf, detail: String },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Symbol(#[from] SymbolError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Whether this error drops one event or the whole run.
    ///
    /// Unresolvable symbols and unmatched ends are trace-quality issues local
    /// to one event. Ordering violations mean the input cannot be trusted at
    /// all, and I/O failures mean the output cannot be produced.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::Symbol(_) | Self::Match(MatchError::UnmatchedEnd { .. }) => Severity::Warning,
            Self::Match(_) | Self::Io(_) => Severity::Fatal,
        }
    }
}
