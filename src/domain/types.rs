//! Core value types
//!
//! Timestamps and call addresses travel through every pipeline stage, so both
//! get newtypes instead of bare `u64`s. Display renders the hexadecimal form
//! used for report rows and diagnostics.

use std::fmt;

/// A raw trace timestamp, in whatever time base the instrumentation used.
///
/// The pipeline never converts units; elapsed times are plain differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub u64);

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Absolute address of a call site: symbol base address + byte offset.
///
/// Used both as the pending-stack key and in emitted rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallAddress(pub u64);

impl CallAddress {
    #[must_use]
    pub fn new(base: u64, offset: u64) -> Self {
        Self(base.wrapping_add(offset))
    }
}

impl fmt::Display for CallAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}
