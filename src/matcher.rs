//! Begin/end pairing
//!
//! Maintains one stack of pending begin timestamps per call address and pairs
//! each end event with the most recent unmatched begin for the same address.
//! LIFO matching gives well-nested call semantics: for recursive or
//! re-entrant calls at the same address, the innermost call closes first.
//!
//! Event arrival order is temporal order. That is a strict precondition of
//! the input format, so a begin timestamp that goes backwards relative to the
//! pending stack for its address means the trace is corrupted, and continuing
//! would silently produce scrambled elapsed times. Those violations are
//! fatal; an end with no pending begin (truncated trace, instrumentation
//! asymmetry) only drops that one event.

use crate::domain::{CallAddress, MatchError, Timestamp};
use std::collections::HashMap;

/// A successfully paired begin/end with its elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedSpan {
    pub start: Timestamp,
    pub end: Timestamp,
    pub elapsed: u64,
}

/// Pairs begin/end events per call address.
///
/// The pending stacks are the only mutable state; the matcher is created at
/// the start of a run and discarded at the end.
#[derive(Debug, Default)]
pub struct CallStackMatcher {
    pending: HashMap<CallAddress, Vec<Timestamp>>,
}

impl CallStackMatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a begin event.
    ///
    /// # Errors
    /// Returns [`MatchError::OutOfOrderBegin`] (fatal) if the timestamp is
    /// earlier than the most recently pushed begin for the same address.
    pub fn begin(&mut self, addr: CallAddress, timestamp: Timestamp) -> Result<(), MatchError> {
        let stack = self.pending.entry(addr).or_default();
        if let Some(&prev) = stack.last() {
            if timestamp < prev {
                return Err(MatchError::OutOfOrderBegin {
                    addr,
                    prev,
                    next: timestamp,
                });
            }
        }
        stack.push(timestamp);
        Ok(())
    }

    /// Record an end event, pairing it with the most recent pending begin.
    ///
    /// # Errors
    /// Returns [`MatchError::UnmatchedEnd`] (warning) if no begin is pending
    /// for this address, and [`MatchError::EndBeforeBegin`] (fatal) if the
    /// pair would yield a negative elapsed time.
    pub fn end(
        &mut self,
        addr: CallAddress,
        timestamp: Timestamp,
    ) -> Result<MatchedSpan, MatchError> {
        let start = self
            .pending
            .get_mut(&addr)
            .and_then(Vec::pop)
            .ok_or(MatchError::UnmatchedEnd { addr })?;

        let elapsed = timestamp
            .0
            .checked_sub(start.0)
            .ok_or(MatchError::EndBeforeBegin {
                addr,
                start,
                end: timestamp,
            })?;

        Ok(MatchedSpan {
            start,
            end: timestamp,
            elapsed,
        })
    }

    /// Addresses still holding unmatched begins, with their stack depths.
    ///
    /// Non-empty leftovers at end-of-input are a diagnostic condition, not a
    /// failure: the trace may simply have been cut off mid-call.
    pub fn leftover(&self) -> impl Iterator<Item = (CallAddress, usize)> + '_ {
        self.pending
            .iter()
            .filter(|(_, stack)| !stack.is_empty())
            .map(|(&addr, stack)| (addr, stack.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: CallAddress = CallAddress(0x4010);

    #[test]
    fn test_simple_pair() {
        let mut matcher = CallStackMatcher::new();
        matcher.begin(ADDR, Timestamp(0x100)).unwrap();
        let span = matcher.end(ADDR, Timestamp(0x130)).unwrap();
        assert_eq!(span.start, Timestamp(0x100));
        assert_eq!(span.end, Timestamp(0x130));
        assert_eq!(span.elapsed, 48);
    }

    #[test]
    fn test_lifo_pairing_matches_innermost_first() {
        let mut matcher = CallStackMatcher::new();
        matcher.begin(ADDR, Timestamp(0x100)).unwrap();
        matcher.begin(ADDR, Timestamp(0x110)).unwrap();

        let inner = matcher.end(ADDR, Timestamp(0x120)).unwrap();
        assert_eq!((inner.start, inner.end), (Timestamp(0x110), Timestamp(0x120)));

        let outer = matcher.end(ADDR, Timestamp(0x130)).unwrap();
        assert_eq!((outer.start, outer.end), (Timestamp(0x100), Timestamp(0x130)));
    }

    #[test]
    fn test_equal_timestamps_are_allowed() {
        // Non-decreasing, not strictly increasing: zero-duration calls happen
        // with coarse clocks.
        let mut matcher = CallStackMatcher::new();
        matcher.begin(ADDR, Timestamp(0x100)).unwrap();
        matcher.begin(ADDR, Timestamp(0x100)).unwrap();
        let span = matcher.end(ADDR, Timestamp(0x100)).unwrap();
        assert_eq!(span.elapsed, 0);
    }

    #[test]
    fn test_out_of_order_begin_is_rejected() {
        let mut matcher = CallStackMatcher::new();
        matcher.begin(ADDR, Timestamp(0x200)).unwrap();
        let err = matcher.begin(ADDR, Timestamp(0x100)).unwrap_err();
        assert!(matches!(err, MatchError::OutOfOrderBegin { .. }));
    }

    #[test]
    fn test_ordering_is_per_address() {
        // A lower timestamp at a different address is fine
        let mut matcher = CallStackMatcher::new();
        matcher.begin(CallAddress(0x4010), Timestamp(0x200)).unwrap();
        matcher.begin(CallAddress(0x5020), Timestamp(0x100)).unwrap();
    }

    #[test]
    fn test_unmatched_end() {
        let mut matcher = CallStackMatcher::new();
        let err = matcher.end(ADDR, Timestamp(0x100)).unwrap_err();
        assert!(matches!(err, MatchError::UnmatchedEnd { addr } if addr == ADDR));

        // A drained stack behaves like an absent one
        matcher.begin(ADDR, Timestamp(0x100)).unwrap();
        matcher.end(ADDR, Timestamp(0x110)).unwrap();
        assert!(matcher.end(ADDR, Timestamp(0x120)).is_err());
    }

    #[test]
    fn test_end_before_begin_is_rejected() {
        let mut matcher = CallStackMatcher::new();
        matcher.begin(ADDR, Timestamp(0x100)).unwrap();
        let err = matcher.end(ADDR, Timestamp(0x50)).unwrap_err();
        assert!(matches!(err, MatchError::EndBeforeBegin { .. }));
    }

    #[test]
    fn test_leftover_reports_unmatched_begins() {
        let mut matcher = CallStackMatcher::new();
        matcher.begin(CallAddress(0x4010), Timestamp(0x100)).unwrap();
        matcher.begin(CallAddress(0x4010), Timestamp(0x110)).unwrap();
        matcher.begin(CallAddress(0x5020), Timestamp(0x120)).unwrap();
        matcher.end(CallAddress(0x5020), Timestamp(0x130)).unwrap();

        let mut leftover: Vec<_> = matcher.leftover().collect();
        leftover.sort();
        assert_eq!(leftover, vec![(CallAddress(0x4010), 2)]);
    }
}
