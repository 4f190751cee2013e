//! Trace line tokenizer
//!
//! Decodes one line of instrumentation output into a [`TraceEvent`]. The
//! expected shape is:
//!
//! ```text
//! <Kind>@<hex-timestamp> <image>(<symbol>+<hex-offset>) [<hex-address>]
//! B@0x100 /bin/app(foo+0x10) [0x4010]
//! ```
//!
//! Lines that do not match (comments, blank lines, stray stderr output mixed
//! into the log) are not errors; they yield `None` and the caller skips them.
//!
//! The bracketed absolute address at the end must be present for the line to
//! count as a trace line, but its value is discarded: the pipeline recomputes
//! the call address from symbol + offset instead of trusting the embedded
//! one. Anything after the closing `]` is ignored.

use crate::domain::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Begin,
    End,
}

/// One decoded trace event. Created per input line, consumed immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub kind: EventKind,
    pub timestamp: Timestamp,
    /// Path of the binary image the call site lives in.
    pub image: String,
    /// Symbol name of the enclosing function (may be empty in broken traces).
    pub symbol: String,
    /// Byte offset of the call site from the symbol's base address.
    pub offset: u64,
}

/// Decode a single line, or `None` if it is not a trace line.
#[must_use]
pub fn parse_line(line: &str) -> Option<TraceEvent> {
    let (kind, rest) = if let Some(rest) = line.strip_prefix("B@") {
        (EventKind::Begin, rest)
    } else if let Some(rest) = line.strip_prefix("E@") {
        (EventKind::End, rest)
    } else {
        return None;
    };

    let (timestamp_text, rest) = rest.split_once(' ')?;
    let timestamp = Timestamp(parse_hex(timestamp_text, Prefix::Required)?);

    let (image, rest) = rest.split_once('(')?;
    if image.is_empty() {
        return None;
    }

    let (symbol, rest) = rest.split_once('+')?;
    let (offset_text, rest) = rest.split_once(')')?;
    let offset = parse_hex(offset_text, Prefix::Optional)?;

    // Shape-check the embedded absolute address, then throw it away.
    let rest = rest.strip_prefix(" [")?;
    let (address_text, _trailing) = rest.split_once(']')?;
    parse_hex(address_text, Prefix::Required)?;

    Some(TraceEvent {
        kind,
        timestamp,
        image: image.to_string(),
        symbol: symbol.to_string(),
        offset,
    })
}

#[derive(Clone, Copy)]
enum Prefix {
    Required,
    Optional,
}

fn parse_hex(text: &str, prefix: Prefix) -> Option<u64> {
    let digits = match (text.strip_prefix("0x"), prefix) {
        (Some(digits), _) => digits,
        (None, Prefix::Required) => return None,
        (None, Prefix::Optional) => text,
    };
    u64::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_begin_event() {
        let event = parse_line("B@0x100 /bin/app(foo+0x10) [0x4010]").unwrap();
        assert_eq!(event.kind, EventKind::Begin);
        assert_eq!(event.timestamp, Timestamp(0x100));
        assert_eq!(event.image, "/bin/app");
        assert_eq!(event.symbol, "foo");
        assert_eq!(event.offset, 0x10);
    }

    #[test]
    fn test_parses_end_event() {
        let event = parse_line("E@0x120 /bin/app(foo+0x10) [0x4010]").unwrap();
        assert_eq!(event.kind, EventKind::End);
        assert_eq!(event.timestamp, Timestamp(0x120));
    }

    #[test]
    fn test_offset_without_prefix() {
        // The original tooling accepts both `+0x10` and `+10`
        let event = parse_line("B@0x100 /bin/app(foo+10) [0x4010]").unwrap();
        assert_eq!(event.offset, 0x10);
    }

    #[test]
    fn test_empty_symbol_is_accepted() {
        // Broken instrumentation can emit an empty symbol; resolution fails
        // later, but the line itself still parses.
        let event = parse_line("B@0x100 /bin/app(+0x10) [0x4010]").unwrap();
        assert_eq!(event.symbol, "");
    }

    #[test]
    fn test_trailing_garbage_after_bracket_is_ignored() {
        assert!(parse_line("B@0x100 /bin/app(foo+0x10) [0x4010] extra").is_some());
    }

    #[test]
    fn test_non_trace_lines_yield_none() {
        assert!(parse_line("").is_none());
        assert!(parse_line("# comment").is_none());
        assert!(parse_line("some random log output").is_none());
        // Wrong kind marker
        assert!(parse_line("X@0x100 /bin/app(foo+0x10) [0x4010]").is_none());
        // Leading whitespace is not tolerated (events start at column 0)
        assert!(parse_line(" B@0x100 /bin/app(foo+0x10) [0x4010]").is_none());
    }

    #[test]
    fn test_malformed_fields_yield_none() {
        // Timestamp must carry the 0x prefix
        assert!(parse_line("B@100 /bin/app(foo+0x10) [0x4010]").is_none());
        // Non-hex timestamp
        assert!(parse_line("B@0xzz /bin/app(foo+0x10) [0x4010]").is_none());
        // Empty image
        assert!(parse_line("B@0x100 (foo+0x10) [0x4010]").is_none());
        // Missing offset
        assert!(parse_line("B@0x100 /bin/app(foo+) [0x4010]").is_none());
        // Missing bracketed address suffix
        assert!(parse_line("B@0x100 /bin/app(foo+0x10)").is_none());
        assert!(parse_line("B@0x100 /bin/app(foo+0x10) [4010]").is_none());
        assert!(parse_line("B@0x100 /bin/app(foo+0x10) [0x4010").is_none());
    }
}
