//! # finstr - Instrumentation Trace Post-Processor
//!
//! finstr converts a raw function-instrumentation trace (timestamped `B`/`E`
//! begin/end markers referencing binary call sites) into a table of per-call
//! timing records, with each call site resolved to a human-readable source
//! location.
//!
//! ## Architecture Overview
//!
//! ```text
//! B@0x100 /bin/app(foo+0x10) [0x4010]          raw trace line
//!            │
//!            ▼
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐
//! │ Line Parser  │──▶│ Symbol Table     │──▶│ Call Stack   │
//! │  (tokenizer) │   │ Cache (per image)│   │ Matcher      │
//! └──────────────┘   └──────────────────┘   │ (LIFO pairs) │
//!                                           └──────┬───────┘
//!                                                  │ matched call
//!                                                  ▼
//!                    ┌──────────────────┐   ┌──────────────┐
//!                    │ Source Resolver  │──▶│ Report       │
//!                    │ (DWARF/addr2line)│   │ Emitter (CSV)│
//!                    └──────────────────┘   └──────────────┘
//! ```
//!
//! Data flows strictly downstream, single-threaded, one pass in arrival
//! order. The embedded absolute address in each trace line is ignored; the
//! call address is recomputed as `symbol base + offset` from the image's own
//! symbol table.
//!
//! ## Module Structure
//!
//! - [`parser`]: tokenizes one trace line into a typed event; non-matching
//!   lines are silently skipped
//! - [`symbolization`]: the two external collaborators behind narrow traits
//!   (symbol table reader, address-to-source resolver), with in-process
//!   ELF/DWARF implementations and external `nm`/`addr2line` command
//!   implementations, plus the per-image symbol table cache
//! - [`matcher`]: pairs each end event with the most recent unmatched begin
//!   for the same call address and computes elapsed time; validates that
//!   begin timestamps never go backwards per address
//! - [`report`]: streams the CSV table (header + one row per matched call)
//! - [`pipeline`]: drives a run end to end and accumulates diagnostic
//!   counters
//! - [`cli`]: command-line argument parsing
//! - [`domain`]: core newtypes and error/severity taxonomy
//!
//! ## Error Taxonomy
//!
//! | Condition                      | Handling                              |
//! |--------------------------------|---------------------------------------|
//! | Non-trace line                 | silently skipped                      |
//! | Symbol not in image's table    | warning, event dropped                |
//! | End with no pending begin      | warning, event dropped                |
//! | Begin timestamp going backwards| fatal, run aborts, non-zero exit      |
//! | Source resolution failure      | warning, row emitted with `??` source |
//!
//! Diagnostics go to stderr via the logger; the table itself is the only
//! thing written to the output stream.

pub mod cli;
pub mod domain;
pub mod matcher;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod symbolization;
