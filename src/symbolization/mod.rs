//! # Symbol Resolution and Address Translation
//!
//! This module turns the symbolic call sites recorded in the trace back into
//! numbers and source locations:
//!
//! - A trace event names a call site as `image(symbol+offset)`. The
//!   [`SymbolTableService`] supplies the symbol's base address inside the
//!   image, and the call address is `base + offset`.
//! - Once a call is matched, the [`AddressResolverService`] maps the call
//!   address back to `function at file:line` via debug information.
//!
//! Both collaborators are external services behind narrow traits. Two
//! implementations of each ship with the tool:
//!
//! - **In-process** (default): [`ElfSymbolTable`] reads the image's ELF
//!   symbol table with the `object` crate; [`DwarfResolver`] loads DWARF
//!   debug info with `addr2line`/`gimli` and demangles names.
//! - **External commands** (`--nm`, `--addr2line`): [`NmCommand`] and
//!   [`Addr2LineCommand`] shell out to nm- and addr2line-compatible tools,
//!   for images the in-process readers cannot handle.
//!
//! ## Eligible symbols
//!
//! Only defined, globally-visible text-section symbols are valid call
//! targets, matching nm's `T` symbol class. Undefined, data, and local
//! symbols are filtered out by both symbol-table implementations.
//!
//! ## Caching
//!
//! Reading a symbol table or loading DWARF is expensive, and a large trace
//! references the same handful of images millions of times. The
//! [`SymbolTableCache`] invokes its service at most once per distinct image
//! per run (failed loads are cached too), and [`DwarfResolver`] keeps one
//! `addr2line::Context` per image.

pub mod cache;
pub mod command;
pub mod dwarf;
pub mod elf;

pub use cache::SymbolTableCache;
pub use command::{Addr2LineCommand, NmCommand};
pub use dwarf::DwarfResolver;
pub use elf::ElfSymbolTable;

use crate::domain::{CallAddress, ResolveError, SymbolError};
use std::path::Path;

/// Black-box reader of a binary image's symbol table.
pub trait SymbolTableService {
    /// List the defined, global, text-section symbols of `image` with their
    /// absolute addresses.
    ///
    /// # Errors
    /// Returns [`SymbolError::TableUnavailable`] if the image cannot be read
    /// or parsed.
    fn list_defined_function_symbols(&self, image: &Path)
        -> Result<Vec<(String, u64)>, SymbolError>;
}

/// Black-box mapper from an absolute address to a source description.
pub trait AddressResolverService {
    /// Describe `addr` within `image` as `function at file:line`.
    ///
    /// # Errors
    /// Returns a [`ResolveError`] if the image's debug info cannot be
    /// consulted at all; unknown functions or lines within a readable image
    /// are reported with `??` placeholders instead.
    fn describe(&mut self, image: &Path, addr: CallAddress) -> Result<String, ResolveError>;
}
