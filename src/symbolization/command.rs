//! External-tool service implementations
//!
//! `--nm <CMD>` and `--addr2line <CMD>` swap the in-process ELF/DWARF readers
//! for subprocess invocations of nm- and addr2line-compatible tools. Useful
//! for image formats the built-in readers cannot parse, or for matching the
//! output of a specific toolchain exactly.

use super::{AddressResolverService, SymbolTableService};
use crate::domain::{CallAddress, ResolveError, SymbolError};
use std::path::Path;
use std::process::Command;

/// Symbol table service backed by an nm-compatible command.
///
/// Runs `<cmd> <image>` and keeps the `T` (defined global text) lines.
#[derive(Debug)]
pub struct NmCommand {
    program: String,
}

impl NmCommand {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl SymbolTableService for NmCommand {
    fn list_defined_function_symbols(
        &self,
        image: &Path,
    ) -> Result<Vec<(String, u64)>, SymbolError> {
        let unavailable = |detail: String| SymbolError::TableUnavailable {
            image: image.to_path_buf(),
            detail,
        };

        let output = Command::new(&self.program)
            .arg(image)
            .output()
            .map_err(|e| unavailable(format!("failed to run {}: {e}", self.program)))?;
        if !output.status.success() {
            return Err(unavailable(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text.lines().filter_map(parse_nm_line).collect())
    }
}

/// Parse one line of nm output: `<hexaddr> <class> <name>`.
///
/// Only `T` symbols are valid call targets; everything else (undefined,
/// data, local) is dropped.
fn parse_nm_line(line: &str) -> Option<(String, u64)> {
    let mut fields = line.split_whitespace();
    let addr = fields.next()?;
    let class = fields.next()?;
    let name = fields.next()?;
    if class != "T" {
        return None;
    }
    let addr = u64::from_str_radix(addr, 16).ok()?;
    Some((name.to_string(), addr))
}

/// Source resolver backed by an addr2line-compatible command.
///
/// Runs `<cmd> -pCf -e <image> <addr>` and returns the trimmed output.
#[derive(Debug)]
pub struct Addr2LineCommand {
    program: String,
}

impl Addr2LineCommand {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl AddressResolverService for Addr2LineCommand {
    fn describe(&mut self, image: &Path, addr: CallAddress) -> Result<String, ResolveError> {
        let failed = |detail: String| ResolveError::CommandFailed {
            image: image.to_path_buf(),
            detail,
        };

        let output = Command::new(&self.program)
            .args(["-pCf", "-e"])
            .arg(image)
            .arg(addr.to_string())
            .output()
            .map_err(|e| failed(format!("failed to run {}: {e}", self.program)))?;
        if !output.status.success() {
            return Err(failed(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(failed("empty resolver output".to_string()));
        }
        Ok(text)
    }
}
