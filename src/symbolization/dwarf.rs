//! In-process DWARF source resolver
//!
//! Loads an image's DWARF debug info once via `addr2line` and answers
//! address-to-source queries with the `function at file:line` pretty-print
//! convention (what `addr2line -pCf` produces). Unknown pieces are rendered
//! as `??` placeholders rather than failing the query: only an unreadable
//! image is an error.

use super::AddressResolverService;
use crate::domain::{CallAddress, ResolveError};
use addr2line::Context;
use gimli::{EndianRcSlice, RunTimeEndian};
use object::{Object, ObjectSection};
use rustc_demangle::demangle;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

type DwarfContext = Context<EndianRcSlice<RunTimeEndian>>;

enum ContextState {
    Ready(Box<DwarfContext>),
    Failed(String),
}

/// Resolves addresses to source locations using DWARF debug information.
///
/// Keeps one loaded context per image; loading DWARF is by far the most
/// expensive step, and a trace usually references very few images.
#[derive(Default)]
pub struct DwarfResolver {
    contexts: HashMap<PathBuf, ContextState>,
}

impl DwarfResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AddressResolverService for DwarfResolver {
    fn describe(&mut self, image: &Path, addr: CallAddress) -> Result<String, ResolveError> {
        let state = match self.contexts.entry(image.to_path_buf()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(match load_context(image) {
                Ok(ctx) => ContextState::Ready(Box::new(ctx)),
                Err(detail) => ContextState::Failed(detail),
            }),
        };

        match state {
            ContextState::Ready(ctx) => Ok(describe_with(ctx, addr)),
            ContextState::Failed(detail) => Err(ResolveError::NoDebugInfo {
                image: image.to_path_buf(),
                detail: detail.clone(),
            }),
        }
    }
}

fn load_context(image: &Path) -> Result<DwarfContext, String> {
    let data = fs::read(image).map_err(|e| e.to_string())?;
    let obj = object::File::parse(&*data).map_err(|e| e.to_string())?;

    let endian = if obj.is_little_endian() {
        RunTimeEndian::Little
    } else {
        RunTimeEndian::Big
    };

    let load_section = |id: gimli::SectionId| -> Result<EndianRcSlice<RunTimeEndian>, gimli::Error> {
        let data = obj
            .section_by_name(id.name())
            .and_then(|section| section.uncompressed_data().ok())
            .unwrap_or(std::borrow::Cow::Borrowed(&[][..]));
        Ok(EndianRcSlice::new(Rc::from(&*data), endian))
    };

    let dwarf = gimli::Dwarf::load(&load_section).map_err(|e| e.to_string())?;
    Context::from_dwarf(dwarf).map_err(|e| e.to_string())
}

fn describe_with(ctx: &DwarfContext, addr: CallAddress) -> String {
    let mut function = None;
    let mut location = None;

    if let Ok(mut frames) = ctx.find_frames(addr.0).skip_all_loads() {
        if let Ok(Some(frame)) = frames.next() {
            function = frame
                .function
                .as_ref()
                .and_then(|name| name.raw_name().ok())
                .map(|raw| format!("{:#}", demangle(&raw)));
            location = frame.location.map(|loc| {
                let file = loc.file.unwrap_or("??");
                let line = loc.line.unwrap_or(0);
                format!("{file}:{line}")
            });
        }
    }

    format!(
        "{} at {}",
        function.as_deref().unwrap_or("??"),
        location.as_deref().unwrap_or("??:0")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_image_fails_once_per_image() {
        let mut resolver = DwarfResolver::new();
        let image = Path::new("/nonexistent/image");

        for _ in 0..2 {
            let err = resolver.describe(image, CallAddress(0x4010)).unwrap_err();
            assert!(matches!(err, ResolveError::NoDebugInfo { .. }));
        }
        // The failed load is cached, not retried
        assert_eq!(resolver.contexts.len(), 1);
    }
}
