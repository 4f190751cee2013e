//! Per-image symbol table cache
//!
//! Re-reading a symbol table for every event would be prohibitively slow for
//! large traces, so the first reference to an image triggers exactly one bulk
//! listing and the full name→address map is kept for the rest of the run.
//! A failed listing is cached as well: the service is never invoked twice for
//! the same image, successful or not.

use super::SymbolTableService;
use crate::domain::SymbolError;
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

enum TableState {
    Loaded(HashMap<String, u64>),
    Failed(String),
}

/// Caches one symbol table per binary image for the lifetime of a run.
pub struct SymbolTableCache {
    service: Box<dyn SymbolTableService>,
    tables: HashMap<PathBuf, TableState>,
}

impl SymbolTableCache {
    #[must_use]
    pub fn new(service: Box<dyn SymbolTableService>) -> Self {
        Self {
            service,
            tables: HashMap::new(),
        }
    }

    /// Resolve `symbol` within `image` to its absolute address.
    ///
    /// # Errors
    /// [`SymbolError::NotFound`] if the symbol is absent from the image's
    /// table, [`SymbolError::TableUnavailable`] if the table could not be
    /// read (the failure is remembered and repeated per lookup).
    pub fn resolve(&mut self, image: &str, symbol: &str) -> Result<u64, SymbolError> {
        let path = Path::new(image);
        let state = match self.tables.entry(path.to_path_buf()) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                let state = match self.service.list_defined_function_symbols(path) {
                    Ok(symbols) => {
                        debug!("loaded {} symbols from {image}", symbols.len());
                        TableState::Loaded(symbols.into_iter().collect())
                    }
                    Err(err) => TableState::Failed(err.to_string()),
                };
                entry.insert(state)
            }
        };

        match state {
            TableState::Loaded(table) => {
                table.get(symbol).copied().ok_or_else(|| SymbolError::NotFound {
                    image: path.to_path_buf(),
                    symbol: symbol.to_string(),
                })
            }
            TableState::Failed(detail) => Err(SymbolError::TableUnavailable {
                image: path.to_path_buf(),
                detail: detail.clone(),
            }),
        }
    }
}
