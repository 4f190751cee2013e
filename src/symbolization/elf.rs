//! In-process ELF symbol table reader
//!
//! Parses the image with the `object` crate and keeps the symbols a call
//! site can legitimately reference: defined, globally-visible, text-section
//! function symbols (nm's `T` class).

use super::SymbolTableService;
use crate::domain::SymbolError;
use object::{Object, ObjectSymbol, SymbolKind};
use std::fs;
use std::path::Path;

/// Reads symbol tables straight from the ELF file, no external tools.
#[derive(Debug, Default)]
pub struct ElfSymbolTable;

impl SymbolTableService for ElfSymbolTable {
    fn list_defined_function_symbols(
        &self,
        image: &Path,
    ) -> Result<Vec<(String, u64)>, SymbolError> {
        let unavailable = |detail: String| SymbolError::TableUnavailable {
            image: image.to_path_buf(),
            detail,
        };

        let data = fs::read(image).map_err(|e| unavailable(e.to_string()))?;
        let obj = object::File::parse(&*data).map_err(|e| unavailable(e.to_string()))?;

        let mut symbols = Vec::new();
        for sym in obj.symbols() {
            if sym.is_definition() && sym.is_global() && sym.kind() == SymbolKind::Text {
                if let Ok(name) = sym.name() {
                    symbols.push((name.to_string(), sym.address()));
                }
            }
        }
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_image_is_unavailable() {
        let err = ElfSymbolTable
            .list_defined_function_symbols(Path::new("/nonexistent/image"))
            .unwrap_err();
        assert!(matches!(err, SymbolError::TableUnavailable { .. }));
    }

    #[test]
    fn test_non_elf_file_is_unavailable() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"definitely not an ELF image").unwrap();

        let err = ElfSymbolTable
            .list_defined_function_symbols(file.path())
            .unwrap_err();
        assert!(matches!(err, SymbolError::TableUnavailable { .. }));
    }
}
