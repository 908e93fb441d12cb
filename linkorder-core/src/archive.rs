//! Symbol extraction from `ar` archives.
//!
//! Every member is parsed as an object file. Members that are not objects
//! (symbol indexes, name tables, stray data) are skipped so one odd member
//! does not hide the symbols of the rest of the archive.

use std::fs::File;
use std::io::Read;

use object::{Object, ObjectSymbol};

use crate::domain::{ArchiveSymbols, DefinedSymbol, LibInfo, SymbolDefinition, UndefinedSymbol};
use crate::error::{ScanError, ScanResult};

/// Source of per-library symbol information.
pub trait SymbolReader {
    fn read_symbols(&self, lib: &LibInfo) -> ScanResult<ArchiveSymbols>;
}

/// Reads symbols from archives on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveReader;

impl ArchiveReader {
    pub fn new() -> Self {
        Self
    }
}

impl SymbolReader for ArchiveReader {
    fn read_symbols(&self, lib: &LibInfo) -> ScanResult<ArchiveSymbols> {
        let archive_file = File::open(&lib.path).map_err(|source| ScanError::Open {
            path: lib.path.clone(),
            source,
        })?;
        let mut archive = ar::Archive::new(archive_file);
        let mut symbols = ArchiveSymbols::default();

        while let Some(entry) = archive.next_entry() {
            let mut entry = entry.map_err(|e| ScanError::MalformedArchive {
                path: lib.path.clone(),
                reason: e.to_string(),
            })?;
            let member = String::from_utf8_lossy(entry.header().identifier()).into_owned();

            let mut buf: Vec<u8> = vec![];
            if let Err(e) = entry.read_to_end(&mut buf) {
                return Err(ScanError::MalformedArchive {
                    path: lib.path.clone(),
                    reason: format!("reading member {member}: {e}"),
                });
            }

            match object::File::parse(&*buf) {
                Ok(file) => {
                    collect_symbols(&file, &mut symbols);
                }
                Err(e) => {
                    log::debug!("{}: skipping member {} ({})", lib.name, member, e);
                }
            }
        }

        log::debug!(
            "{}: {} definitions, {} references",
            lib.name,
            symbols.defined.len(),
            symbols.undefined.len()
        );
        Ok(symbols)
    }
}

fn collect_symbols(file: &object::File<'_>, symbols: &mut ArchiveSymbols) {
    for symbol in file.symbols() {
        let Ok(name) = symbol.name_bytes() else {
            continue;
        };
        if name.is_empty() {
            continue;
        }

        if symbol.is_undefined() {
            symbols.undefined.push(UndefinedSymbol::new(name));
        } else if symbol.is_definition() && !symbol.is_local() {
            symbols.defined.push(SymbolDefinition {
                symbol: DefinedSymbol::new(name),
                weak: symbol.is_weak(),
            });
        }
    }
}
