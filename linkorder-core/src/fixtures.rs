//! Builders for small static archives, used by tests and the usage example.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use object::write::{Object, StandardSection, Symbol, SymbolSection};
use object::{Architecture, BinaryFormat, Endianness, SymbolFlags, SymbolKind, SymbolScope};

/// Describes `lib<name>.a` holding one ELF object plus optional raw members.
#[derive(Debug, Clone, Default)]
pub struct StaticLibFixture {
    name: String,
    defines: Vec<String>,
    weak_defines: Vec<String>,
    local_defines: Vec<String>,
    references: Vec<String>,
    raw_members: Vec<(String, Vec<u8>)>,
}

impl StaticLibFixture {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn defines(mut self, symbols: &[&str]) -> Self {
        self.defines.extend(symbols.iter().map(|s| s.to_string()));
        self
    }

    pub fn weak_defines(mut self, symbols: &[&str]) -> Self {
        self.weak_defines.extend(symbols.iter().map(|s| s.to_string()));
        self
    }

    pub fn local_defines(mut self, symbols: &[&str]) -> Self {
        self.local_defines.extend(symbols.iter().map(|s| s.to_string()));
        self
    }

    pub fn references(mut self, symbols: &[&str]) -> Self {
        self.references.extend(symbols.iter().map(|s| s.to_string()));
        self
    }

    pub fn raw_member(mut self, identifier: &str, data: &[u8]) -> Self {
        self.raw_members.push((identifier.to_string(), data.to_vec()));
        self
    }

    pub fn file_name(&self) -> String {
        format!("lib{}.a", self.name)
    }

    /// Write the archive into `dir`, creating it if needed.
    pub fn write_in(&self, dir: &Path) -> io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        let object = self.object_bytes()?;

        let mut builder = ar::Builder::new(File::create(&path)?);
        let member = format!("{}.o", self.name);
        builder.append(
            &ar::Header::new(member.into_bytes(), object.len() as u64),
            object.as_slice(),
        )?;
        for (identifier, data) in &self.raw_members {
            builder.append(
                &ar::Header::new(identifier.clone().into_bytes(), data.len() as u64),
                data.as_slice(),
            )?;
        }
        Ok(path)
    }

    fn object_bytes(&self) -> io::Result<Vec<u8>> {
        let mut obj = Object::new(BinaryFormat::Elf, Architecture::X86_64, Endianness::Little);
        let text = obj.section_id(StandardSection::Text);

        let defined = self
            .defines
            .iter()
            .map(|s| (s, SymbolScope::Linkage, false))
            .chain(self.weak_defines.iter().map(|s| (s, SymbolScope::Linkage, true)))
            .chain(self.local_defines.iter().map(|s| (s, SymbolScope::Compilation, false)));
        for (name, scope, weak) in defined {
            // ret
            let offset = obj.append_section_data(text, &[0xc3], 1);
            obj.add_symbol(Symbol {
                name: name.as_bytes().to_vec(),
                value: offset,
                size: 1,
                kind: SymbolKind::Text,
                scope,
                weak,
                section: SymbolSection::Section(text),
                flags: SymbolFlags::None,
            });
        }

        for name in &self.references {
            obj.add_symbol(Symbol {
                name: name.as_bytes().to_vec(),
                value: 0,
                size: 0,
                kind: SymbolKind::Text,
                scope: SymbolScope::Linkage,
                weak: false,
                section: SymbolSection::Undefined,
                flags: SymbolFlags::None,
            });
        }

        obj.write().map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
    }
}
