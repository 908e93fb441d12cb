use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::discovery::static_lib_name;

fn lossy_name(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap_or_else(|_| String::from("Not utf8"))
}

/// A symbol some object in an archive provides.
#[derive(Clone, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct DefinedSymbol {
    symbol: Vec<u8>,
}

impl DefinedSymbol {
    pub fn new(symbol: impl Into<Vec<u8>>) -> Self {
        Self { symbol: symbol.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.symbol
    }
}

impl From<UndefinedSymbol> for DefinedSymbol {
    fn from(value: UndefinedSymbol) -> Self {
        Self { symbol: value.symbol }
    }
}

impl From<&UndefinedSymbol> for DefinedSymbol {
    fn from(value: &UndefinedSymbol) -> Self {
        Self {
            symbol: value.symbol.clone(),
        }
    }
}

impl Debug for DefinedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinedSymbol")
            .field("symbol", &lossy_name(&self.symbol))
            .finish()
    }
}

impl Display for DefinedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", lossy_name(&self.symbol))
    }
}

/// A symbol some object in an archive needs from elsewhere.
#[derive(Clone, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct UndefinedSymbol {
    symbol: Vec<u8>,
}

impl UndefinedSymbol {
    pub fn new(symbol: impl Into<Vec<u8>>) -> Self {
        Self { symbol: symbol.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.symbol
    }
}

impl From<DefinedSymbol> for UndefinedSymbol {
    fn from(value: DefinedSymbol) -> Self {
        Self { symbol: value.symbol }
    }
}

impl From<&DefinedSymbol> for UndefinedSymbol {
    fn from(value: &DefinedSymbol) -> Self {
        Self {
            symbol: value.symbol.clone(),
        }
    }
}

impl Debug for UndefinedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndefinedSymbol")
            .field("symbol", &lossy_name(&self.symbol))
            .finish()
    }
}

impl Display for UndefinedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", lossy_name(&self.symbol))
    }
}

/// A static archive found on disk. Identity is the file name only, so two
/// copies of `libfoo.a` in different directories are the same library.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LibInfo {
    pub name: String,
    pub path: PathBuf,
}

impl LibInfo {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Name as passed to `rustc-link-lib`, `foo` for `libfoo.a`.
    pub fn link_name(&self) -> Option<String> {
        static_lib_name(&self.name)
    }

    pub fn search_dir(&self) -> Option<&Path> {
        self.path.parent()
    }
}

impl Hash for LibInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialEq for LibInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq(&other.name)
    }
}

impl Eq for LibInfo {}

impl PartialOrd for LibInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LibInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl Display for LibInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolDefinition {
    pub symbol: DefinedSymbol,
    pub weak: bool,
}

/// Everything one archive defines and references.
#[derive(Clone, Debug, Default)]
pub struct ArchiveSymbols {
    pub defined: Vec<SymbolDefinition>,
    pub undefined: Vec<UndefinedSymbol>,
}

#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    pub defined: HashMap<DefinedSymbol, LibInfo>,
    pub undefined: Vec<(UndefinedSymbol, LibInfo)>,
}

impl SymbolTable {
    pub fn defining_lib(&self, symbol: &UndefinedSymbol) -> Option<&LibInfo> {
        self.defined.get(&DefinedSymbol::from(symbol))
    }

    pub fn defined_count(&self, lib: &LibInfo) -> usize {
        self.defined.values().filter(|owner| *owner == lib).count()
    }

    pub fn undefined_count(&self, lib: &LibInfo) -> usize {
        self.undefined.iter().filter(|(_, owner)| owner == lib).count()
    }
}

/// The libraries under a search root together with their symbol tables.
#[derive(Clone, Debug, Default)]
pub struct LibrarySet {
    pub libs: BTreeSet<LibInfo>,
    pub symbols: SymbolTable,
}

impl LibrarySet {
    pub fn is_empty(&self) -> bool {
        self.libs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.libs.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub dependent: String,
    pub dependency: String,
    /// Symbols the dependent pulls from the dependency, sorted.
    pub symbols: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LinkPlan {
    /// Libraries in link order: every library precedes the ones it needs.
    pub libraries: Vec<LibInfo>,
    pub edges: Vec<DependencyEdge>,
}

impl LinkPlan {
    pub fn position(&self, name: &str) -> Option<usize> {
        self.libraries.iter().position(|lib| lib.name == name)
    }
}
