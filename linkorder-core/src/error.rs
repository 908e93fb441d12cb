use std::path::PathBuf;

use thiserror::Error;

use crate::domain::DefinedSymbol;

#[derive(Error, Debug)]
pub enum LinkOrderError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Dependency error: {0}")]
    DepFind(#[from] DepFindError),

    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Search root not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Cannot open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed archive {path}: {reason}")]
    MalformedArchive { path: PathBuf, reason: String },
}

#[derive(Error, Debug)]
pub enum DepFindError {
    #[error(
        "Cannot determine dependency order, the dependency graph contains a cycle through {library}"
    )]
    CyclicDependency { library: String },

    #[error("{dependency_a} and {dependency_b} define the same symbol {symbol}")]
    MultipleDefines {
        dependency_a: String,
        dependency_b: String,
        symbol: DefinedSymbol,
    },
}

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Not a static library: {name}")]
    NotStaticLib { name: String },

    #[error("Library {name} has no parent directory")]
    NoParentDirectory { name: String },

    #[error("Path is not valid UTF-8: {path}")]
    NonUtf8Path { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, LinkOrderError>;
pub type ScanResult<T> = std::result::Result<T, ScanError>;
pub type DepFindResult<T> = std::result::Result<T, DepFindError>;
pub type LinkResult<T> = std::result::Result<T, LinkError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
