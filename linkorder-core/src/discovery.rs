use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

use crate::archive::SymbolReader;
use crate::config::LinkOrderConfig;
use crate::domain::{LibInfo, LibrarySet};
use crate::error::{Result, ScanError};
use crate::symbols::generate_lookup_tables;

static LIB_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^lib(.+)\.a$").expect("static lib regex failed to compile"));

/// `libfoo.a` -> `foo`.
pub fn static_lib_name(file_name: &str) -> Option<String> {
    let cap = LIB_REGEX.captures(file_name)?;
    Some(String::from(&cap[1]))
}

pub fn is_static_lib(file_name: &OsStr) -> bool {
    let Some(file_name) = file_name.to_str() else {
        return false;
    };
    LIB_REGEX.is_match(file_name)
}

/// Walk `base_path` for static libraries and build their symbol tables.
pub fn find_libs<R: SymbolReader + ?Sized>(
    base_path: &Path,
    config: &LinkOrderConfig,
    reader: &R,
) -> Result<LibrarySet> {
    if !base_path.is_dir() {
        return Err(ScanError::RootNotFound {
            path: base_path.to_path_buf(),
        }
        .into());
    }

    let mut walker = WalkDir::new(base_path)
        .follow_links(config.follow_links)
        .sort_by_file_name();
    if let Some(depth) = config.max_depth {
        walker = walker.max_depth(depth);
    }

    let mut libs: BTreeSet<LibInfo> = BTreeSet::new();
    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() || !is_static_lib(entry.file_name()) {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        let Some(link_name) = static_lib_name(name) else {
            continue;
        };
        if config.is_excluded(name, &link_name) {
            log::debug!("Excluding {}", entry.path().display());
            continue;
        }

        let lib = LibInfo::new(name, entry.path());
        if let Some(existing) = libs.get(&lib) {
            log::warn!(
                "Ignoring {} because {} has the same name",
                entry.path().display(),
                existing.path.display()
            );
            continue;
        }
        libs.insert(lib);
    }

    log::info!(
        "Found {} static libraries under {}",
        libs.len(),
        base_path.display()
    );

    let symbols = generate_lookup_tables(libs.iter().cloned(), reader, config.strict)?;
    Ok(LibrarySet { libs, symbols })
}
