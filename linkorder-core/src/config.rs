use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

pub const ENV_MAX_DEPTH: &str = "LINKORDER_MAX_DEPTH";
pub const ENV_FOLLOW_LINKS: &str = "LINKORDER_FOLLOW_LINKS";
pub const ENV_EXCLUDE: &str = "LINKORDER_EXCLUDE";
pub const ENV_STRICT: &str = "LINKORDER_STRICT";
pub const ENV_RERUN_IF_CHANGED: &str = "LINKORDER_RERUN_IF_CHANGED";

/// Every variable `apply_env` consults.
pub const ENV_VARS: [&str; 5] = [
    ENV_MAX_DEPTH,
    ENV_FOLLOW_LINKS,
    ENV_EXCLUDE,
    ENV_STRICT,
    ENV_RERUN_IF_CHANGED,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkOrderConfig {
    pub search_root: PathBuf,
    /// Maximum directory depth below the root, unlimited when `None`.
    pub max_depth: Option<usize>,
    pub follow_links: bool,
    /// Library names to ignore, either `foo` or `libfoo.a`.
    pub exclude: Vec<String>,
    /// Fail on unreadable archives instead of treating them as empty.
    pub strict: bool,
    pub emit_rerun_if_changed: bool,
}

impl Default for LinkOrderConfig {
    fn default() -> Self {
        Self {
            search_root: PathBuf::from("."),
            max_depth: None,
            follow_links: false,
            exclude: Vec::new(),
            strict: false,
            emit_rerun_if_changed: true,
        }
    }
}

impl LinkOrderConfig {
    pub fn new(search_root: impl Into<PathBuf>) -> Self {
        Self {
            search_root: search_root.into(),
            ..Self::default()
        }
    }

    pub fn from_json_file(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `LINKORDER_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> ConfigResult<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    pub fn apply_env_with<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MAX_DEPTH) {
            let depth = value.trim().parse::<usize>().map_err(|_| invalid(ENV_MAX_DEPTH, &value))?;
            self.max_depth = Some(depth);
        }
        if let Some(value) = lookup(ENV_FOLLOW_LINKS) {
            self.follow_links = parse_bool(ENV_FOLLOW_LINKS, &value)?;
        }
        if let Some(value) = lookup(ENV_EXCLUDE) {
            self.exclude.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string),
            );
        }
        if let Some(value) = lookup(ENV_STRICT) {
            self.strict = parse_bool(ENV_STRICT, &value)?;
        }
        if let Some(value) = lookup(ENV_RERUN_IF_CHANGED) {
            self.emit_rerun_if_changed = parse_bool(ENV_RERUN_IF_CHANGED, &value)?;
        }
        Ok(())
    }

    /// Whether `file_name` (`libfoo.a`) is excluded by name or by link name.
    pub fn is_excluded(&self, file_name: &str, link_name: &str) -> bool {
        self.exclude
            .iter()
            .any(|entry| entry == file_name || entry == link_name)
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}
