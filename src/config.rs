//! Configuration module for the glob-import preprocessor.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `SASS_GLOB_` and use double
//! underscores to separate nested levels:
//! - `SASS_GLOB_AUTO_INVALIDATION=true` sets `auto_invalidation`
//! - `SASS_GLOB_FILE_WATCH__DEBOUNCE_MS=200` sets `file_watch.debounce_ms`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{GlobImportError, GlobImportResult};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Project root directory, as supplied by the host's configuration
    /// resolution hook. Glob registry keys and `ignore_paths` candidates are
    /// normalized against it; when absent, exclusion matching falls back to
    /// search-base-relative paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,

    /// Glob-style exclusion patterns. Resolved files matching any of these
    /// are dropped from the expansion.
    #[serde(default)]
    pub ignore_paths: Vec<String>,

    /// Reload files whose glob imports are affected by a filesystem change.
    /// Requires the host to have an active file watcher; silently disabled
    /// with a warning otherwise.
    #[serde(default = "default_false")]
    pub auto_invalidation: bool,

    /// File watching settings
    #[serde(default)]
    pub file_watch: FileWatchConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FileWatchConfig {
    /// Enable the notify-backed event feed for standalone sessions
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Debounce interval in milliseconds (default: 500ms)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_root: None,
            ignore_paths: Vec::new(),
            auto_invalidation: false,
            file_watch: FileWatchConfig::default(),
        }
    }
}

impl Default for FileWatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Settings {
    /// Load settings from `sass-glob.toml` (if present) with environment
    /// variable overrides layered on top of the defaults.
    pub fn load() -> GlobImportResult<Self> {
        Self::load_from(PathBuf::from("sass-glob.toml"))
    }

    /// Load settings from a specific TOML file path.
    pub fn load_from(config_path: PathBuf) -> GlobImportResult<Self> {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("SASS_GLOB_").split("__"))
            .extract()
            .map_err(|e| GlobImportError::Config {
                reason: e.to_string(),
            })
    }
}

// Default value functions
fn default_false() -> bool {
    false
}
fn default_true() -> bool {
    true
}
fn default_debounce_ms() -> u64 {
    500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_conservative() {
        let settings = Settings::default();
        assert!(settings.project_root.is_none());
        assert!(settings.ignore_paths.is_empty());
        assert!(!settings.auto_invalidation);
        assert!(settings.file_watch.enabled);
        assert_eq!(settings.file_watch.debounce_ms, 500);
    }

    #[test]
    fn loads_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sass-glob.toml");
        std::fs::write(
            &path,
            r#"
ignore_paths = ["blocks/_default/block.scss"]
auto_invalidation = true

[file_watch]
debounce_ms = 50
"#,
        )
        .unwrap();

        let settings = Settings::load_from(path).unwrap();
        assert_eq!(settings.ignore_paths, vec!["blocks/_default/block.scss"]);
        assert!(settings.auto_invalidation);
        assert_eq!(settings.file_watch.debounce_ms, 50);
    }
}
