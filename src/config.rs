//! Runtime configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `CARDIORISK_MODEL_DIR` | `models` |
//! | `CARDIORISK_LOG_MODE` | `auto` (`file` when stdout is a TTY, else `stdout`) |
//! | `CARDIORISK_LOG_FILE` | `cardiorisk.log` |
//! | `CARDIORISK_REQUIRE_MANIFEST` | `false` |
//!
//! Log verbosity is controlled separately through `RUST_LOG`.

use std::path::PathBuf;

pub const MODEL_DIR_ENV: &str = "CARDIORISK_MODEL_DIR";
pub const LOG_MODE_ENV: &str = "CARDIORISK_LOG_MODE";
pub const LOG_FILE_ENV: &str = "CARDIORISK_LOG_FILE";
pub const REQUIRE_MANIFEST_ENV: &str = "CARDIORISK_REQUIRE_MANIFEST";

const DEFAULT_MODEL_DIR: &str = "models";
const DEFAULT_LOG_FILE: &str = "cardiorisk.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when interactive, stdout otherwise
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Whether to log to a file. Terminal output would corrupt the TUI.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "yes" | "YES")
}

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub model_dir: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    pub require_manifest: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            require_manifest: false,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            model_dir: lookup(MODEL_DIR_ENV)
                .filter(|v| !v.trim().is_empty())
                .map_or(defaults.model_dir, PathBuf::from),
            log_mode: lookup(LOG_MODE_ENV).map_or(defaults.log_mode, |v| LogMode::parse(&v)),
            log_file: lookup(LOG_FILE_ENV)
                .filter(|v| !v.trim().is_empty())
                .map_or(defaults.log_file, PathBuf::from),
            require_manifest: lookup(REQUIRE_MANIFEST_ENV)
                .map_or(defaults.require_manifest, |v| parse_bool(&v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.model_dir, PathBuf::from("models"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (MODEL_DIR_ENV, "/srv/model"),
            (LOG_MODE_ENV, "STDOUT"),
            (LOG_FILE_ENV, "/tmp/c.log"),
            (REQUIRE_MANIFEST_ENV, "yes"),
        ]));
        assert_eq!(config.model_dir, PathBuf::from("/srv/model"));
        assert_eq!(config.log_mode, LogMode::Stdout);
        assert_eq!(config.log_file, PathBuf::from("/tmp/c.log"));
        assert!(config.require_manifest);
    }

    #[test]
    fn test_log_mode_selection() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
        assert_eq!(LogMode::parse("garbage"), LogMode::Auto);
    }
}
