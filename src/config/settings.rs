//! Settings loading from purse.toml
//!
//! Every key is optional. A missing file yields the defaults; a file that exists but
//! cannot be parsed is a configuration error.

use crate::core::transfer::DEFAULT_EXPORT_FILE_NAME;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Settings file looked up when none is given on the command line.
pub const DEFAULT_SETTINGS_FILE: &str = "purse.toml";

/// Structure of the whole settings file
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Store location
    pub store: StoreSettings,
    /// Export and import
    pub transfer: TransferSettings,
    /// How amounts are shown
    pub display: DisplaySettings,
}

/// `[store]` table
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StoreSettings {
    /// `SeaORM` connection URL; `DATABASE_URL` overrides it
    pub database_url: Option<String>,
}

/// `[transfer]` table
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TransferSettings {
    /// File written by `export` when no output is given
    pub export_file_name: String,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

/// `[display]` table
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DisplaySettings {
    /// Appended to every amount; empty for none
    pub currency_suffix: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_suffix: "₽".to_string(),
        }
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!("No settings file at {:?}, using defaults", path);
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read settings file {}: {e}", path.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_settings() {
        let toml_str = r#"
            [store]
            database_url = "sqlite://ledger.sqlite?mode=rwc"

            [transfer]
            export_file_name = "backup.json"

            [display]
            currency_suffix = "EUR"
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(
            settings.store.database_url.as_deref(),
            Some("sqlite://ledger.sqlite?mode=rwc")
        );
        assert_eq!(settings.transfer.export_file_name, "backup.json");
        assert_eq!(settings.display.currency_suffix, "EUR");
    }

    #[test]
    fn test_partial_settings_fall_back_to_defaults() {
        let settings: Settings = toml::from_str("[display]\ncurrency_suffix = \"\"\n").unwrap();
        assert_eq!(settings.store.database_url, None);
        assert_eq!(settings.transfer.export_file_name, "data.json");
        assert_eq!(settings.display.currency_suffix, "");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.display.currency_suffix, "₽");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("purse.toml");
        std::fs::write(&path, "[store\ndatabase_url = 3").unwrap();

        assert!(matches!(load_settings(&path), Err(Error::Config { .. })));
    }
}
