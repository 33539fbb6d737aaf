//! Configuration file handling.
//!
//! Reads from `~/.config/bwlens/bwlens.toml`

use anyhow::{Context, Result};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Export file to load on startup.
    #[serde(default)]
    pub export_path: Option<PathBuf>,
    /// Whether passwords start hidden.
    #[serde(default = "default_start_masked")]
    pub start_masked: bool,
    /// Placeholder shown instead of a hidden password.
    #[serde(default = "default_mask")]
    pub mask: String,
    /// strftime pattern for the "last updated" column.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Whether to colour rows whose password is reused.
    #[serde(default = "default_highlight_reused")]
    pub highlight_reused: bool,
}

fn default_start_masked() -> bool {
    true
}

fn default_mask() -> String {
    "■■■■■■".to_string()
}

fn default_date_format() -> String {
    "%m/%d/%y (%H:%M:%S)".to_string()
}

fn default_highlight_reused() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_path: None,
            start_masked: default_start_masked(),
            mask: default_mask(),
            date_format: default_date_format(),
            highlight_reused: default_highlight_reused(),
        }
    }
}

impl Config {
    /// Load configuration from the config file.
    ///
    /// If `custom_path` is provided, load from that path.
    /// Otherwise, load from the default XDG config location.
    /// Creates a default config file if it doesn't exist (only for default path).
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self> {
        let is_custom = custom_path.is_some();
        let config_path = match custom_path {
            Some(path) => path,
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            if !is_custom {
                let config = Config::default();
                config.save_to(&config_path)?;
                tracing::info!("Created default config at {}", config_path.display());
                return Ok(config);
            } else {
                anyhow::bail!("Config file not found: {}", config_path.display());
            }
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        tracing::info!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    /// Parse a config document, replacing an unusable date format with the default.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(contents)?;
        if StrftimeItems::new(&config.date_format).any(|item| matches!(item, Item::Error)) {
            tracing::warn!(
                "Invalid date_format {:?}, falling back to default",
                config.date_format
            );
            config.date_format = default_date_format();
        }
        Ok(config)
    }

    fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))
    }

    /// Get the path to the config file.
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("bwlens").join("bwlens.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn partial_file_overrides_fields() {
        let config = Config::from_toml(
            r#"
            export_path = "/tmp/vault.json"
            start_masked = false
            mask = "***"
            "#,
        )
        .unwrap();
        assert_eq!(config.export_path, Some(PathBuf::from("/tmp/vault.json")));
        assert!(!config.start_masked);
        assert_eq!(config.mask, "***");
        assert!(config.highlight_reused);
    }

    #[test]
    fn bad_date_format_falls_back() {
        let config = Config::from_toml(r#"date_format = "%Q nonsense""#).unwrap();
        assert_eq!(config.date_format, default_date_format());
    }

    #[test]
    fn missing_custom_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn loads_custom_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bwlens.toml");
        std::fs::write(&path, "highlight_reused = false\n").unwrap();
        assert!(!Config::load(Some(path)).unwrap().highlight_reused);
    }
}
