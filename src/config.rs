//! Configuration loading
//!
//! Defaults, then `~/.subsleuth/config.json`, then environment variables.

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::services::currency::Currency;
use crate::services::gemini::DEFAULT_MODEL;
use crate::types::{Result, SubsleuthError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Root for store, session and account files
    pub data_dir: PathBuf,
    /// ISO code of the display currency
    pub currency: String,
    pub model: String,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
    /// Never written back to disk
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            currency: "USD".to_string(),
            model: DEFAULT_MODEL.to_string(),
            log_level: "warn".to_string(),
            api_key: None,
        }
    }
}

impl Config {
    /// Load from `path` and the process environment
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// `~/.subsleuth/config.json`
    pub fn default_path() -> Result<PathBuf> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| SubsleuthError::Config("Cannot determine home directory".into()))?;
        Ok(base_dirs.home_dir().join(".subsleuth").join("config.json"))
    }

    /// Missing file yields defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| SubsleuthError::Config(format!("Invalid config {}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| SubsleuthError::Config(format!("Serialization failed: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment overrides; `lookup` is `std::env::var` outside tests
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("SUBSLEUTH_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(currency) = lookup("SUBSLEUTH_CURRENCY") {
            self.currency = currency;
        }
        if let Some(model) = lookup("SUBSLEUTH_MODEL") {
            self.model = model;
        }
        if let Some(level) = lookup("SUBSLEUTH_LOG") {
            self.log_level = level;
        }
        if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")) {
            self.api_key = Some(key);
        }
    }

    /// Configured currency, USD when the code is unknown
    pub fn currency(&self) -> Currency {
        Currency::find_or_default(&self.currency)
    }
}

fn default_data_dir() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.home_dir().join(".subsleuth"))
        .unwrap_or_else(|| PathBuf::from(".subsleuth"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::from_file(&tmp.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.currency().code, "USD");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"currency": "EUR"}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, "currency = EUR").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(SubsleuthError::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(env_of(&[
            ("SUBSLEUTH_DATA_DIR", "/tmp/subs"),
            ("SUBSLEUTH_CURRENCY", "GBP"),
            ("SUBSLEUTH_LOG", "debug"),
            ("API_KEY", "fallback-key"),
        ]));

        assert_eq!(config.data_dir, PathBuf::from("/tmp/subs"));
        assert_eq!(config.currency().symbol, "£");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.api_key.as_deref(), Some("fallback-key"));
    }

    #[test]
    fn test_gemini_key_preferred_over_api_key() {
        let mut config = Config::default();
        config.apply_env(env_of(&[("API_KEY", "a"), ("GEMINI_API_KEY", "g")]));
        assert_eq!(config.api_key.as_deref(), Some("g"));
    }

    #[test]
    fn test_save_round_trip_omits_api_key() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.json");
        let config = Config {
            currency: "JPY".into(),
            api_key: Some("secret".into()),
            ..Config::default()
        };

        config.save(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("secret"));
        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.currency, "JPY");
        assert!(loaded.api_key.is_none());
    }
}
