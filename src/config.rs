//! Application settings shared by the CLI and the API server.
//!
//! Settings come from a JSON file. Lookup order is the explicit path, then
//! `kola.json` in the working directory, then built-in defaults.

use crate::demo::DEMO_USER_ID;
use crate::records::FinancialProfile;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_FILE: &str = "kola.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// User whose records are read from a store dump
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Profile used when a snapshot carries none
    #[serde(default)]
    pub profile: FinancialProfile,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Snapshot the server loads at startup; the demo wallet when absent
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

fn default_user_id() -> String {
    DEMO_USER_ID.to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            user_id: default_user_id(),
            profile: FinancialProfile::default(),
            bind_address: default_bind_address(),
            snapshot_path: None,
        }
    }
}

/// Loads settings from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading config file: {}", path.display()))?;
    let config: AppConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing config JSON in {}", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Explicit path first, then `kola.json`, then defaults.
///
/// An explicit path that fails to load is an error; a missing default file
/// is not.
pub fn load_config_with_fallback(path: Option<&PathBuf>) -> Result<AppConfig> {
    if let Some(config_path) = path {
        return load_config(config_path);
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        return load_config(default_path);
    }

    warn!("no {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
    Ok(AppConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let path = std::env::temp_dir().join(format!("{}-kola.json", uuid::Uuid::new_v4()));
        fs::write(&path, r#"{"userId": "alice", "profile": {"creditScore": 640, "monthlyIncome": 3000, "monthlySavingsCurrent": 0, "monthlyExpenses": 2000}}"#).unwrap();

        let config = load_config(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.user_id, "alice");
        assert_eq!(config.profile.credit_score, 640);
        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert!(config.snapshot_path.is_none());
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let missing = PathBuf::from("/nonexistent/kola/config.json");
        let err = load_config_with_fallback(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("Reading config file"));
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.user_id, "demo-user");
        assert_eq!(config.profile, FinancialProfile::default());
    }
}
