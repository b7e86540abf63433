use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::paths::{config_json_path, config_toml_path};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_USER_ID: &str = "user";
pub const DEFAULT_ORIGIN: &str = "web";
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base URL of the automation backend.
    pub api_base: String,
    /// `usuario_id` sent with every chat turn.
    pub user_id: String,
    /// `origem` sent with every chat turn.
    pub origin: String,
    /// Number of history rows requested from `/historico`.
    pub history_limit: usize,
    pub http_proxy: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            http_proxy: None,
        }
    }
}

impl ConsoleConfig {
    /// Loads `~/.x9x-console/config.json`, else `./config.toml`, then applies
    /// environment overrides.
    pub fn load() -> Self {
        let mut config = Self::load_from(&config_json_path(), &config_toml_path());
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Reads the first config file that exists and parses. Unreadable or
    /// malformed files are logged and skipped.
    pub fn load_from(json_path: &Path, toml_path: &Path) -> Self {
        if json_path.exists() {
            match std::fs::read_to_string(json_path) {
                Ok(content) => match serde_json::from_str::<ConsoleConfig>(&content) {
                    Ok(config) => return config,
                    Err(err) => log::warn!("Failed to parse {}: {}", json_path.display(), err),
                },
                Err(err) => log::warn!("Failed to read {}: {}", json_path.display(), err),
            }
        }

        if toml_path.exists() {
            match std::fs::read_to_string(toml_path) {
                Ok(content) => match toml::from_str::<ConsoleConfig>(&content) {
                    Ok(config) => return config,
                    Err(err) => log::warn!("Failed to parse {}: {}", toml_path.display(), err),
                },
                Err(err) => log::warn!("Failed to read {}: {}", toml_path.display(), err),
            }
        }

        log::debug!("No console config file found, using defaults");
        Self::default()
    }

    /// Applies `CONSOLE_*` and `HTTP_PROXY` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_base) = lookup("CONSOLE_API_BASE") {
            self.api_base = api_base;
        }
        if let Some(user_id) = lookup("CONSOLE_USER_ID") {
            self.user_id = user_id;
        }
        if let Some(origin) = lookup("CONSOLE_ORIGIN") {
            self.origin = origin;
        }
        if let Some(limit) = lookup("CONSOLE_HISTORY_LIMIT") {
            match limit.trim().parse::<usize>() {
                Ok(limit) => self.history_limit = limit,
                Err(_) => log::warn!("Ignoring invalid CONSOLE_HISTORY_LIMIT: {limit:?}"),
            }
        }
        if let Some(proxy) = lookup("HTTP_PROXY") {
            if !proxy.trim().is_empty() {
                self.http_proxy = Some(proxy);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.api_base, "http://localhost:8000");
        assert_eq!(config.user_id, "user");
        assert_eq!(config.origin, "web");
        assert_eq!(config.history_limit, 50);
        assert!(config.http_proxy.is_none());
    }

    #[test]
    fn test_json_takes_precedence_over_toml() {
        let dir = tempdir().unwrap();
        let json_path = dir.path().join("config.json");
        let toml_path = dir.path().join("config.toml");
        std::fs::write(&json_path, r#"{"api_base": "http://json:1"}"#).unwrap();
        std::fs::write(&toml_path, "api_base = \"http://toml:2\"\n").unwrap();

        let config = ConsoleConfig::load_from(&json_path, &toml_path);
        assert_eq!(config.api_base, "http://json:1");
        assert_eq!(config.user_id, "user");
    }

    #[test]
    fn test_malformed_json_falls_back_to_toml() {
        let dir = tempdir().unwrap();
        let json_path = dir.path().join("config.json");
        let toml_path = dir.path().join("config.toml");
        std::fs::write(&json_path, "{not json").unwrap();
        std::fs::write(&toml_path, "history_limit = 10\norigin = \"cli\"\n").unwrap();

        let config = ConsoleConfig::load_from(&json_path, &toml_path);
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.origin, "cli");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let dir = tempdir().unwrap();
        let config = ConsoleConfig::load_from(
            &dir.path().join("missing.json"),
            &dir.path().join("missing.toml"),
        );
        assert_eq!(config, ConsoleConfig::default());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CONSOLE_API_BASE", "http://backend:9000"),
            ("CONSOLE_USER_ID", "operator-7"),
            ("CONSOLE_HISTORY_LIMIT", "not-a-number"),
            ("HTTP_PROXY", "http://proxy:3128"),
        ]);

        let mut config = ConsoleConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_base, "http://backend:9000");
        assert_eq!(config.user_id, "operator-7");
        assert_eq!(config.origin, "web");
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.http_proxy.as_deref(), Some("http://proxy:3128"));
    }
}
