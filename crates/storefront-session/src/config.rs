//! # Session Configuration
//!
//! Where the identity service lives and where session facts are kept.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_IDENTITY_URL=https://identity.example.com               │
//! │     STOREFRONT_REQUEST_TIMEOUT_SECS=15                                 │
//! │     STOREFRONT_SESSION_DB=/var/lib/storefront/session.db               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront-session/session.toml (Linux)                  │
//! │     ~/Library/Application Support/com.storefront.session/ (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:5000, 30s request timeout                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # session.toml
//! [identity]
//! base_url = "http://localhost:5000"
//! request_timeout_secs = 30
//! connect_timeout_secs = 10
//!
//! [storage]
//! path = "/var/lib/storefront/session.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{SessionError, SessionResult};

/// Overrides the identity service base URL.
pub const ENV_IDENTITY_URL: &str = "STOREFRONT_IDENTITY_URL";
/// Overrides the per-request timeout, in seconds.
pub const ENV_REQUEST_TIMEOUT: &str = "STOREFRONT_REQUEST_TIMEOUT_SECS";
/// Overrides the session database path.
pub const ENV_SESSION_DB: &str = "STOREFRONT_SESSION_DB";

// =============================================================================
// Identity Settings
// =============================================================================

/// Identity service connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySettings {
    /// Base URL; `/auth/login` and `/auth/signup` are joined onto it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// TCP connect timeout (seconds).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for IdentitySettings {
    fn default() -> Self {
        IdentitySettings {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl IdentitySettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Persisted store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file holding the session facts. Defaults to `session.db` in
    /// the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Main Session Configuration
// =============================================================================

/// Complete session configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub identity: IdentitySettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl SessionConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (session.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading session config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load session config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SessionResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SessionError::ConfigSave("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SessionError::ConfigSave(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SessionError::ConfigSave(e.to_string()))?;

        info!(?path, "Session config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SessionResult<()> {
        let url = Url::parse(&self.identity.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SessionError::Config(format!(
                "identity URL must start with http:// or https://, got: {}",
                self.identity.base_url
            )));
        }

        if self.identity.request_timeout_secs == 0 {
            return Err(SessionError::Config(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.identity.connect_timeout_secs == 0 {
            return Err(SessionError::Config(
                "connect_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from `lookup`, keyed by the `STOREFRONT_*` names.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_IDENTITY_URL) {
            debug!(url = %url, "Overriding identity URL from environment");
            self.identity.base_url = url;
        }

        if let Some(timeout) = lookup(ENV_REQUEST_TIMEOUT) {
            match timeout.parse::<u64>() {
                Ok(secs) => self.identity.request_timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring unparseable request timeout"),
            }
        }

        if let Some(path) = lookup(ENV_SESSION_DB) {
            debug!(path = %path, "Overriding session store path from environment");
            self.storage.path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("session.toml"))
    }

    /// Path of the session database: the configured one, else `session.db`
    /// in the platform data directory.
    pub fn store_path(&self) -> Option<PathBuf> {
        self.storage
            .path
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join("session.db")))
    }

    pub fn base_url(&self) -> &str {
        &self.identity.base_url
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "storefront", "session")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.base_url(), "http://localhost:5000");
        assert_eq!(config.identity.request_timeout(), Duration::from_secs(30));
        assert!(config.storage.path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SessionConfig::default();

        config.identity.base_url = "ws://localhost:5000".to_string();
        assert!(matches!(config.validate(), Err(SessionError::Config(_))));

        config.identity.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.identity.base_url = "https://identity.example.com".to_string();
        assert!(config.validate().is_ok());

        config.identity.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_IDENTITY_URL, "https://identity.example.com"),
            (ENV_REQUEST_TIMEOUT, "5"),
            (ENV_SESSION_DB, "/tmp/override.db"),
        ]
        .into_iter()
        .collect();

        let mut config = SessionConfig::default();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.base_url(), "https://identity.example.com");
        assert_eq!(config.identity.request_timeout_secs, 5);
        assert_eq!(config.store_path(), Some(PathBuf::from("/tmp/override.db")));
    }

    #[test]
    fn test_bad_timeout_override_is_ignored() {
        let mut config = SessionConfig::default();
        config.apply_overrides(|name| (name == ENV_REQUEST_TIMEOUT).then(|| "soon".to_string()));
        assert_eq!(config.identity.request_timeout_secs, 30);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SessionConfig = toml::from_str(
            r#"
            [identity]
            base_url = "https://identity.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url(), "https://identity.example.com");
        assert_eq!(config.identity.connect_timeout_secs, 10);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("storefront-config-{}", std::process::id()));
        let path = dir.join("session.toml");
        let _ = std::fs::remove_dir_all(&dir);

        let mut config = SessionConfig::default();
        config.identity.base_url = "https://identity.example.com".to_string();
        config.storage.path = Some(dir.join("session.db"));
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[identity]"));

        let loaded: SessionConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_or_default_falls_back_on_bad_file() {
        let dir = std::env::temp_dir().join(format!("storefront-badcfg-{}", std::process::id()));
        let path = dir.join("session.toml");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "[identity\nbase_url = ").unwrap();

        assert!(SessionConfig::load(Some(path.clone())).is_err());
        assert_eq!(SessionConfig::load_or_default(Some(path)), SessionConfig::default());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
