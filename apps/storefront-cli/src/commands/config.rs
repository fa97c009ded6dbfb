//! # Config Command
//!
//! Prints the configuration the other commands would run with, after the
//! config file, environment variables and flags have been applied.

use serde::Serialize;
use std::path::PathBuf;
use storefront_session::SessionConfig;

/// Effective configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDto {
    pub identity_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub store_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

pub fn get_config(config: &SessionConfig, config_path: Option<PathBuf>) -> ConfigDto {
    ConfigDto {
        identity_url: config.identity.base_url.clone(),
        request_timeout_secs: config.identity.request_timeout_secs,
        connect_timeout_secs: config.identity.connect_timeout_secs,
        store_path: config.store_path(),
        config_path: config_path.or_else(SessionConfig::default_config_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_explicit_paths() {
        let mut config = SessionConfig::default();
        config.storage.path = Some(PathBuf::from("/tmp/session.db"));

        let dto = get_config(&config, Some(PathBuf::from("/tmp/session.toml")));
        assert_eq!(dto.identity_url, "http://localhost:5000");
        assert_eq!(dto.store_path, Some(PathBuf::from("/tmp/session.db")));
        assert_eq!(dto.config_path, Some(PathBuf::from("/tmp/session.toml")));
    }
}
