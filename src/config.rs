//! Configuration types.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::onboarding::wizard::DEFAULT_SUBMIT_TIMEOUT;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DB_PATH: &str = "./data/campaign-dash.db";

/// HTTP server configuration, read from `DASH_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub db_path: PathBuf,
    /// Upper bound on one organization-creation round trip.
    pub submit_timeout: Duration,
    /// Allowed CORS origin; any origin when unset.
    pub cors_origin: Option<String>,
    /// Directory for daily-rolling log files; stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            cors_origin: None,
            log_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("DASH_PORT") {
            Some(raw) => parse_value("DASH_PORT", &raw)?,
            None => defaults.port,
        };
        let submit_timeout = match get("DASH_SUBMIT_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = parse_value("DASH_SUBMIT_TIMEOUT_SECS", &raw)?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "DASH_SUBMIT_TIMEOUT_SECS".into(),
                        message: "must be at least 1 second".into(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => defaults.submit_timeout,
        };

        Ok(Self {
            port,
            db_path: get("DASH_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            submit_timeout,
            cors_origin: get("DASH_CORS_ORIGIN"),
            log_dir: get("DASH_LOG_DIR").map(PathBuf::from),
        })
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{raw}': {e}"),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.submit_timeout, Duration::from_secs(15));
    }

    #[test]
    fn reads_all_values() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("DASH_PORT", "9090"),
            ("DASH_DB_PATH", "/tmp/dash.db"),
            ("DASH_SUBMIT_TIMEOUT_SECS", "3"),
            ("DASH_CORS_ORIGIN", "https://app.example"),
            ("DASH_LOG_DIR", "/var/log/dash"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.db_path, PathBuf::from("/tmp/dash.db"));
        assert_eq!(config.submit_timeout, Duration::from_secs(3));
        assert_eq!(config.cors_origin.as_deref(), Some("https://app.example"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/dash")));
    }

    #[test]
    fn empty_value_counts_as_unset() {
        let config = ServerConfig::from_lookup(lookup(&[("DASH_CORS_ORIGIN", "  ")])).unwrap();
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("DASH_PORT", "eighty")])).unwrap_err();
        match err {
            ConfigError::InvalidValue { key, .. } => assert_eq!(key, "DASH_PORT"),
        }
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err =
            ServerConfig::from_lookup(lookup(&[("DASH_SUBMIT_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(err.to_string().contains("DASH_SUBMIT_TIMEOUT_SECS"));
    }
}
