use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_STATE_PATH: &str = "data/roster_state.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub state_path: PathBuf,
    pub event_id: i64,
    pub poll_interval: Duration,
    pub http_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let load = |key: &'static str, default: &str| {
            lookup(key).unwrap_or_else(|| {
                info!("{key} not set, using default: {default}");
                default.to_string()
            })
        };
        Ok(Self {
            api_base_url: load("ROSTER_API_BASE_URL", DEFAULT_API_BASE_URL),
            state_path: PathBuf::from(load("ROSTER_STATE_PATH", DEFAULT_STATE_PATH)),
            event_id: parse("ROSTER_EVENT_ID", load("ROSTER_EVENT_ID", "1"))?,
            poll_interval: Duration::from_secs(parse(
                "ROSTER_POLL_INTERVAL_SECS",
                load("ROSTER_POLL_INTERVAL_SECS", "30"),
            )?),
            http_timeout: Duration::from_secs(parse(
                "ROSTER_HTTP_TIMEOUT_SECS",
                load("ROSTER_HTTP_TIMEOUT_SECS", "15"),
            )?),
        })
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod app_config_tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[rstest]
    fn it_should_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.event_id, 1);
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.http_timeout, Duration::from_secs(15));
    }

    #[rstest]
    fn it_should_read_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("ROSTER_API_BASE_URL", "https://fest.example/api"),
            ("ROSTER_EVENT_ID", "4"),
            ("ROSTER_POLL_INTERVAL_SECS", " 10 "),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://fest.example/api");
        assert_eq!(config.event_id, 4);
        assert_eq!(config.poll_interval, Duration::from_secs(10));
    }

    #[rstest]
    #[case("ROSTER_EVENT_ID", "one")]
    #[case("ROSTER_POLL_INTERVAL_SECS", "-5")]
    fn it_should_reject_non_numeric_values(#[case] key: &'static str, #[case] value: &str) {
        let result = AppConfig::from_lookup(lookup(&[(key, value)]));
        assert!(matches!(result, Err(ConfigError::Invalid { key: k, .. }) if k == key));
    }
}
