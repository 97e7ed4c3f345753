//! Client configuration, read from the environment (and `.env`, loaded by
//! the binary before this runs).

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_FILE: &str = "taskboard.log";

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the task service, e.g. `http://localhost:8000/api`.
    pub api_url: String,
    pub request_timeout: Duration,
    /// The terminal belongs to the UI, so logs go here.
    pub log_file: PathBuf,
    /// Access token from an earlier login; skips the login screen while valid.
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            token: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> { Self::from_lookup(|key| std::env::var(key).ok()) }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let request_timeout = match get("TASKBOARD_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().with_context(|| format!("TASKBOARD_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"))?;
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };

        Ok(Self {
            api_url: get("TASKBOARD_API_URL").unwrap_or(defaults.api_url),
            request_timeout,
            log_file: get("TASKBOARD_LOG_FILE").map(PathBuf::from).unwrap_or(defaults.log_file),
            token: get("TASKBOARD_TOKEN"),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("request_timeout", &self.request_timeout)
            .field("log_file", &self.log_file)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(Config::from_lookup(lookup(&[])).unwrap(), Config::default());
        assert_eq!(Config::from_lookup(lookup(&[("TASKBOARD_TOKEN", "  ")])).unwrap().token, None);
    }

    #[test]
    fn reads_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("TASKBOARD_API_URL", "https://tasks.example.com/api"),
            ("TASKBOARD_TIMEOUT_SECS", "3"),
            ("TASKBOARD_LOG_FILE", "/tmp/tb.log"),
            ("TASKBOARD_TOKEN", "abc"),
        ])).unwrap();
        assert_eq!(cfg.api_url, "https://tasks.example.com/api");
        assert_eq!(cfg.request_timeout, Duration::from_secs(3));
        assert_eq!(cfg.log_file, PathBuf::from("/tmp/tb.log"));
        assert_eq!(cfg.token.as_deref(), Some("abc"));
        assert!(!format!("{cfg:?}").contains("abc"));
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = Config::from_lookup(lookup(&[("TASKBOARD_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("TASKBOARD_TIMEOUT_SECS"));
    }
}
