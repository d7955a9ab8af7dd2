use std::{env, path::PathBuf, str::FromStr, time::Duration};

use daybook_core::grid::{
    GridOptions, DEFAULT_FIRST_HOUR, DEFAULT_LAST_HOUR, DEFAULT_MAX_EVENTS_PER_CELL,
};

pub const DEFAULT_URL: &str = "http://localhost:8080";
pub const DEFAULT_API_PATH: &str = "/api/schedules";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_SESSION_FILE: &str = "daybook-session.json";
pub const DEFAULT_OFFLINE_FILE: &str = "daybook-offline.json";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Remote store base URL (default: "http://localhost:8080")
    pub base_url: String,
    /// Path of the schedule collection on the remote store (default: "/api/schedules")
    pub api_path: String,
    /// Request timeout in seconds (default: 10)
    pub timeout_seconds: u64,
    /// JSON file holding the current session (default: "daybook-session.json")
    pub session_file: PathBuf,
    /// JSON file backing offline mode (default: "daybook-offline.json")
    pub offline_file: PathBuf,
    /// Events shown per month cell (default: 3)
    pub max_events_per_cell: usize,
    /// First hour row of week and day grids (default: 8)
    pub first_hour: u32,
    /// Last hour row of week and day grids (default: 19)
    pub last_hour: u32,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DAYBOOK_URL` - Remote store base URL
    /// - `DAYBOOK_API_PATH` - Schedule collection path
    /// - `DAYBOOK_TIMEOUT_SECONDS` - Request timeout
    /// - `DAYBOOK_SESSION_FILE` - Session file path
    /// - `DAYBOOK_OFFLINE_FILE` - Offline store file path
    /// - `DAYBOOK_MAX_EVENTS_PER_CELL` - Month cell display cap
    /// - `DAYBOOK_FIRST_HOUR` / `DAYBOOK_LAST_HOUR` - Visible hour rows
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut first_hour =
            parse_var(&lookup, "DAYBOOK_FIRST_HOUR").unwrap_or(DEFAULT_FIRST_HOUR);
        let mut last_hour = parse_var(&lookup, "DAYBOOK_LAST_HOUR").unwrap_or(DEFAULT_LAST_HOUR);
        if first_hour > last_hour || last_hour > 23 {
            tracing::warn!(first_hour, last_hour, "Invalid hour range, using defaults");
            first_hour = DEFAULT_FIRST_HOUR;
            last_hour = DEFAULT_LAST_HOUR;
        }

        Self {
            base_url: lookup("DAYBOOK_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_URL.to_string()),
            api_path: lookup("DAYBOOK_API_PATH").unwrap_or_else(|| DEFAULT_API_PATH.to_string()),
            timeout_seconds: parse_var(&lookup, "DAYBOOK_TIMEOUT_SECONDS")
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            session_file: lookup("DAYBOOK_SESSION_FILE")
                .unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string())
                .into(),
            offline_file: lookup("DAYBOOK_OFFLINE_FILE")
                .unwrap_or_else(|| DEFAULT_OFFLINE_FILE.to_string())
                .into(),
            max_events_per_cell: parse_var(&lookup, "DAYBOOK_MAX_EVENTS_PER_CELL")
                .unwrap_or(DEFAULT_MAX_EVENTS_PER_CELL),
            first_hour,
            last_hour,
        }
    }

    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Full URL of the schedule collection.
    pub fn schedules_url(&self) -> String {
        format!("{}{}", self.base_url, self.api_path)
    }

    pub fn grid_options(&self) -> GridOptions {
        GridOptions {
            max_events_per_cell: self.max_events_per_cell,
            first_hour: self.first_hour,
            last_hour: self.last_hour,
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = ClientConfig::default();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.api_path, "/api/schedules");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.session_file, PathBuf::from("daybook-session.json"));
        assert_eq!(config.grid_options(), GridOptions::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            ("DAYBOOK_URL", "https://calendar.example.com/"),
            ("DAYBOOK_TIMEOUT_SECONDS", "3"),
            ("DAYBOOK_MAX_EVENTS_PER_CELL", "5"),
            ("DAYBOOK_FIRST_HOUR", "6"),
            ("DAYBOOK_LAST_HOUR", "22"),
        ]);

        assert_eq!(
            config.schedules_url(),
            "https://calendar.example.com/api/schedules"
        );
        assert_eq!(config.timeout_seconds, 3);
        assert_eq!(config.max_events_per_cell, 5);
        assert_eq!((config.first_hour, config.last_hour), (6, 22));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_with(&[
            ("DAYBOOK_TIMEOUT_SECONDS", "soon"),
            ("DAYBOOK_FIRST_HOUR", "20"),
            ("DAYBOOK_LAST_HOUR", "9"),
        ]);

        assert_eq!(config.timeout_seconds, 10);
        assert_eq!((config.first_hour, config.last_hour), (8, 19));
    }
}
