use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

/// Ticket service connection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Service root (e.g., "http://localhost:8000"); endpoints live under `/api/`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u32 {
    10
}

/// Debounce delays and thresholds for the interactive views
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimingConfig {
    /// Quiet period before a description is sent for classification
    #[serde(default = "default_classify_delay_ms")]
    pub classify_delay_ms: u64,
    /// Descriptions must be longer than this (trimmed) to be classified
    #[serde(default = "default_classify_min_chars")]
    pub classify_min_chars: usize,
    /// Quiet period before search input is applied to the ticket filter
    #[serde(default = "default_search_delay_ms")]
    pub search_delay_ms: u64,
    /// Delay between creating a ticket and switching to the ticket list
    #[serde(default = "default_tab_switch_delay_ms")]
    pub tab_switch_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            classify_delay_ms: default_classify_delay_ms(),
            classify_min_chars: default_classify_min_chars(),
            search_delay_ms: default_search_delay_ms(),
            tab_switch_delay_ms: default_tab_switch_delay_ms(),
        }
    }
}

impl TimingConfig {
    pub fn classify_delay(&self) -> Duration {
        Duration::from_millis(self.classify_delay_ms)
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    pub fn tab_switch_delay(&self) -> Duration {
        Duration::from_millis(self.tab_switch_delay_ms)
    }
}

fn default_classify_delay_ms() -> u64 {
    800
}

fn default_classify_min_chars() -> usize {
    20
}

fn default_search_delay_ms() -> u64 {
    400
}

fn default_tab_switch_delay_ms() -> u64 {
    800
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.timing.classify_delay_ms, 800);
        assert_eq!(config.timing.classify_min_chars, 20);
        assert_eq!(config.timing.search_delay_ms, 400);
        assert_eq!(config.timing.tab_switch_delay_ms, 800);
    }

    #[test]
    fn test_deserialize_partial_timing() {
        let toml = r#"
[api]
base_url = "https://desk.example.com"

[timing]
search_delay_ms = 250
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "https://desk.example.com");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.timing.search_delay_ms, 250);
        assert_eq!(config.timing.classify_delay_ms, 800);
    }

    #[test]
    fn test_duration_helpers() {
        let timing = TimingConfig::default();
        assert_eq!(timing.classify_delay(), Duration::from_millis(800));
        assert_eq!(timing.search_delay(), Duration::from_millis(400));
        assert_eq!(timing.tab_switch_delay(), Duration::from_millis(800));
    }

    #[test]
    fn test_deserialize_wrong_type_fails() {
        let toml = r#"
[api]
timeout_secs = "soon"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }
}
