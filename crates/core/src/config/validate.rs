use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - api.base_url is an absolute http(s) URL
/// - api.timeout_secs is not 0
/// - every debounce delay is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(&config.api.base_url).map_err(|e| {
        ConfigError::ValidationError(format!(
            "api.base_url {:?} is not a valid URL: {}",
            config.api.base_url, e
        ))
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::ValidationError(format!(
            "api.base_url must use http or https, got {:?}",
            url.scheme()
        )));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "api.timeout_secs cannot be 0".to_string(),
        ));
    }

    let timing = &config.timing;
    for (name, value) in [
        ("timing.classify_delay_ms", timing.classify_delay_ms),
        ("timing.search_delay_ms", timing.search_delay_ms),
        ("timing.tab_switch_delay_ms", timing.tab_switch_delay_ms),
    ] {
        if value == 0 {
            return Err(ConfigError::ValidationError(format!("{} cannot be 0", name)));
        }
    }

    Ok(())
}
