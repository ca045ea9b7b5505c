use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable prefix; nested keys are separated by `__`
/// (e.g. `HELPDESK_API__BASE_URL`).
const ENV_PREFIX: &str = "HELPDESK_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from defaults and environment variables only
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[api]
base_url = "http://127.0.0.1:9000"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_load_config_from_str_invalid() {
        let toml = r#"
[timing]
classify_min_chars = -3
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/helpdesk.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[api]
base_url = "http://10.0.0.5:8000"
timeout_secs = 3

[timing]
classify_delay_ms = 500
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.api.timeout_secs, 3);
        assert_eq!(config.timing.classify_delay_ms, 500);
        assert_eq!(config.timing.search_delay_ms, 400);
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "helpdesk.toml",
                r#"
[api]
base_url = "http://from-file:8000"
"#,
            )?;
            jail.set_env("HELPDESK_API__BASE_URL", "http://from-env:8000");
            jail.set_env("HELPDESK_TIMING__SEARCH_DELAY_MS", "150");

            let config = load_config(Path::new("helpdesk.toml")).expect("config loads");
            assert_eq!(config.api.base_url, "http://from-env:8000");
            assert_eq!(config.timing.search_delay_ms, 150);
            Ok(())
        });
    }
}
