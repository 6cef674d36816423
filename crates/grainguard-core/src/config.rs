use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function,
/// so parsing can be tested with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("GRAINGUARD_ENV", "development"));
    let log_level = or_default("GRAINGUARD_LOG_LEVEL", "info");
    let prefs_path = PathBuf::from(or_default(
        "GRAINGUARD_PREFS_PATH",
        "./grainguard-prefs.json",
    ));
    let catalog_path = lookup("GRAINGUARD_CATALOG_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let geocoding_base_url = or_default("GRAINGUARD_GEOCODING_BASE_URL", "https://api.mapbox.com");
    if !geocoding_base_url.starts_with("http://") && !geocoding_base_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "GRAINGUARD_GEOCODING_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{geocoding_base_url}'"),
        });
    }
    let geocoding_dataset = or_default("GRAINGUARD_GEOCODING_DATASET", "mapbox");
    let geocoding_country = or_default("GRAINGUARD_GEOCODING_COUNTRY", "in");
    let geocoding_timeout_secs = parse_u64("GRAINGUARD_GEOCODING_TIMEOUT_SECS", "10")?;
    let location_timeout_secs = parse_u64("GRAINGUARD_LOCATION_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        env,
        log_level,
        prefs_path,
        catalog_path,
        geocoding_base_url,
        geocoding_dataset,
        geocoding_country,
        geocoding_timeout_secs,
        location_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
