use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide settings read once at startup. User-editable state (the map
/// token, language) lives in [`crate::Preferences`] instead.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub prefs_path: PathBuf,
    /// YAML catalog to load instead of the built-in facilities.
    pub catalog_path: Option<PathBuf>,
    pub geocoding_base_url: String,
    /// Dataset segment of the geocoding path, e.g. `mapbox` in `mapbox.places`.
    pub geocoding_dataset: String,
    pub geocoding_country: String,
    pub geocoding_timeout_secs: u64,
    pub location_timeout_secs: u64,
}
