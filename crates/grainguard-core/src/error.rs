use thiserror::Error;

/// Domain-level validation failures.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid coordinate ({lat}, {lng}): latitude must be in [-90, 90] and longitude in [-180, 180]")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("invalid token format: map access tokens start with \"pk.\"")]
    InvalidTokenFormat,

    #[error("unknown directions provider \"{0}\" (expected google or apple)")]
    UnknownProvider(String),

    #[error("unknown language \"{0}\" (expected en or kn)")]
    UnknownLanguage(String),
}

/// Failures while loading configuration, the catalog, or persisted preferences.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),

    #[error("failed to access preferences file {path}: {source}")]
    PreferencesIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse preferences file {path}: {source}")]
    PreferencesParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
