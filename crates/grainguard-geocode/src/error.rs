use thiserror::Error;

/// Internal failure reasons. The public client methods log these and return
/// a sentinel instead of surfacing them.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or TLS failure, or a non-2xx status (e.g. a rejected token).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The token failed the local format check; no request was sent.
    #[error("token rejected before sending: {0}")]
    InvalidToken(#[from] grainguard_core::CoreError),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
