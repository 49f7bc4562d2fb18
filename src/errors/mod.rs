use thiserror::Error;

/// Typed error hierarchy for chatrelay.
///
/// Use at module boundaries (config loading, conversion, network calls).
/// Internal/leaf functions can continue using `anyhow::Result` — the `Internal` variant
/// allows seamless conversion via the `?` operator.
///
/// The fail-soft operations (`convert::yaml_to_json`, `relay::PasteRelay::submit`,
/// `utils::http::TextFetcher::fetch_text`, ...) fold these into their return value;
/// their `try_*` counterparts surface them.
#[derive(Debug, Error)]
pub enum ChatRelayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Unsupported node kind: {0}")]
    UnsupportedNodeKind(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol anomaly: {0}")]
    ProtocolAnomaly(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<reqwest::Error> for ChatRelayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Convenience alias for results using `ChatRelayError`.
pub type ChatRelayResult<T> = std::result::Result<T, ChatRelayError>;
