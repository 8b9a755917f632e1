//! Error types for the mathfield library.

use thiserror::Error;

/// Result type alias for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Typeset error: {0}")]
    Typeset(#[from] TypesetError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a typesetting engine for a single formula.
///
/// The span renderer never surfaces these to its caller; they are logged and
/// the source text is kept instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesetError {
    #[error("Malformed formula: {0}")]
    Malformed(String),

    #[error("Unbalanced braces in formula")]
    UnbalancedBraces,

    #[error("Engine failure: {0}")]
    Engine(String),
}

/// Errors that occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unknown math backend: {0}")]
    UnknownBackend(String),

    #[error("Invalid field configuration: {0}")]
    Field(String),

    #[error("Invalid palette: {0}")]
    Palette(String),
}

/// Errors from the session store.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session store unavailable: {0}")]
    Store(String),

    #[error("Corrupt persisted session: {0}")]
    Corrupt(String),

    #[error("Session context used before initialize()")]
    Uninitialized,
}

/// Errors from decoding backend response envelopes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request rejected: {}", .0.join("; "))]
    Rejected(Vec<String>),

    #[error("Response succeeded without a result")]
    MissingResult,
}
