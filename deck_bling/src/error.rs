//! Error types for deck_bling

use mtg_common::VocabularyError;

/// Unified error type for deck pricing operations
#[derive(Debug, thiserror::Error)]
pub enum BlingError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Failed to parse JSON response
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// HTTP error status code
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// Scryfall answered with an error object
    #[error("{code}: {details}")]
    ApiResponse { code: String, details: String },
    /// GraphQL endpoint answered with errors and no data
    #[error("GraphQL error: {0}")]
    GraphQl(String),
    /// Transient failures on every attempt
    #[error("Giving up on {url} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },
    /// Rate-limited more often than the configured cap
    #[error("Still rate limited by {url}, giving up")]
    RateLimited { url: String },
    /// Every card of a submission failed to resolve
    #[error("Card data provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Submission cannot be priced as given
    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),
    /// Card or printing missing from a pricing result
    #[error("Not found: {0}")]
    NotFound(String),
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Unknown finish, currency or exclusion
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
}

impl BlingError {
    /// Whether a retry of the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            BlingError::Network(_) => true,
            BlingError::HttpStatus(status) => status.is_server_error(),
            _ => false,
        }
    }
}

/// Result alias for deck_bling operations
pub type Result<T> = std::result::Result<T, BlingError>;
