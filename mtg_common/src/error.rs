//! Error types for mtg_common

/// Failure to read a vocabulary value (finish, currency, exclusion) from text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VocabularyError {
    #[error("Unknown finish: {0}")]
    UnknownFinish(String),
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
    #[error("Unknown exclusion: {0}")]
    UnknownExclusion(String),
}

/// Result alias for mtg_common operations
pub type Result<T> = std::result::Result<T, VocabularyError>;
