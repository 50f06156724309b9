//! Errors raised while negotiating request options.

use thiserror::Error;

/// A request could not be reconciled with the operator configuration.
///
/// Both variants carry the offending keys in a stable order so callers can
/// inspect them without parsing the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NegotiationError {
    /// The request named keys that no allow-list accepts.
    #[error("not allowed options: {}", .keys.join(", "))]
    UnsupportedOptions { keys: Vec<String> },

    /// Required keys were not resolved by defaults or by the request.
    #[error("missing mandatory options: {}", .keys.join(", "))]
    MissingMandatoryOptions { keys: Vec<String> },
}

impl NegotiationError {
    /// The keys this error is about.
    pub fn keys(&self) -> &[String] {
        match self {
            NegotiationError::UnsupportedOptions { keys } => keys,
            NegotiationError::MissingMandatoryOptions { keys } => keys,
        }
    }
}

/// Result type alias for negotiation operations.
pub type Result<T> = std::result::Result<T, NegotiationError>;
