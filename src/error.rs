//! # Error Types
//!
//! Typed error taxonomy for the secret client.
//!
//! Validation and configuration errors are always raised before any cache or
//! network work. Transport failures keep their native cause and status code
//! so callers (and the retry policy) can classify them without string
//! matching.

use thiserror::Error;

/// Failure reported by an underlying vault transport.
///
/// Carries the HTTP-equivalent status code when the transport exposed one,
/// plus the transport's native error as the source. The status code drives
/// classification: 404 becomes [`SecretClientError::NotFound`] at the client
/// boundary, 429 is the only condition the retry policy acts on.
#[derive(Debug, Error)]
#[error("vault transport request failed{}: {source}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
pub struct TransportError {
    status: Option<u16>,
    #[source]
    source: anyhow::Error,
}

impl TransportError {
    /// Wrap a transport failure that carries an HTTP-equivalent status code.
    pub fn with_status(status: u16, source: impl Into<anyhow::Error>) -> Self {
        Self {
            status: Some(status),
            source: source.into(),
        }
    }

    /// Wrap a transport failure with no usable status code
    /// (connection reset, malformed response, auth handshake failure).
    pub fn other(source: impl Into<anyhow::Error>) -> Self {
        Self {
            status: None,
            source: source.into(),
        }
    }

    /// HTTP-equivalent status code, if the transport reported one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Remote service confirmed the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    /// Remote service is rate limiting; the only retryable condition.
    #[must_use]
    pub fn is_throttled(&self) -> bool {
        self.status == Some(429)
    }
}

/// Errors surfaced by the secret client and its caching decorator.
#[derive(Debug, Error)]
pub enum SecretClientError {
    /// Secret name was empty or whitespace-only. Raised before format
    /// validation, which needs a non-empty string to evaluate.
    #[error("secret name must not be empty")]
    EmptySecretName,

    /// Secret name failed the vault naming grammar.
    #[error("secret name '{name}' is invalid: {reason}")]
    InvalidSecretName { name: String, reason: String },

    /// Vault endpoint failed the vault URI grammar.
    #[error("vault URI '{uri}' is invalid: {reason}")]
    InvalidVaultUri { uri: String, reason: String },

    /// Store was called with an empty secret value.
    #[error("secret value must not be empty")]
    EmptySecretValue,

    /// Remote service confirmed the secret does not exist.
    #[error("secret '{name}' was not found in the vault")]
    NotFound { name: String },

    /// Any other remote failure, propagated with its native cause.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Caller invoked an operation incompatible with the client's transport
    /// strategy. Programmer error, never retried.
    #[error("client configuration error: {message}")]
    Configuration { message: String },
}

impl SecretClientError {
    /// True for the validation family: malformed or missing input that was
    /// rejected before any I/O.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptySecretName
                | Self::InvalidSecretName { .. }
                | Self::InvalidVaultUri { .. }
                | Self::EmptySecretValue
        )
    }
}
