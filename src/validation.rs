//! # Naming Validation
//!
//! Pure grammar checks for vault endpoints and secret names.
//!
//! Every public operation on the client runs these before touching the cache
//! or the network, so malformed input never reaches either layer.
//!
//! Constraints follow the official vault API limits:
//! - Vault name: 3-24 characters, alphanumeric and hyphens
//! - Secret name: 1-127 characters, alphanumeric and hyphens, must start
//!   with a letter
//!
//! Reference: https://learn.microsoft.com/en-us/azure/key-vault/general/about-keys-secrets-certificates#vault-name

use crate::error::SecretClientError;
use regex::Regex;
use std::fmt;

/// Validate a secret name against the vault naming grammar.
///
/// Empty or whitespace-only names are a distinct error
/// ([`SecretClientError::EmptySecretName`]), checked first: format
/// validation needs a non-empty string to evaluate.
///
/// # Errors
/// Returns [`SecretClientError::InvalidSecretName`] when the name fails
/// `^[A-Za-z][A-Za-z0-9-]{0,126}$`.
pub fn validate_secret_name(name: &str) -> Result<(), SecretClientError> {
    if name.trim().is_empty() {
        return Err(SecretClientError::EmptySecretName);
    }

    // Secret name constraints:
    // - Length: 1-127 characters
    // - Must start with a letter
    // - Allowed: letters, digits, hyphens
    let name_regex = Regex::new(r"^[A-Za-z][A-Za-z0-9-]{0,126}$").map_err(|e| {
        SecretClientError::Configuration {
            message: format!("failed to compile secret name regex: {e}"),
        }
    })?;

    if !name_regex.is_match(name) {
        return Err(SecretClientError::InvalidSecretName {
            name: name.to_string(),
            reason: "must be 1-127 characters, start with a letter, and contain only \
                     letters, digits, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

/// Validate a vault URI against the vault endpoint grammar.
///
/// # Errors
/// Returns [`SecretClientError::InvalidVaultUri`] when the URI fails
/// `https://{3-24 alphanumeric-or-hyphen}.vault.azure.net` (optional
/// trailing slash).
pub fn validate_vault_uri(uri: &str) -> Result<(), SecretClientError> {
    let uri_trimmed = uri.trim();

    if uri_trimmed.is_empty() {
        return Err(SecretClientError::InvalidVaultUri {
            uri: uri.to_string(),
            reason: "vault URI must not be empty".to_string(),
        });
    }

    // Vault endpoint constraints:
    // - https scheme only
    // - Vault name label: 3-24 characters, alphanumeric and hyphens
    // - Fixed vault domain, optional trailing slash
    let uri_regex =
        Regex::new(r"^https://[A-Za-z0-9-]{3,24}\.vault\.azure\.net/?$").map_err(|e| {
            SecretClientError::Configuration {
                message: format!("failed to compile vault URI regex: {e}"),
            }
        })?;

    if !uri_regex.is_match(uri_trimmed) {
        return Err(SecretClientError::InvalidVaultUri {
            uri: uri.to_string(),
            reason: "must match https://{vault-name}.vault.azure.net with a vault name of \
                     3-24 alphanumeric or hyphen characters"
                .to_string(),
        });
    }

    Ok(())
}

/// A validated vault endpoint.
///
/// Constructed once at client initialization and immutable for the client's
/// lifetime; holding one is proof the URI passed [`validate_vault_uri`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultEndpoint(String);

impl VaultEndpoint {
    /// Parse and validate a vault URI.
    ///
    /// A trailing slash is accepted and stripped so the stored form is
    /// canonical.
    ///
    /// # Errors
    /// Returns [`SecretClientError::InvalidVaultUri`] when the URI fails the
    /// endpoint grammar.
    pub fn new(uri: impl Into<String>) -> Result<Self, SecretClientError> {
        let uri = uri.into();
        validate_vault_uri(&uri)?;
        let canonical = uri.trim().trim_end_matches('/').to_string();
        Ok(Self(canonical))
    }

    /// The canonical endpoint URI (no trailing slash).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The vault name label, e.g. `my-vault` for
    /// `https://my-vault.vault.azure.net`.
    #[must_use]
    pub fn vault_name(&self) -> &str {
        self.0
            .strip_prefix("https://")
            .and_then(|s| s.split('.').next())
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for VaultEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for VaultEndpoint {
    type Err = SecretClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
