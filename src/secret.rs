//! # Secret Value Object
//!
//! Immutable representation of a secret retrieved from or stored in the
//! vault. The value never appears in `Debug` output and the backing buffer
//! is zeroed on drop.

use chrono::{DateTime, Utc};
use std::fmt;
use zeroize::Zeroize;

/// A secret as returned by the remote vault.
///
/// Created on every successful retrieval or store and never mutated
/// afterwards. `version` is the opaque identifier the vault assigned to
/// this revision; `expires_on` is the vault-declared expiry, distinct from
/// any local cache expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret {
    value: String,
    version: Option<String>,
    expires_on: Option<DateTime<Utc>>,
}

impl Secret {
    /// Create a secret holding just a value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            version: None,
            expires_on: None,
        }
    }

    /// Attach the vault-assigned version identifier.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Attach the vault-declared expiry timestamp.
    #[must_use]
    pub fn with_expires_on(mut self, expires_on: DateTime<Utc>) -> Self {
        self.expires_on = Some(expires_on);
        self
    }

    /// The secret value.
    ///
    /// The returned slice contains the actual secret; use it immediately
    /// rather than copying it around.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Vault-assigned version identifier, if the transport reported one.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Vault-declared expiry, if the transport reported one.
    #[must_use]
    pub fn expires_on(&self) -> Option<DateTime<Utc>> {
        self.expires_on
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("value", &"[REDACTED]")
            .field("length", &self.value.len())
            .field("version", &self.version)
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}
