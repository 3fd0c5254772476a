//! # Transport Strategies
//!
//! The client talks to the vault through exactly one of two interchangeable
//! transport strategies, selected at construction and fixed for the
//! client's lifetime:
//!
//! - [`LegacyTransport`]: authentication-flow based. An injected
//!   [`VaultAuthenticator`] lazily establishes the low-level handle, guarded
//!   so concurrent callers share a single connection-establishment attempt.
//! - [`SdkTransport`]: bound to a caller-supplied credential and a
//!   pre-authenticated handle at construction.
//!
//! Both resolve to the same narrow wire capability, [`VaultOps`]. The
//! actual network calls live in external collaborators implementing that
//! trait; this crate owns neither connection pooling nor wire formats.

mod legacy;
mod sdk;

pub use legacy::LegacyTransport;
pub use sdk::SdkTransport;

use crate::error::TransportError;
use crate::secret::Secret;
use crate::validation::VaultEndpoint;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Wire-level operations against a vault.
///
/// Implementations perform the actual network calls. Failures carry an
/// HTTP-equivalent status code where one exists so the client can classify
/// not-found and throttling without knowing the transport's error shape.
#[async_trait]
pub trait VaultOps: Send + Sync {
    /// Fetch the latest revision of a secret.
    async fn fetch(&self, vault: &VaultEndpoint, name: &str) -> Result<Secret, TransportError>;

    /// Create the secret or add a new revision, returning the stored
    /// secret with its vault-assigned version and expiry.
    async fn upsert(
        &self,
        vault: &VaultEndpoint,
        name: &str,
        value: &str,
    ) -> Result<Secret, TransportError>;
}

/// Authentication capability for the legacy transport strategy.
///
/// Called at most once per client instance; the resulting handle is
/// memoized for the client's lifetime.
#[async_trait]
pub trait VaultAuthenticator: Send + Sync {
    /// Perform the authentication handshake and return a connected handle.
    async fn authenticate(&self) -> Result<Arc<dyn VaultOps>, TransportError>;
}

/// Opaque token-provider handle for the SDK transport strategy.
///
/// This crate stores the credential for the client's lifetime but never
/// inspects its contents.
pub trait VaultCredential: Send + Sync {}

/// The transport strategy a client is bound to.
///
/// Mutually exclusive per instance; the variants share the [`VaultOps`]
/// contract but differ in how the handle is acquired.
pub enum TransportStrategy {
    /// Legacy authentication-flow strategy.
    Legacy(LegacyTransport),
    /// Modern pre-authenticated strategy.
    Sdk(SdkTransport),
}

impl TransportStrategy {
    /// Resolve the strategy to a wire handle, authenticating first if the
    /// legacy strategy has not connected yet.
    pub(crate) async fn ops(&self) -> Result<Arc<dyn VaultOps>, TransportError> {
        match self {
            Self::Legacy(transport) => transport.authenticated_ops().await,
            Self::Sdk(transport) => Ok(transport.ops()),
        }
    }

    /// Human-readable strategy name for logs and configuration errors.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Legacy(_) => "legacy",
            Self::Sdk(_) => "sdk",
        }
    }
}

impl fmt::Debug for TransportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TransportStrategy").field(&self.kind()).finish()
    }
}
