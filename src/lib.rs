//! # Key Vault Secret Client
//!
//! Async client for Azure Key Vault style secret stores, with an in-memory
//! caching layer that absorbs redundant reads and service-side throttling.
//!
//! Two cooperating pieces:
//! - [`RemoteSecretClient`] normalizes two transport strategies (legacy
//!   authentication flow, modern credential-bound SDK handle) into one
//!   contract, validates naming constraints before any network work,
//!   classifies not-found against other failures, and retries rate-limited
//!   calls on an exponential backoff schedule.
//! - [`CachedSecretClient`] wraps it with a time-expiring cache and a
//!   single-flight-per-name refresh guard, with explicit `ignore_cache`
//!   bypass semantics on every operation.
//!
//! The actual network calls live behind the [`transport::VaultOps`]
//! capability trait; this crate owns neither wire formats nor
//! authentication protocols.
//!
//! ```no_run
//! use keyvault_secret_client::{
//!     CacheConfig, CachedSecretClient, RemoteSecretClient, VaultEndpoint,
//! };
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     credential: Arc<dyn keyvault_secret_client::transport::VaultCredential>,
//! #     ops: Arc<dyn keyvault_secret_client::transport::VaultOps>,
//! # ) -> Result<(), keyvault_secret_client::SecretClientError> {
//! let endpoint = VaultEndpoint::new("https://prod-vault.vault.azure.net")?;
//! let client = Arc::new(RemoteSecretClient::with_credential(endpoint, credential, ops));
//! let cached = CachedSecretClient::new(client, &CacheConfig::default());
//!
//! let secret = cached.get_secret("db-password", false).await?;
//! println!("version: {:?}", secret.version());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cached;
pub mod client;
pub mod error;
pub mod retry;
pub mod secret;
pub mod transport;
pub mod validation;

pub use cache::{parse_cache_duration, CacheConfig, SecretCache, DEFAULT_CACHE_TTL};
pub use cached::CachedSecretClient;
pub use client::RemoteSecretClient;
pub use error::{SecretClientError, TransportError};
pub use retry::RetryPolicy;
pub use secret::Secret;
pub use validation::{validate_secret_name, validate_vault_uri, VaultEndpoint};
