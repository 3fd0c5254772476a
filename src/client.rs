//! # Remote Secret Client
//!
//! Talks to the remote vault through one of the two transport strategies,
//! normalizes results into [`Secret`], classifies not-found against other
//! failures, and retries throttled calls on the exponential backoff
//! schedule.
//!
//! This module provides functionality to:
//! - Retrieve secret values and metadata
//! - Create and update secrets
//! - Validate secret names before any network work

use crate::error::{SecretClientError, TransportError};
use crate::retry::RetryPolicy;
use crate::secret::Secret;
use crate::transport::{
    LegacyTransport, SdkTransport, TransportStrategy, VaultAuthenticator, VaultCredential,
    VaultOps,
};
use crate::validation::{validate_secret_name, VaultEndpoint};
use std::sync::Arc;
use tracing::{debug, warn};

/// Client for a single vault endpoint.
///
/// Bound to exactly one transport strategy at construction; the endpoint
/// and strategy are immutable for the client's lifetime. All operations
/// validate the secret name before any cache or network interaction and
/// retry only rate-limited responses.
#[derive(Debug)]
pub struct RemoteSecretClient {
    endpoint: VaultEndpoint,
    strategy: TransportStrategy,
    retry: RetryPolicy,
}

impl RemoteSecretClient {
    /// Build a client on the legacy authentication-flow strategy.
    ///
    /// The authenticator runs lazily on the first operation; concurrent
    /// first callers share a single handshake attempt.
    #[must_use]
    pub fn with_authenticator(
        endpoint: VaultEndpoint,
        authenticator: Arc<dyn VaultAuthenticator>,
    ) -> Self {
        Self {
            endpoint,
            strategy: TransportStrategy::Legacy(LegacyTransport::new(authenticator)),
            retry: RetryPolicy::throttling(),
        }
    }

    /// Build a client on the modern strategy, bound to a caller-supplied
    /// credential and its pre-authenticated handle.
    #[must_use]
    pub fn with_credential(
        endpoint: VaultEndpoint,
        credential: Arc<dyn VaultCredential>,
        ops: Arc<dyn VaultOps>,
    ) -> Self {
        Self {
            endpoint,
            strategy: TransportStrategy::Sdk(SdkTransport::new(credential, ops)),
            retry: RetryPolicy::throttling(),
        }
    }

    /// Replace the retry policy. Intended for hosts with their own
    /// throttling budget; the default is [`RetryPolicy::throttling`].
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The validated endpoint this client is bound to.
    #[must_use]
    pub fn endpoint(&self) -> &VaultEndpoint {
        &self.endpoint
    }

    /// The legacy transport, when this client was built with an
    /// authenticator.
    ///
    /// # Errors
    /// Returns [`SecretClientError::Configuration`] for an SDK-mode client;
    /// use [`Self::sdk_transport`] there instead.
    pub fn legacy_transport(&self) -> Result<&LegacyTransport, SecretClientError> {
        match &self.strategy {
            TransportStrategy::Legacy(transport) => Ok(transport),
            TransportStrategy::Sdk(_) => Err(SecretClientError::Configuration {
                message: "client was built with an SDK credential; use sdk_transport() \
                          to reach the low-level client"
                    .to_string(),
            }),
        }
    }

    /// The SDK transport, when this client was built with a credential.
    ///
    /// # Errors
    /// Returns [`SecretClientError::Configuration`] for a legacy-mode
    /// client; use [`Self::legacy_transport`] there instead.
    pub fn sdk_transport(&self) -> Result<&SdkTransport, SecretClientError> {
        match &self.strategy {
            TransportStrategy::Sdk(transport) => Ok(transport),
            TransportStrategy::Legacy(_) => Err(SecretClientError::Configuration {
                message: "client was built with an authenticator; use legacy_transport() \
                          to reach the low-level client"
                    .to_string(),
            }),
        }
    }

    /// Get the latest revision of a secret.
    ///
    /// # Errors
    /// - [`SecretClientError::EmptySecretName`] / `InvalidSecretName` before
    ///   any network work
    /// - [`SecretClientError::NotFound`] when the vault confirms the secret
    ///   does not exist
    /// - [`SecretClientError::Transport`] for any other remote failure,
    ///   after throttling retries are exhausted
    pub async fn get_secret(&self, name: &str) -> Result<Secret, SecretClientError> {
        validate_secret_name(name)?;
        let ops = self.strategy.ops().await?;

        debug!(
            secret.name = name,
            vault = %self.endpoint,
            "fetching secret from vault"
        );
        let result = self
            .retry
            .run(TransportError::is_throttled, || {
                ops.fetch(&self.endpoint, name)
            })
            .await;

        match result {
            Ok(secret) => {
                debug!(
                    secret.name = name,
                    secret.version = secret.version().unwrap_or("latest"),
                    "fetched secret from vault"
                );
                Ok(secret)
            }
            Err(err) => Err(self.classify(name, err)),
        }
    }

    /// Convenience projection of [`Self::get_secret`] returning just the
    /// value.
    ///
    /// # Errors
    /// Same as [`Self::get_secret`].
    pub async fn get_raw_secret_value(&self, name: &str) -> Result<String, SecretClientError> {
        let secret = self.get_secret(name).await?;
        Ok(secret.value().to_string())
    }

    /// Create the secret or add a new revision.
    ///
    /// # Errors
    /// - validation errors before any network work, including
    ///   [`SecretClientError::EmptySecretValue`]
    /// - [`SecretClientError::Transport`] for remote failures, after
    ///   throttling retries are exhausted
    pub async fn store_secret(
        &self,
        name: &str,
        value: &str,
    ) -> Result<Secret, SecretClientError> {
        validate_secret_name(name)?;
        if value.is_empty() {
            return Err(SecretClientError::EmptySecretValue);
        }
        let ops = self.strategy.ops().await?;

        debug!(
            secret.name = name,
            vault = %self.endpoint,
            "storing secret in vault"
        );
        let result = self
            .retry
            .run(TransportError::is_throttled, || {
                ops.upsert(&self.endpoint, name, value)
            })
            .await;

        match result {
            Ok(secret) => {
                debug!(
                    secret.name = name,
                    secret.version = secret.version().unwrap_or("unversioned"),
                    "stored secret in vault"
                );
                Ok(secret)
            }
            Err(err) => Err(self.classify(name, err)),
        }
    }

    /// Translate a not-found transport failure into [`SecretClientError::NotFound`];
    /// everything else propagates as the transport's native error after
    /// being logged.
    fn classify(&self, name: &str, err: TransportError) -> SecretClientError {
        if err.is_not_found() {
            debug!(secret.name = name, vault = %self.endpoint, "secret not found in vault");
            return SecretClientError::NotFound {
                name: name.to_string(),
            };
        }
        warn!(
            vault = %self.endpoint,
            status = err.status().map_or(-1i32, i32::from),
            "vault request failed: {err}"
        );
        SecretClientError::Transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NoopOps;

    #[async_trait]
    impl VaultOps for NoopOps {
        async fn fetch(
            &self,
            _vault: &VaultEndpoint,
            _name: &str,
        ) -> Result<Secret, TransportError> {
            Err(TransportError::other(anyhow::anyhow!("not wired")))
        }

        async fn upsert(
            &self,
            _vault: &VaultEndpoint,
            _name: &str,
            _value: &str,
        ) -> Result<Secret, TransportError> {
            Err(TransportError::other(anyhow::anyhow!("not wired")))
        }
    }

    struct NoopAuthenticator;

    #[async_trait]
    impl VaultAuthenticator for NoopAuthenticator {
        async fn authenticate(&self) -> Result<Arc<dyn VaultOps>, TransportError> {
            Ok(Arc::new(NoopOps))
        }
    }

    struct NoopCredential;
    impl VaultCredential for NoopCredential {}

    fn endpoint() -> VaultEndpoint {
        VaultEndpoint::new("https://unit-vault.vault.azure.net").unwrap()
    }

    #[test]
    fn test_wrong_strategy_accessor_names_the_right_one() {
        let legacy = RemoteSecretClient::with_authenticator(endpoint(), Arc::new(NoopAuthenticator));
        assert!(legacy.legacy_transport().is_ok());
        let err = legacy.sdk_transport().unwrap_err();
        assert!(
            matches!(&err, SecretClientError::Configuration { message } if message.contains("legacy_transport()")),
            "unexpected error: {err}"
        );

        let sdk = RemoteSecretClient::with_credential(
            endpoint(),
            Arc::new(NoopCredential),
            Arc::new(NoopOps),
        );
        assert!(sdk.sdk_transport().is_ok());
        let err = sdk.legacy_transport().unwrap_err();
        assert!(
            matches!(&err, SecretClientError::Configuration { message } if message.contains("sdk_transport()")),
            "unexpected error: {err}"
        );
    }

    #[tokio::test]
    async fn test_invalid_name_rejected_before_transport() {
        // NoopOps errors on any wire call; a validation failure must surface
        // instead of a transport failure.
        let client = RemoteSecretClient::with_credential(
            endpoint(),
            Arc::new(NoopCredential),
            Arc::new(NoopOps),
        );

        let err = client.get_secret("").await.unwrap_err();
        assert!(matches!(err, SecretClientError::EmptySecretName));

        let err = client.get_secret("9starts-with-digit").await.unwrap_err();
        assert!(matches!(err, SecretClientError::InvalidSecretName { .. }));

        let err = client.store_secret("valid-name", "").await.unwrap_err();
        assert!(matches!(err, SecretClientError::EmptySecretValue));
    }
}
