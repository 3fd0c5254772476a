//! # Caching Decorator
//!
//! Wraps a [`RemoteSecretClient`] with the in-memory [`SecretCache`] and a
//! single-flight guard: at most one in-flight remote fetch per secret name
//! reaches the network, with concurrent callers for the same name either
//! sharing that fetch's freshly cached result or serializing behind it.
//!
//! The `ignore_cache` flag on each operation bypasses the cache's influence
//! without changing what reaches the remote service: bypassing reads still
//! refresh the cache on success, bypassing writes still reach the vault but
//! leave the cache untouched.

use crate::cache::{CacheConfig, SecretCache};
use crate::client::RemoteSecretClient;
use crate::error::SecretClientError;
use crate::secret::Secret;
use crate::validation::validate_secret_name;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Cache-aware view over a [`RemoteSecretClient`].
///
/// Owns one cache store and shares the remote client; several decorators
/// (or undecorated callers) may hold the same client.
pub struct CachedSecretClient {
    client: Arc<RemoteSecretClient>,
    cache: SecretCache,
    flights: DashMap<String, Arc<Mutex<()>>>,
}

impl fmt::Debug for CachedSecretClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedSecretClient")
            .field("client", &self.client)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl CachedSecretClient {
    /// Wrap a remote client with a cache built from `config`.
    #[must_use]
    pub fn new(client: Arc<RemoteSecretClient>, config: &CacheConfig) -> Self {
        Self {
            client,
            cache: SecretCache::new(config),
            flights: DashMap::new(),
        }
    }

    /// The wrapped remote client.
    #[must_use]
    pub fn client(&self) -> &Arc<RemoteSecretClient> {
        &self.client
    }

    /// The owned cache store, for explicit invalidation by hosts.
    #[must_use]
    pub fn cache(&self) -> &SecretCache {
        &self.cache
    }

    /// Get a secret, consulting the cache first.
    ///
    /// With `ignore_cache == false` a live cache entry is returned without
    /// any network call. On a miss, or with `ignore_cache == true`, the
    /// remote client is dispatched and a successful result is stored in the
    /// cache before returning. A remote failure leaves any prior cache
    /// entry for the name untouched.
    ///
    /// # Errors
    /// Validation errors surface before any cache or network access, in
    /// both cache modes. Remote errors propagate unmasked; not-found is
    /// never cached.
    pub async fn get_secret(
        &self,
        name: &str,
        ignore_cache: bool,
    ) -> Result<Secret, SecretClientError> {
        validate_secret_name(name)?;

        if !ignore_cache {
            if let Some(secret) = self.cache.get(name) {
                debug!(secret.name = name, "cache hit");
                return Ok(secret);
            }
        }

        let flight = self.flight_lock(name);
        let guard = flight.lock().await;

        // A caller that held the flight lock before us may have refreshed
        // the entry while we waited; cached readers share that result
        // instead of issuing a duplicate fetch.
        if !ignore_cache {
            if let Some(secret) = self.cache.get(name) {
                debug!(secret.name = name, "cache refreshed while waiting");
                drop(guard);
                self.release_flight(name);
                return Ok(secret);
            }
        }

        let result = self.client.get_secret(name).await;
        if let Ok(secret) = &result {
            self.cache.put(name, secret.clone());
        }

        drop(guard);
        self.release_flight(name);
        result
    }

    /// Convenience projection of [`Self::get_secret`] returning just the
    /// value.
    ///
    /// # Errors
    /// Same as [`Self::get_secret`].
    pub async fn get_raw_secret_value(
        &self,
        name: &str,
        ignore_cache: bool,
    ) -> Result<String, SecretClientError> {
        let secret = self.get_secret(name, ignore_cache).await?;
        Ok(secret.value().to_string())
    }

    /// Store a secret. Always reaches the remote service; `ignore_cache`
    /// controls only whether the cache observes the new value.
    ///
    /// With `ignore_cache == false` the fresh secret is cached, so
    /// subsequent cache-using reads observe it immediately. With
    /// `ignore_cache == true` the cache is left untouched and any
    /// previously cached value stays visible until it expires.
    ///
    /// The write serializes behind the same per-name flight lock as miss
    /// fetches. A fetch that started before the store therefore finishes
    /// its cache update first, and a read issued after the store completes
    /// can never observe the fetch's older value.
    ///
    /// # Errors
    /// Validation errors (including [`SecretClientError::EmptySecretValue`])
    /// surface before any cache or network access, in both cache modes.
    pub async fn store_secret(
        &self,
        name: &str,
        value: &str,
        ignore_cache: bool,
    ) -> Result<Secret, SecretClientError> {
        validate_secret_name(name)?;
        if value.is_empty() {
            return Err(SecretClientError::EmptySecretValue);
        }

        let flight = self.flight_lock(name);
        let guard = flight.lock().await;

        let result = self.client.store_secret(name, value).await;
        if let Ok(secret) = &result {
            if !ignore_cache {
                self.cache.put(name, secret.clone());
            }
        }

        drop(guard);
        self.release_flight(name);
        result
    }

    fn flight_lock(&self, name: &str) -> Arc<Mutex<()>> {
        Arc::clone(&self.flights.entry(name.to_string()).or_default())
    }

    /// Drop the registry entry once nobody else is waiting on it, so the
    /// lock map tracks only names with active flights. Count 2 = the map's
    /// reference plus the releasing caller's still-live clone.
    fn release_flight(&self, name: &str) {
        self.flights
            .remove_if(name, |_, lock| Arc::strong_count(lock) <= 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_registry_sheds_idle_locks() {
        let client = Arc::new(crate::client::RemoteSecretClient::with_credential(
            crate::validation::VaultEndpoint::new("https://unit-vault.vault.azure.net").unwrap(),
            Arc::new(DummyCredential),
            Arc::new(DummyOps),
        ));
        let cached = CachedSecretClient::new(client, &CacheConfig::default());

        let flight = cached.flight_lock("db-password");
        assert_eq!(cached.flights.len(), 1);

        drop(flight);
        cached.release_flight("db-password");
        assert!(cached.flights.is_empty());
    }

    struct DummyCredential;
    impl crate::transport::VaultCredential for DummyCredential {}

    struct DummyOps;

    #[async_trait::async_trait]
    impl crate::transport::VaultOps for DummyOps {
        async fn fetch(
            &self,
            _vault: &crate::validation::VaultEndpoint,
            _name: &str,
        ) -> Result<Secret, crate::error::TransportError> {
            Ok(Secret::new("dummy"))
        }

        async fn upsert(
            &self,
            _vault: &crate::validation::VaultEndpoint,
            _name: &str,
            _value: &str,
        ) -> Result<Secret, crate::error::TransportError> {
            Ok(Secret::new("dummy"))
        }
    }
}
