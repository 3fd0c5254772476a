//! Shared test doubles for the integration suites.
//!
//! `MockVault` is a counting in-memory stand-in for the wire transport:
//! every fetch/upsert increments a counter so tests can assert exactly how
//! many calls reached the "network", and it can be switched into a failure
//! mode that answers every call with a fixed HTTP-equivalent status.

#![allow(dead_code, reason = "shared across test binaries")]

use async_trait::async_trait;
use keyvault_secret_client::error::TransportError;
use keyvault_secret_client::transport::{VaultAuthenticator, VaultCredential, VaultOps};
use keyvault_secret_client::{RemoteSecretClient, Secret, VaultEndpoint};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Opt-in log output for debugging timing-sensitive tests, driven by
/// `RUST_LOG`. Safe to call from multiple tests in one binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn test_endpoint() -> VaultEndpoint {
    VaultEndpoint::new("https://test-vault.vault.azure.net").expect("valid test endpoint")
}

/// In-memory vault transport with call counting and failure injection.
#[derive(Default)]
pub struct MockVault {
    secrets: Mutex<HashMap<String, (String, u32)>>,
    get_calls: AtomicUsize,
    store_calls: AtomicUsize,
    fail_status: Mutex<Option<u16>>,
    call_delay: Mutex<Option<Duration>>,
}

impl MockVault {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Pre-populate a secret without touching the call counters.
    pub fn seed(&self, name: &str, value: &str) {
        let mut secrets = self.secrets.lock().expect("mock vault lock");
        let revision = secrets.get(name).map_or(1, |(_, rev)| rev + 1);
        secrets.insert(name.to_string(), (value.to_string(), revision));
    }

    /// Answer every subsequent call with the given status.
    pub fn fail_with_status(&self, status: u16) {
        *self.fail_status.lock().expect("mock vault lock") = Some(status);
    }

    /// Restore normal behavior.
    pub fn clear_failure(&self) {
        *self.fail_status.lock().expect("mock vault lock") = None;
    }

    /// Delay every call, to widen concurrency windows.
    pub fn set_call_delay(&self, delay: Duration) {
        *self.call_delay.lock().expect("mock vault lock") = Some(delay);
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        let delay = *self.call_delay.lock().expect("mock vault lock");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn injected_failure(&self) -> Option<TransportError> {
        self.fail_status
            .lock()
            .expect("mock vault lock")
            .map(|status| {
                TransportError::with_status(status, anyhow::anyhow!("injected status {status}"))
            })
    }
}

#[async_trait]
impl VaultOps for MockVault {
    async fn fetch(&self, _vault: &VaultEndpoint, name: &str) -> Result<Secret, TransportError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);

        // Snapshot before the simulated latency: a slow response carries the
        // value as of when the request reached the vault.
        let response = if let Some(err) = self.injected_failure() {
            Err(err)
        } else {
            let secrets = self.secrets.lock().expect("mock vault lock");
            match secrets.get(name) {
                Some((value, revision)) => {
                    Ok(Secret::new(value.clone()).with_version(format!("rev-{revision}")))
                }
                None => Err(TransportError::with_status(
                    404,
                    anyhow::anyhow!("SecretNotFound: {name}"),
                )),
            }
        };

        self.simulate_latency().await;
        response
    }

    async fn upsert(
        &self,
        _vault: &VaultEndpoint,
        name: &str,
        value: &str,
    ) -> Result<Secret, TransportError> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if let Some(err) = self.injected_failure() {
            return Err(err);
        }

        let mut secrets = self.secrets.lock().expect("mock vault lock");
        let revision = secrets.get(name).map_or(1, |(_, rev)| rev + 1);
        secrets.insert(name.to_string(), (value.to_string(), revision));
        Ok(Secret::new(value.to_string()).with_version(format!("rev-{revision}")))
    }
}

/// Counting authenticator for the legacy strategy.
pub struct MockAuthenticator {
    ops: Arc<MockVault>,
    auth_calls: AtomicUsize,
    handshake_delay: Option<Duration>,
    fail: Mutex<bool>,
}

impl MockAuthenticator {
    pub fn new(ops: Arc<MockVault>) -> Arc<Self> {
        Arc::new(Self {
            ops,
            auth_calls: AtomicUsize::new(0),
            handshake_delay: None,
            fail: Mutex::new(false),
        })
    }

    pub fn with_handshake_delay(ops: Arc<MockVault>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            ops,
            auth_calls: AtomicUsize::new(0),
            handshake_delay: Some(delay),
            fail: Mutex::new(false),
        })
    }

    pub fn fail_next(&self) {
        *self.fail.lock().expect("mock auth lock") = true;
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VaultAuthenticator for MockAuthenticator {
    async fn authenticate(&self) -> Result<Arc<dyn VaultOps>, TransportError> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.handshake_delay {
            tokio::time::sleep(delay).await;
        }
        let mut fail = self.fail.lock().expect("mock auth lock");
        if *fail {
            *fail = false;
            return Err(TransportError::other(anyhow::anyhow!(
                "authentication handshake rejected"
            )));
        }
        Ok(Arc::clone(&self.ops) as Arc<dyn VaultOps>)
    }
}

/// Opaque credential stand-in for the SDK strategy.
pub struct MockCredential;

impl VaultCredential for MockCredential {}

/// SDK-mode client over a mock vault.
pub fn sdk_client(vault: &Arc<MockVault>) -> RemoteSecretClient {
    RemoteSecretClient::with_credential(
        test_endpoint(),
        Arc::new(MockCredential),
        Arc::clone(vault) as Arc<dyn VaultOps>,
    )
}

/// Legacy-mode client over a mock vault.
pub fn legacy_client(vault: &Arc<MockVault>) -> (RemoteSecretClient, Arc<MockAuthenticator>) {
    let authenticator = MockAuthenticator::new(Arc::clone(vault));
    let client = RemoteSecretClient::with_authenticator(
        test_endpoint(),
        Arc::clone(&authenticator) as Arc<dyn VaultAuthenticator>,
    );
    (client, authenticator)
}
