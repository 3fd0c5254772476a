//! Legacy authentication-flow transport.

use crate::error::TransportError;
use crate::transport::{VaultAuthenticator, VaultOps};
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Transport strategy that authenticates lazily through an injected
/// [`VaultAuthenticator`].
///
/// The authenticated handle is a mutate-once resource: the first caller
/// runs the handshake while concurrent callers wait for that attempt's
/// result instead of opening duplicate connections. The guard is scoped to
/// this instance, so unrelated clients never contend on it.
pub struct LegacyTransport {
    authenticator: Arc<dyn VaultAuthenticator>,
    handle: OnceCell<Arc<dyn VaultOps>>,
}

impl LegacyTransport {
    /// Bind the strategy to an authenticator. No network work happens here;
    /// the handshake runs on first use.
    #[must_use]
    pub fn new(authenticator: Arc<dyn VaultAuthenticator>) -> Self {
        Self {
            authenticator,
            handle: OnceCell::new(),
        }
    }

    /// The low-level authenticated handle, establishing it on first call.
    ///
    /// At most one handshake runs at a time; once one succeeds its handle is
    /// reused for the life of the client.
    ///
    /// # Errors
    /// Propagates the authenticator's failure. A failed handshake leaves the
    /// cell empty, so a later call may try again.
    pub async fn authenticated_ops(&self) -> Result<Arc<dyn VaultOps>, TransportError> {
        let ops = self
            .handle
            .get_or_try_init(|| async {
                debug!("establishing authenticated vault connection");
                self.authenticator.authenticate().await
            })
            .await?;
        Ok(Arc::clone(ops))
    }

    /// Whether the handshake has already completed.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.handle.initialized()
    }
}

impl fmt::Debug for LegacyTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyTransport")
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}
