//! Modern credential-bound transport.

use crate::transport::{VaultCredential, VaultOps};
use std::fmt;
use std::sync::Arc;

/// Transport strategy bound to a caller-supplied credential and a
/// pre-authenticated handle at construction.
///
/// There is no handshake step: the handle was built against the credential
/// by the host application and is ready for wire calls immediately.
pub struct SdkTransport {
    credential: Arc<dyn VaultCredential>,
    ops: Arc<dyn VaultOps>,
}

impl SdkTransport {
    /// Bind the strategy to a credential and its pre-authenticated handle.
    #[must_use]
    pub fn new(credential: Arc<dyn VaultCredential>, ops: Arc<dyn VaultOps>) -> Self {
        Self { credential, ops }
    }

    /// The credential this transport was bound to. Opaque to this crate.
    #[must_use]
    pub fn credential(&self) -> &Arc<dyn VaultCredential> {
        &self.credential
    }

    pub(crate) fn ops(&self) -> Arc<dyn VaultOps> {
        Arc::clone(&self.ops)
    }
}

impl fmt::Debug for SdkTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkTransport").finish_non_exhaustive()
    }
}
