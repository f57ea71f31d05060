//! Credential validation.

use crate::client::ClusterClient;
use crate::error::CredentialError;
use async_trait::async_trait;
use kubeboard_core::Credential;
use std::fmt;
use std::sync::Arc;

/// A credential that resolved into a live client.
#[derive(Clone)]
pub struct ValidatedCredential {
    /// Client bound to the credential.
    pub client: Arc<dyn ClusterClient>,

    /// User named by the credential's current context, empty when absent.
    pub username: String,
}

impl fmt::Debug for ValidatedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedCredential")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Turns uploaded credential bytes into a cluster client.
///
/// Validation performs no network I/O; the first live call made with the
/// returned client is what proves the cluster is reachable.
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    /// Validate `credential` and build a client for it.
    ///
    /// # Errors
    ///
    /// - [`CredentialError::InvalidCredential`] when the bytes do not parse
    /// - [`CredentialError::ConnectionConfig`] when the parsed configuration
    ///   cannot produce a client
    async fn validate(
        &self,
        credential: &Credential,
    ) -> Result<ValidatedCredential, CredentialError>;
}
