//! Uploaded cluster credential.

use std::fmt;
use std::sync::Arc;

/// Raw bytes of an uploaded kubeconfig.
///
/// The blob is shared rather than copied: every request re-validates the
/// credential held by its session, so clones must be cheap. `Debug` never
/// prints the content.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Arc<[u8]>);

impl Credential {
    /// Wrap uploaded bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    /// Borrow the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes in the credential.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the upload was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Credential {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&str> for Credential {
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}
