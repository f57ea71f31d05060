//! Error types for cluster access.

use thiserror::Error;

/// Result type alias for cluster operations.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// A cluster operation failed.
///
/// A missing workload is reported as an ordinary API error; callers do not
/// distinguish it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClusterError {
    /// The API server rejected the request or could not be reached.
    #[error("{0}")]
    Api(String),

    /// The call did not complete within the request deadline.
    #[error("cluster request timed out")]
    Timeout,
}

impl From<kube::Error> for ClusterError {
    fn from(error: kube::Error) -> Self {
        Self::Api(error.to_string())
    }
}

/// An uploaded kubeconfig could not be turned into a cluster client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// The upload is not a parseable kubeconfig.
    #[error("{0}")]
    InvalidCredential(String),

    /// The kubeconfig parsed but does not resolve to a usable client
    /// configuration (no current context, unknown cluster, bad certificate
    /// data and so on).
    #[error("{0}")]
    ConnectionConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_underlying_cause() {
        assert_eq!(
            ClusterError::Api("deployments.apps \"web\" not found".into()).to_string(),
            "deployments.apps \"web\" not found"
        );
        assert_eq!(ClusterError::Timeout.to_string(), "cluster request timed out");
        assert_eq!(
            CredentialError::ConnectionConfig("current context not set".into()).to_string(),
            "current context not set"
        );
    }
}
