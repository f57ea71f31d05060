//! # Kubeboard Cluster
//!
//! Cluster access for the dashboard, behind two seams:
//!
//! - [`CredentialValidator`] turns an uploaded kubeconfig into a client
//! - [`ClusterClient`] lists workloads and triggers restarts
//!
//! [`KubeconfigValidator`] and [`KubeCluster`] implement them with kube-rs.
//! Everything above this crate works with [`WorkloadSnapshot`]s and never
//! sees a Kubernetes API type.
//!
//! [`WorkloadSnapshot`]: kubeboard_core::WorkloadSnapshot

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod client;
pub mod convert;
pub mod error;
pub mod kubernetes;
pub mod validator;

pub use client::ClusterClient;
pub use convert::RESTARTED_AT_ANNOTATION;
pub use error::{ClusterError, CredentialError, Result};
pub use kubernetes::{KubeCluster, KubeconfigValidator};
pub use validator::{CredentialValidator, ValidatedCredential};
