//! HTTP handlers.
//!
//! - [`session`]: kubeconfig upload, session check, logout
//! - [`workloads`]: namespace and workload listings, restarts

pub mod session;
pub mod workloads;
