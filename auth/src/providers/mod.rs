//! Authentication providers.
//!
//! This module defines the traits the rest of the system depends on. Handlers
//! and the reaper only ever see `Arc<dyn SessionStore>`; the concrete store is
//! chosen at startup.
//!
//! ```text
//! ┌──────────────┐   create / lookup / invalidate   ┌────────────────────┐
//! │ HTTP handler │ ───────────────────────────────▶ │                    │
//! └──────────────┘                                  │   SessionStore     │
//! ┌──────────────┐   reap (every interval)          │  (lock-guarded)    │
//! │ SessionReaper│ ───────────────────────────────▶ │                    │
//! └──────────────┘                                  └────────────────────┘
//! ```

pub mod session;

pub use session::SessionStore;
