//! Storage implementations for the auth system.
//!
//! - **Session Store** (in-memory) - process-local session map with lazy and
//!   periodic expiry

pub mod session_memory;

// Re-exports
pub use session_memory::InMemorySessionStore;
