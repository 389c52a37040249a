//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Timers (countdown interval, deferred advance)
//! - Storage (sessionStorage on web, in-memory on native)

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Settings backend for the current platform
#[cfg(target_arch = "wasm32")]
pub type SessionBackend = web::SessionStorage;

#[cfg(not(target_arch = "wasm32"))]
pub type SessionBackend = crate::persistence::MemoryStore;

/// Open the session-scoped settings backend
pub fn session_backend() -> SessionBackend {
    SessionBackend::new()
}
