//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (wall clock for leaderboard timestamps)
//! - Input (DOM key names to gameplay keys)
//! - Storage (LocalStorage on web, JSON file on native)

pub mod input;
pub mod storage;

pub use input::key_from_name;
#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStore;
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
pub use storage::{KeyValueStore, MemoryStore};

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or_default()
}
