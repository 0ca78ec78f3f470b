//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, a JSON file on native)
//! - Pointer input (mouse and touch drags)

pub mod input;
pub mod storage;

pub use input::PointerDrag;
pub use storage::{MemoryStorage, Storage};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
