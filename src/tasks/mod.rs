//! Background Tasks Module
//!
//! Contains background work that runs periodically while the process is up.
//!
//! # Tasks
//! - TTL Cleanup: Removes expired cache entries at configured intervals

mod cleanup;

pub use cleanup::{spawn_cleanup_task, CleanupHandle};
