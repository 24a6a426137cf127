//! State module for tracking crawl progress
//!
//! The only per-address state this crate knows about is the marker kept in
//! the shared lock store.
//!
//! # Components
//!
//! - `LockState`: Progress marker of an address (free, locked, done, failed)

mod lock_state;

// Re-export main types
pub use lock_state::LockState;
