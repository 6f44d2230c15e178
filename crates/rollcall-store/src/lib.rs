//! Rollcall Store - directory persistence for roster histories
//!
//! Provides:
//! - The bit-exact directory layout (`_meta.txt`, root and segment files)
//! - Atomic temp→fsync→rename writes
//! - An advisory writer lock held across append and rebase
//! - Store configuration from `rollcall.toml`

pub mod config;
pub mod disk_store;
pub mod errors;
pub mod fs;
pub mod snapshot_file;

// Re-export key types
pub use config::StoreConfig;
pub use disk_store::DiskStore;
pub use errors::Result;
pub use snapshot_file::read_snapshot;
