//! Filesystem primitives for the store directory

pub mod atomic;
pub mod layout;
pub mod lock;

pub use atomic::atomic_write;
pub use layout::StoreLayout;
pub use lock::WriterLock;
