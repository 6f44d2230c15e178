//! Structured logging for every rollcall crate
//!
//! Binaries call [`init`] once with a [`Profile`]. Write operations are
//! bracketed by the `log_op_*` macros in the engine; lower layers emit plain
//! `tracing::debug!` events, and replay warns on duplicate merges. Tests
//! install [`init_test_capture`] instead of `init` and assert on what was
//! recorded.
//!
//! ```rust
//! use rollcall_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
