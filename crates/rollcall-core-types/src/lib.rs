//! Core types shared across Rollcall facilities
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Correlation types**: CycleId, tagging every event of one acquisition or maintenance cycle
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::CycleId;
