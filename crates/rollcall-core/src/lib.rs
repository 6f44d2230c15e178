//! Rollcall Core - versioned-diff roster history kernel
//!
//! This crate provides the in-memory half of the roster history store:
//! - Record and RecordSet models with business-key set semantics
//! - The pure differ and tagged diff segments
//! - HistoryStore replay, slicing and append
//! - Cross-time presence aggregation and roster analytics
//! - The error facility and structured logging facility shared by every crate
//!
//! Persistence lives in `rollcall-store`.

pub mod analytics;
pub mod diff;
pub mod errors;
pub mod history;
pub mod logging_facility;
pub mod model;
pub mod presence;

// Re-export commonly used types
pub use analytics::{RosterStats, StatusBreakdown};
pub use diff::{diff, DiffMode, DiffRecord, DiffSegment};
pub use errors::{ExError, ExErrorKind, Result, RollcallError};
pub use history::{HistoryStore, ReplayReport, ReplayTarget};
pub use model::{Record, RecordSet, SchemaVersion};
pub use presence::{current_presence, presence_tallies, PresenceConfig, PresenceTally};
