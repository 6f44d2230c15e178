//! Rollcall Engine - Orchestration layer
//!
//! Coordinates the core history model with the directory store: the
//! acquisition command that turns a fresh snapshot into a segment, and
//! the read service that answers queries through an explicit cache.

pub mod commands;
pub mod read_service;

pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use commands::engine_query::{
    apply_engine_query, EngineQuery, EngineQueryResult, StatsReport, StatusQuery,
};
pub use read_service::{ReadCache, ReadService};
