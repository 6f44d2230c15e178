//! Engine-level read-only query surface.
//!
//! `apply_engine_query` is the single entry point for read queries. It goes
//! through a [`ReadService`] and never writes to the store directory.

#![allow(clippy::result_large_err)]

use rollcall_core::analytics::{RosterStats, StatusBreakdown};
use rollcall_core::diff::DiffSegment;
use rollcall_core::history::ReplayTarget;
use rollcall_core::model::RecordSet;
use rollcall_core::presence::{presence_tallies, PresenceTally};
use rollcall_core::{log_op_end, log_op_error, log_op_start};
use rollcall_store::errors::Result;
use serde::Serialize;

use crate::read_service::ReadService;

/// Read-only queries supported by the engine
#[derive(Debug, Clone)]
pub enum EngineQuery {
    /// Every recorded label, oldest first
    Labels,
    /// Roster reconstructed at a point in the history
    Replay { target: ReplayTarget },
    /// Segment between adjacent labels, optionally for one agency
    SegmentBetween {
        from: String,
        to: String,
        agency: Option<String>,
    },
    /// Labels recorded just before and after `label`
    Neighbors { label: String },
    /// Net-current presence across the whole log
    Presence,
    /// Per-identifier addition/removal counts
    PresenceTallies,
    /// Summary of the roster at a point plus compaction status
    Stats {
        target: ReplayTarget,
        status: Option<StatusQuery>,
    },
}

/// Status-focused counts requested alongside a stats query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusQuery {
    pub status: String,
    /// Agency substrings; empty skips the agency count
    pub agencies: Vec<String>,
    pub rank: Option<String>,
}

/// Roster summary with the store-level numbers the operator needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsReport {
    pub label: String,
    pub roster: RosterStats,
    pub segments: usize,
    pub rebase_due: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusBreakdown>,
}

#[derive(Debug, Clone)]
pub enum EngineQueryResult {
    Labels(Vec<String>),
    Roster(RecordSet),
    Segment(DiffSegment),
    Neighbors {
        previous: Option<String>,
        next: Option<String>,
    },
    Tallies(Vec<PresenceTally>),
    Stats(StatsReport),
}

/// Answer `query` from `service`
pub fn apply_engine_query(query: EngineQuery, service: &mut ReadService) -> Result<EngineQueryResult> {
    let op = query_name(&query);
    log_op_start!(op);
    let start = std::time::Instant::now();

    let result = apply_engine_query_impl(query, service).map_err(|e| {
        log_op_error!(op, e.clone(), duration_ms = start.elapsed().as_millis() as u64);
        e
    })?;

    log_op_end!(op, duration_ms = start.elapsed().as_millis() as u64);
    Ok(result)
}

fn query_name(query: &EngineQuery) -> &'static str {
    match query {
        EngineQuery::Labels => "labels",
        EngineQuery::Replay { .. } => "replay",
        EngineQuery::SegmentBetween { .. } => "segment_between",
        EngineQuery::Neighbors { .. } => "neighbors",
        EngineQuery::Presence => "current_presence",
        EngineQuery::PresenceTallies => "presence_tallies",
        EngineQuery::Stats { .. } => "stats",
    }
}

fn apply_engine_query_impl(query: EngineQuery, service: &mut ReadService) -> Result<EngineQueryResult> {
    match query {
        EngineQuery::Labels => Ok(EngineQueryResult::Labels(service.labels()?)),
        EngineQuery::Replay { target } => Ok(EngineQueryResult::Roster(service.replay(target)?)),
        EngineQuery::SegmentBetween { from, to, agency } => Ok(EngineQueryResult::Segment(
            service.segment_between(&from, &to, agency.as_deref())?,
        )),
        EngineQuery::Neighbors { label } => {
            let (previous, next) = service.neighbors(&label)?;
            Ok(EngineQueryResult::Neighbors { previous, next })
        }
        EngineQuery::Presence => Ok(EngineQueryResult::Roster(service.current_presence()?)),
        EngineQuery::PresenceTallies => {
            let store = service.store()?;
            Ok(EngineQueryResult::Tallies(presence_tallies(store.history())))
        }
        EngineQuery::Stats { target, status } => {
            let roster = service.replay(target.clone())?;
            let store = service.store()?;
            let index = store
                .history()
                .resolve(&target)
                .map_err(|e| rollcall_store::errors::domain_error("stats", e))?;
            Ok(EngineQueryResult::Stats(StatsReport {
                label: store.labels()[index].clone(),
                roster: RosterStats::of(&roster),
                segments: store.len(),
                rebase_due: store.config().rebase_due(store.len()),
                status: status.map(|q| {
                    let terms: Vec<&str> = q.agencies.iter().map(String::as_str).collect();
                    StatusBreakdown::of(&roster, &q.status, &terms, q.rank.as_deref())
                }),
            }))
        }
    }
}
