//! Acquisition command handlers with boundary logging.
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for write operations:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` and the
//! duplicate-merge warning.

#![allow(clippy::result_large_err)]

use std::path::Path;

use rollcall_core::diff::diff;
use rollcall_core::history::ReplayTarget;
use rollcall_core::model::RecordSet;
use rollcall_core::{log_op_end, log_op_error, log_op_start};
use rollcall_core_types::CycleId;
use rollcall_store::errors::Result;
use rollcall_store::DiskStore;

/// What a recorded observation changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationResult {
    pub label: String,
    pub previous_label: String,
    pub removed: usize,
    pub added: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservationOutcome {
    /// A new segment was appended
    Recorded(ObservationResult),
    /// The label equals the newest recorded label; nothing was written
    AlreadyRecorded { label: String },
}

/// Create a store in `dir` from its first snapshot
///
/// ## Errors
///
/// - `InvalidInput`: malformed label
/// - `AlreadyExists`: `dir` already holds a store
/// - `Io`: files cannot be written
pub fn init_store(dir: &Path, label: &str, snapshot: &RecordSet) -> Result<DiskStore> {
    let cycle_id = CycleId::new();
    log_op_start!("init_store", label = label, cycle_id = cycle_id.as_str());
    let start = std::time::Instant::now();

    let store = DiskStore::init(dir, label, snapshot).map_err(|e| {
        let e = e.with_cycle_id(cycle_id.clone());
        log_op_error!(
            "init_store",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            cycle_id = cycle_id.as_str()
        );
        e
    })?;

    log_op_end!(
        "init_store",
        duration_ms = start.elapsed().as_millis() as u64,
        cycle_id = cycle_id.as_str(),
        record_count = snapshot.len() as u64
    );
    Ok(store)
}

/// Diff `snapshot` against the newest state and append the result at `label`
///
/// Recording the newest label again is a no-op reported as
/// [`ObservationOutcome::AlreadyRecorded`], so a rerun of the daily job
/// for the same day is harmless.
///
/// ## Errors
///
/// - `InvalidInput`: label malformed or not sorting after the newest label
/// - `AlreadyExists`: label matches an older recorded label
/// - `Concurrency`: another writer holds the lock or the store is stale
/// - `Io`: segment or metadata cannot be written
pub fn record_observation(
    store: &mut DiskStore,
    label: &str,
    snapshot: &RecordSet,
) -> Result<ObservationOutcome> {
    let cycle_id = CycleId::new();
    log_op_start!(
        "record_observation",
        label = label,
        cycle_id = cycle_id.as_str()
    );
    let start = std::time::Instant::now();

    let outcome = record_observation_impl(store, label, snapshot).map_err(|e| {
        let e = e.with_cycle_id(cycle_id.clone());
        log_op_error!(
            "record_observation",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            cycle_id = cycle_id.as_str()
        );
        e
    })?;

    match &outcome {
        ObservationOutcome::Recorded(result) => {
            log_op_end!(
                "record_observation",
                duration_ms = start.elapsed().as_millis() as u64,
                cycle_id = cycle_id.as_str(),
                removed_len = result.removed as u64,
                added_len = result.added as u64
            );
        }
        ObservationOutcome::AlreadyRecorded { .. } => {
            log_op_end!(
                "record_observation",
                duration_ms = start.elapsed().as_millis() as u64,
                cycle_id = cycle_id.as_str(),
                already_recorded = true
            );
        }
    }
    Ok(outcome)
}

fn record_observation_impl(
    store: &mut DiskStore,
    label: &str,
    snapshot: &RecordSet,
) -> Result<ObservationOutcome> {
    let previous_label = store.history().latest_label().to_string();
    if previous_label == label {
        return Ok(ObservationOutcome::AlreadyRecorded {
            label: label.to_string(),
        });
    }

    let current = store.replay(ReplayTarget::Latest)?;
    let (removed, added) = diff(&current, snapshot);
    store.append_segment(label, &removed, &added)?;

    Ok(ObservationOutcome::Recorded(ObservationResult {
        label: label.to_string(),
        previous_label,
        removed: removed.len(),
        added: added.len(),
    }))
}

/// Fold the first `n` segments into a new root
///
/// ## Errors
///
/// - `Range`: `n` past the newest label
/// - `Concurrency`: another writer holds the lock or the store is stale
/// - `Io`: files cannot be written
pub fn rebase_store(store: &DiskStore, n: usize) -> Result<DiskStore> {
    let cycle_id = CycleId::new();
    log_op_start!("rebase", segment_index = n as u64, cycle_id = cycle_id.as_str());
    let start = std::time::Instant::now();

    let rebased = store.rebase(n).map_err(|e| {
        let e = e.with_cycle_id(cycle_id.clone());
        log_op_error!(
            "rebase",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            cycle_id = cycle_id.as_str()
        );
        e
    })?;

    log_op_end!(
        "rebase",
        duration_ms = start.elapsed().as_millis() as u64,
        cycle_id = cycle_id.as_str(),
        label = rebased.history().root_label()
    );
    Ok(rebased)
}
