//! Engine-level write commands against an open store.

#![allow(clippy::result_large_err)]

use rollcall_core::model::RecordSet;
use rollcall_store::errors::Result;
use rollcall_store::DiskStore;

use crate::commands::observation::{rebase_store, record_observation, ObservationOutcome};

/// Commands that change a store directory
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Diff a fresh snapshot against the newest state and append it
    RecordObservation { label: String, snapshot: RecordSet },
    /// Fold the first `n` segments into a new root
    Rebase { n: usize },
}

/// Result of applying an engine command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommandResult {
    Observation(ObservationOutcome),
    /// The store now starts at `root_label` and holds `labels` labels
    Rebased { root_label: String, labels: usize },
}

/// Apply `cmd` to `store`
///
/// A rebase replaces `store` with the handle re-opened from disk.
pub fn apply_engine_command(cmd: EngineCommand, store: &mut DiskStore) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::RecordObservation { label, snapshot } => {
            let outcome = record_observation(store, &label, &snapshot)?;
            Ok(EngineCommandResult::Observation(outcome))
        }
        EngineCommand::Rebase { n } => {
            *store = rebase_store(store, n)?;
            Ok(EngineCommandResult::Rebased {
                root_label: store.history().root_label().to_string(),
                labels: store.labels().len(),
            })
        }
    }
}
