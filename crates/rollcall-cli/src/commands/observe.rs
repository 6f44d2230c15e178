//! Observation command

use std::path::PathBuf;

use clap::Args;
use rollcall_engine::commands::observation::ObservationOutcome;
use rollcall_engine::{apply_engine_command, EngineCommand, EngineCommandResult};
use rollcall_store::read_snapshot;

use super::{CliResult, StoreContext};

#[derive(Debug, Args)]
pub struct ObserveArgs {
    /// Label of this observation; must sort after the newest label
    #[arg(long)]
    pub label: String,

    /// TSV snapshot file
    #[arg(long)]
    pub snapshot: PathBuf,
}

pub fn execute(args: ObserveArgs, ctx: &StoreContext) -> CliResult {
    let snapshot = read_snapshot(&args.snapshot)?;
    let mut store = ctx.open_store()?;

    let cmd = EngineCommand::RecordObservation {
        label: args.label,
        snapshot,
    };
    match apply_engine_command(cmd, &mut store)? {
        EngineCommandResult::Observation(ObservationOutcome::Recorded(r)) => {
            println!("Recorded {} -> {}:", r.previous_label, r.label);
            println!("  removed: {}", r.removed);
            println!("  added: {}", r.added);
        }
        EngineCommandResult::Observation(ObservationOutcome::AlreadyRecorded { label }) => {
            println!("Already recorded: {}", label);
        }
        EngineCommandResult::Rebased { .. } => {}
    }
    Ok(())
}
