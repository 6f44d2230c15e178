//! Store creation command

use std::path::PathBuf;

use clap::Args;
use rollcall_engine::commands::observation::init_store;
use rollcall_store::read_snapshot;

use super::{CliResult, StoreContext};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Label of the first snapshot, e.g. a YYYYMMDD date code
    #[arg(long)]
    pub label: String,

    /// TSV snapshot file
    #[arg(long)]
    pub snapshot: PathBuf,
}

pub fn execute(args: InitArgs, ctx: &StoreContext) -> CliResult {
    let snapshot = read_snapshot(&args.snapshot)?;
    let store = init_store(&ctx.dir, &args.label, &snapshot)?;
    println!(
        "Initialized store at {} with {} records under {}",
        store.dir().display(),
        snapshot.len(),
        args.label
    );
    Ok(())
}
