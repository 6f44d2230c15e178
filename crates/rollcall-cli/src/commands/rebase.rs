//! Rebase command

use clap::Args;
use rollcall_engine::{apply_engine_command, EngineCommand, EngineCommandResult};

use super::{CliResult, StoreContext};

#[derive(Debug, Args)]
pub struct RebaseArgs {
    /// Index of the label that becomes the new root
    #[arg(long, conflicts_with = "label")]
    pub index: Option<usize>,

    /// Label that becomes the new root
    #[arg(long, conflicts_with = "index")]
    pub label: Option<String>,
}

pub fn execute(args: RebaseArgs, ctx: &StoreContext) -> CliResult {
    let mut store = ctx.open_store()?;

    let n = match (args.index, &args.label) {
        (Some(index), _) => index,
        (None, Some(label)) => store.history().resolve_label(label)?,
        (None, None) => return Err("Must specify either --index or --label".into()),
    };

    if let EngineCommandResult::Rebased { root_label, labels } =
        apply_engine_command(EngineCommand::Rebase { n }, &mut store)?
    {
        println!("Rebased: root is now {} ({} labels)", root_label, labels);
    }
    Ok(())
}
