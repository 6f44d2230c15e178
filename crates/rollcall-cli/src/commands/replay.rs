//! Replay command

use clap::Args;
use rollcall_engine::{apply_engine_query, EngineQuery, EngineQueryResult};

use super::{CliResult, StoreContext, TargetArgs};

#[derive(Debug, Args)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

pub fn execute(args: ReplayArgs, ctx: &StoreContext) -> CliResult {
    let mut service = ctx.read_service()?;
    let query = EngineQuery::Replay {
        target: args.target.target(),
    };
    if let EngineQueryResult::Roster(roster) = apply_engine_query(query, &mut service)? {
        print!("{}", roster.to_tsv());
    }
    Ok(())
}
