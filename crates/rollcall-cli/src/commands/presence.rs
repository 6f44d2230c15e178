//! Presence command

use clap::Args;
use rollcall_engine::{apply_engine_query, EngineQuery, EngineQueryResult, ReadCache, ReadService};

use super::{CliResult, StoreContext};

#[derive(Debug, Args)]
pub struct PresenceArgs {
    /// Prefer candidates whose agency contains this text (overrides config)
    #[arg(long)]
    pub preferred_agency: Option<String>,

    /// Print per-identifier tallies instead of records
    #[arg(long)]
    pub tallies: bool,
}

pub fn execute(args: PresenceArgs, ctx: &StoreContext) -> CliResult {
    let mut config = ctx.config()?;
    if let Some(agency) = args.preferred_agency {
        config.preferred_agency = agency;
    }
    let mut service = ReadService::with_config(&ctx.dir, config, ReadCache::new());

    if args.tallies {
        if let EngineQueryResult::Tallies(tallies) =
            apply_engine_query(EngineQuery::PresenceTallies, &mut service)?
        {
            for t in tallies {
                println!("{}\t+{}\t-{}", t.id, t.additions, t.removals);
            }
        }
        return Ok(());
    }

    if let EngineQueryResult::Roster(present) =
        apply_engine_query(EngineQuery::Presence, &mut service)?
    {
        print!("{}", present.to_tsv());
    }
    Ok(())
}
