//! Segment command

use clap::Args;
use rollcall_engine::{apply_engine_query, EngineQuery, EngineQueryResult};

use super::{CliResult, StoreContext};

#[derive(Debug, Args)]
pub struct SegmentArgs {
    #[arg(long)]
    pub from: String,

    #[arg(long)]
    pub to: String,

    /// Only entries whose agency contains this text
    #[arg(long)]
    pub agency: Option<String>,
}

pub fn execute(args: SegmentArgs, ctx: &StoreContext) -> CliResult {
    let mut service = ctx.read_service()?;
    let query = EngineQuery::SegmentBetween {
        from: args.from,
        to: args.to,
        agency: args.agency,
    };
    if let EngineQueryResult::Segment(segment) = apply_engine_query(query, &mut service)? {
        print!("{}", segment.to_tsv());
    }
    Ok(())
}
