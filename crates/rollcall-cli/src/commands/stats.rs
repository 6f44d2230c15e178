//! Roster statistics command

use clap::Args;
use rollcall_engine::{apply_engine_query, EngineQuery, EngineQueryResult, StatusQuery};

use super::{CliResult, StoreContext, TargetArgs};

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Also count records with this status (case-insensitive)
    #[arg(long)]
    pub status: Option<String>,

    /// Agency substring for the status count; repeatable
    #[arg(long = "agency", requires = "status")]
    pub agencies: Vec<String>,

    /// Rank for the status count
    #[arg(long, requires = "status")]
    pub rank: Option<String>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: StatsArgs, ctx: &StoreContext) -> CliResult {
    let mut service = ctx.read_service()?;
    let status = args.status.map(|status| StatusQuery {
        status,
        agencies: args.agencies,
        rank: args.rank,
    });
    let query = EngineQuery::Stats {
        target: args.target.target(),
        status,
    };
    let EngineQueryResult::Stats(report) = apply_engine_query(query, &mut service)? else {
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Roster at {}:", report.label);
    println!("  total: {}", report.roster.total);
    println!("  agencies: {}", report.roster.agencies);
    for (status, count) in &report.roster.by_status {
        let status = if status.is_empty() { "(none)" } else { status };
        println!("  status {}: {}", status, count);
    }
    if let Some(breakdown) = &report.status {
        println!("  {} names: {}", breakdown.status, breakdown.distinct_names);
        if let Some(n) = breakdown.in_agencies {
            println!("  {} in agencies: {}", breakdown.status, n);
        }
        if let Some(n) = breakdown.with_rank {
            println!("  {} with rank: {}", breakdown.status, n);
        }
    }
    println!("  segments: {}", report.segments);
    if report.rebase_due {
        println!("  rebase due: segment count reached the configured threshold");
    }
    Ok(())
}
