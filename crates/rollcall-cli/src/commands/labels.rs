//! Label listing command

use clap::Args;
use rollcall_engine::{apply_engine_query, EngineQuery, EngineQueryResult};

use super::{CliResult, StoreContext};

#[derive(Debug, Args)]
pub struct LabelsArgs {
    /// Print the labels recorded just before and after this one
    #[arg(long)]
    pub around: Option<String>,
}

pub fn execute(args: LabelsArgs, ctx: &StoreContext) -> CliResult {
    let mut service = ctx.read_service()?;

    let query = match args.around {
        Some(label) => EngineQuery::Neighbors { label },
        None => EngineQuery::Labels,
    };
    match apply_engine_query(query, &mut service)? {
        EngineQueryResult::Labels(labels) => {
            for label in labels {
                println!("{}", label);
            }
        }
        EngineQueryResult::Neighbors { previous, next } => {
            println!("previous: {}", previous.as_deref().unwrap_or("-"));
            println!("next: {}", next.as_deref().unwrap_or("-"));
        }
        _ => {}
    }
    Ok(())
}
