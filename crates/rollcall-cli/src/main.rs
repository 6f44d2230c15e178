//! Rollcall CLI
//!
//! Command-line interface for roster history stores

use clap::{Parser, Subcommand, ValueEnum};
use rollcall_core::logging_facility::{init, Profile};

mod commands;

use commands::StoreContext;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    /// Human-readable lines on stderr
    Pretty,
    /// One JSON object per event on stderr
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "rollcall")]
#[command(about = "Rollcall - versioned-diff roster history", long_about = None)]
struct Cli {
    /// Store directory
    #[arg(long, global = true, default_value = ".")]
    dir: std::path::PathBuf,

    /// Configuration file (defaults to {dir}/rollcall.toml when present)
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    #[arg(long, global = true, value_enum, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create a store from its first snapshot
    Init(commands::init::InitArgs),
    /// Record a new snapshot as a diff segment
    Observe(commands::observe::ObserveArgs),
    /// Print the roster at a label
    Replay(commands::replay::ReplayArgs),
    /// Print the segment between two adjacent labels
    Segment(commands::segment::SegmentArgs),
    /// Print identifiers with balanced additions and removals
    Presence(commands::presence::PresenceArgs),
    /// Fold early segments into a new root
    Rebase(commands::rebase::RebaseArgs),
    /// List recorded labels
    Labels(commands::labels::LabelsArgs),
    /// Summarize the roster at a label
    Stats(commands::stats::StatsArgs),
}

fn main() {
    let cli = Cli::parse();

    init(match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let ctx = StoreContext::new(cli.dir, cli.config);
    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args, &ctx),
        Commands::Observe(args) => commands::observe::execute(args, &ctx),
        Commands::Replay(args) => commands::replay::execute(args, &ctx),
        Commands::Segment(args) => commands::segment::execute(args, &ctx),
        Commands::Presence(args) => commands::presence::execute(args, &ctx),
        Commands::Rebase(args) => commands::rebase::execute(args, &ctx),
        Commands::Labels(args) => commands::labels::execute(args, &ctx),
        Commands::Stats(args) => commands::stats::execute(args, &ctx),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
