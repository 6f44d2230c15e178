//! Subcommand handlers

pub mod init;
pub mod labels;
pub mod observe;
pub mod presence;
pub mod rebase;
pub mod replay;
pub mod segment;
pub mod stats;

use std::path::PathBuf;

use clap::Args;
use rollcall_core::history::ReplayTarget;
use rollcall_engine::{ReadCache, ReadService};
use rollcall_store::{DiskStore, StoreConfig};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Store directory and configuration shared by every subcommand
#[derive(Debug)]
pub struct StoreContext {
    pub dir: PathBuf,
    config_path: Option<PathBuf>,
}

impl StoreContext {
    pub fn new(dir: PathBuf, config_path: Option<PathBuf>) -> Self {
        Self { dir, config_path }
    }

    /// `--config` when given, else `{dir}/rollcall.toml`, else defaults
    pub fn config(&self) -> Result<StoreConfig, Box<dyn std::error::Error>> {
        Ok(match &self.config_path {
            Some(path) => StoreConfig::load(path)?,
            None => StoreConfig::load_for_dir(&self.dir)?,
        })
    }

    pub fn open_store(&self) -> Result<DiskStore, Box<dyn std::error::Error>> {
        Ok(DiskStore::open_with_config(&self.dir, self.config()?)?)
    }

    pub fn read_service(&self) -> Result<ReadService, Box<dyn std::error::Error>> {
        Ok(ReadService::with_config(
            &self.dir,
            self.config()?,
            ReadCache::new(),
        ))
    }
}

/// `--label` / `--index` selection of a point in the history
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Label to address (defaults to the newest)
    #[arg(long, conflicts_with = "index")]
    pub label: Option<String>,

    /// Label index, 0 being the root
    #[arg(long, conflicts_with = "label")]
    pub index: Option<usize>,
}

impl TargetArgs {
    pub fn target(&self) -> ReplayTarget {
        match (&self.label, self.index) {
            (Some(label), _) => ReplayTarget::Label(label.clone()),
            (None, Some(index)) => ReplayTarget::Index(index),
            (None, None) => ReplayTarget::Latest,
        }
    }
}
