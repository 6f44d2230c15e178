//! Store configuration
//!
//! Read from `{dir}/rollcall.toml` or an explicit path. Every field is
//! optional; a missing file means defaults.

#![allow(clippy::result_large_err)]

use std::fs;
use std::path::Path;

use rollcall_core::presence::PresenceConfig;
use serde::{Deserialize, Serialize};

use crate::errors::{config_error, io_error, Result};
use crate::fs::layout::StoreLayout;

fn default_rebase_threshold() -> usize {
    365
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Agency substring preferred when presence picks among candidates
    #[serde(default)]
    pub preferred_agency: String,
    /// Segment count past which compaction is reported as due
    #[serde(default = "default_rebase_threshold")]
    pub rebase_threshold: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            preferred_agency: String::new(),
            rebase_threshold: default_rebase_threshold(),
        }
    }
}

impl StoreConfig {
    /// Parse a TOML document
    ///
    /// # Errors
    ///
    /// Returns `Config` for malformed TOML or unknown keys.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|e| config_error(origin, e.to_string()))
    }

    /// Load configuration from `path`
    ///
    /// # Errors
    ///
    /// Returns `NotFound`/`Io` if the file cannot be read and `Config` if it
    /// cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| io_error("load_config", path, e))?;
        Self::from_toml(&text, path)
    }

    /// Load `{dir}/rollcall.toml`, falling back to defaults when absent
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file exists but cannot be parsed.
    pub fn load_for_dir(dir: &Path) -> Result<Self> {
        let path = StoreLayout::new(dir).config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn presence(&self) -> PresenceConfig {
        PresenceConfig {
            preferred_agency: self.preferred_agency.clone(),
        }
    }

    /// Whether a history with `segments` segments should be compacted
    pub fn rebase_due(&self, segments: usize) -> bool {
        segments >= self.rebase_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::errors::ExErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = StoreConfig::from_toml("", Path::new("rollcall.toml")).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.rebase_threshold, 365);
    }

    #[test]
    fn test_fields_are_read() {
        let config = StoreConfig::from_toml(
            "preferred_agency = \"Police Bureau\"\nrebase_threshold = 30\n",
            Path::new("rollcall.toml"),
        )
        .unwrap();
        assert_eq!(config.presence().preferred_agency, "Police Bureau");
        assert!(config.rebase_due(30));
        assert!(!config.rebase_due(29));
    }

    #[test]
    fn test_archive_metadata_key_is_rejected() {
        // Rebase always archives _meta.txt, so there is nothing to switch off
        let err = StoreConfig::from_toml("archive_metadata = false\n", Path::new("x.toml"))
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Config);
    }

    #[test]
    fn test_unknown_key_is_config_error() {
        let err = StoreConfig::from_toml("rebase_treshold = 3\n", Path::new("x.toml")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Config);
    }

    #[test]
    fn test_missing_file_in_dir_means_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = StoreConfig::load_for_dir(temp_dir.path()).unwrap();
        assert_eq!(config, StoreConfig::default());
    }
}
