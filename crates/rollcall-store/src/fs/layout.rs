//! On-disk directory layout
//!
//! ```text
//! {dir}/_meta.txt                         labels, one per line
//! {dir}/{labels[0]}.tsv                   root snapshot
//! {dir}/{labels[i]}-{labels[i+1]}.tsv     segment i
//! {dir}/_lock                             advisory writer lock
//! {dir}/_meta.{stamp}.archived.txt        metadata before a rebase
//! {dir}/{label}.tsv.{stamp}.orig          root file moved aside by a rebase
//! {dir}/rollcall.toml                     optional store configuration
//! ```

use std::path::{Path, PathBuf};

use rollcall_core::model::label::{root_file_name, segment_file_name};

pub const META_FILE: &str = "_meta.txt";
pub const LOCK_FILE: &str = "_lock";
pub const CONFIG_FILE: &str = "rollcall.toml";

/// Paths of every file a store directory may hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    dir: PathBuf,
}

impl StoreLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn meta_path(&self) -> PathBuf {
        self.dir.join(META_FILE)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.dir.join(LOCK_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn root_path(&self, label: &str) -> PathBuf {
        self.dir.join(root_file_name(label))
    }

    pub fn segment_path(&self, from: &str, to: &str) -> PathBuf {
        self.dir.join(segment_file_name(from, to))
    }

    /// Archive destination for the metadata index; `attempt > 0` disambiguates
    /// archives taken within the same second
    pub fn archived_meta_path(&self, stamp: &str, attempt: usize) -> PathBuf {
        if attempt == 0 {
            self.dir.join(format!("_meta.{}.archived.txt", stamp))
        } else {
            self.dir
                .join(format!("_meta.{}.{}.archived.txt", stamp, attempt))
        }
    }

    pub fn moved_root_path(&self, label: &str, stamp: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}.orig", root_file_name(label), stamp))
    }
}

/// Render labels as the metadata index file
pub fn render_meta(labels: &[String]) -> String {
    let mut out = String::new();
    for label in labels {
        out.push_str(label);
        out.push('\n');
    }
    out
}

/// Labels listed in a metadata index, each trimmed, blank lines skipped
pub fn parse_meta(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Timestamp used in archive and moved-aside file names
pub fn file_stamp() -> String {
    chrono::Local::now().format("%Y%m%dT%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_follow_naming_scheme() {
        let layout = StoreLayout::new("/data");
        assert_eq!(layout.meta_path(), PathBuf::from("/data/_meta.txt"));
        assert_eq!(layout.root_path("L0"), PathBuf::from("/data/L0.tsv"));
        assert_eq!(
            layout.segment_path("L0", "L1"),
            PathBuf::from("/data/L0-L1.tsv")
        );
        assert_eq!(
            layout.archived_meta_path("20240101T120000", 0),
            PathBuf::from("/data/_meta.20240101T120000.archived.txt")
        );
        assert_eq!(
            layout.moved_root_path("L1", "20240101T120000"),
            PathBuf::from("/data/L1.tsv.20240101T120000.orig")
        );
    }

    #[test]
    fn test_meta_round_trip_skips_blank_lines() {
        let labels = vec!["L0".to_string(), "L1".to_string()];
        assert_eq!(parse_meta(&render_meta(&labels)), labels);
        assert_eq!(parse_meta("L0\r\n\nL1\n"), labels);
    }

    #[test]
    fn test_meta_labels_are_trimmed() {
        assert_eq!(parse_meta("  L0 \nL1\t\r\n \n"), vec!["L0", "L1"]);
    }

    #[test]
    fn test_file_stamp_shape() {
        let stamp = file_stamp();
        assert_eq!(stamp.len(), 15);
        assert_eq!(stamp.chars().nth(8), Some('T'));
    }
}
