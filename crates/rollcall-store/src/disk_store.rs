//! Directory-backed roster history
//!
//! A [`DiskStore`] is an in-memory [`HistoryStore`] loaded from a store
//! directory plus the write path back to it. Writers hold the advisory
//! lock for the whole of `append_segment` and `rebase`; segment and root
//! files are written before `_meta.txt` is atomically replaced, so readers
//! that trust only `_meta.txt` never observe a half-written transition.

#![allow(clippy::result_large_err)]

use std::fs;
use std::path::{Path, PathBuf};

use rollcall_core::diff::DiffSegment;
use rollcall_core::errors::RollcallError;
use rollcall_core::history::{HistoryStore, ReplayTarget};
use rollcall_core::model::{check_successor, validate_label, RecordSet};
use rollcall_core::presence::current_presence;

use crate::config::StoreConfig;
use crate::errors::{
    domain_error, empty_metadata, in_file, io_error, stale_store, store_exists, Result,
};
use crate::fs::layout::{file_stamp, parse_meta, render_meta};
use crate::fs::{atomic_write, StoreLayout, WriterLock};

/// A roster history persisted in one directory
#[derive(Debug, Clone)]
pub struct DiskStore {
    layout: StoreLayout,
    history: HistoryStore,
    config: StoreConfig,
}

impl DiskStore {
    /// Create a new store in `dir` whose root is `snapshot` at `label`
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: malformed label
    /// - `AlreadyExists`: `dir` already holds `_meta.txt`
    /// - `Concurrency`: another writer holds the lock
    /// - `Io`: files cannot be written
    pub fn init(dir: impl Into<PathBuf>, label: &str, snapshot: &RecordSet) -> Result<Self> {
        let layout = StoreLayout::new(dir);
        validate_label(label).map_err(|e| domain_error("init", e))?;
        fs::create_dir_all(layout.dir()).map_err(|e| io_error("init", layout.dir(), e))?;

        let lock = WriterLock::acquire(&layout)?;
        if layout.meta_path().exists() {
            return Err(store_exists(layout.dir()));
        }

        atomic_write(&layout.root_path(label), snapshot.to_tsv().as_bytes())?;
        atomic_write(&layout.meta_path(), render_meta(&[label.to_string()]).as_bytes())?;
        drop(lock);

        tracing::debug!(
            store_dir = %layout.dir().display(),
            label = label,
            record_count = snapshot.len() as u64,
            "initialized store"
        );

        Self::open(layout.dir())
    }

    /// Load the store in `dir`, with configuration from `{dir}/rollcall.toml`
    ///
    /// Only labels listed in `_meta.txt` are loaded; stray segment files
    /// left by an interrupted writer are ignored.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no `_meta.txt`, or a file it implies is missing
    /// - `Parse`: malformed record or segment line (with path and line)
    /// - `Config`: unparsable `rollcall.toml`
    /// - `InvalidInput` / `AlreadyExists`: labels out of order or duplicated
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let config = StoreConfig::load_for_dir(dir.as_ref())?;
        Self::open_with_config(dir, config)
    }

    /// Load the store in `dir` with an explicit configuration
    ///
    /// # Errors
    ///
    /// See [`open`](Self::open).
    pub fn open_with_config(dir: impl AsRef<Path>, config: StoreConfig) -> Result<Self> {
        let layout = StoreLayout::new(dir.as_ref());
        let labels = read_labels(&layout)?;

        let root_path = layout.root_path(&labels[0]);
        let root = RecordSet::parse_merged(&read_text("load_root", &root_path)?)
            .map_err(|e| in_file("load_root", &root_path, e))?;

        let mut segments = Vec::with_capacity(labels.len() - 1);
        for pair in labels.windows(2) {
            let path = layout.segment_path(&pair[0], &pair[1]);
            let segment = DiffSegment::parse(&read_text("load_segment", &path)?)
                .map_err(|e| in_file("load_segment", &path, e))?;
            segments.push(segment);
        }

        let history = HistoryStore::new(root, labels, segments)
            .map_err(|e| in_file("open", &layout.meta_path(), e))?;

        tracing::debug!(
            store_dir = %layout.dir().display(),
            segments = history.len() as u64,
            "opened store"
        );

        Ok(Self {
            layout,
            history,
            config,
        })
    }

    /// Labels currently listed in `dir`'s `_meta.txt`
    ///
    /// Readers use this as a cheap change check before trusting a loaded store.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `_meta.txt` is missing and `Persistence` if it
    /// lists no labels.
    pub fn labels_on_disk(dir: impl AsRef<Path>) -> Result<Vec<String>> {
        read_labels(&StoreLayout::new(dir.as_ref()))
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn dir(&self) -> &Path {
        self.layout.dir()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn labels(&self) -> &[String] {
        self.history.labels()
    }

    /// Number of stored segments
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Reconstruct the roster at `target`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown labels and `Range` for indexes past
    /// the newest label.
    pub fn replay(&self, target: ReplayTarget) -> Result<RecordSet> {
        self.history
            .replay(target)
            .map_err(|e| domain_error("replay", e))
    }

    /// The segment between two adjacent labels
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown labels and `Range` for non-adjacent ones.
    pub fn segment_between(&self, from: &str, to: &str) -> Result<&DiffSegment> {
        self.history
            .segment_between(from, to)
            .map_err(|e| domain_error("segment_between", e))
    }

    /// Net-current presence using the store's preferred agency
    pub fn current_presence(&self) -> RecordSet {
        current_presence(&self.history, &self.config.presence())
    }

    /// Persist the transition to `label`
    ///
    /// The segment file is fully written before `_meta.txt` is atomically
    /// replaced to list `label`.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists`: `label` is already recorded
    /// - `InvalidInput`: malformed label, or one not sorting after the newest
    /// - `Concurrency`: another writer holds the lock, or the directory
    ///   changed since this store was opened
    /// - `Io`: files cannot be written
    pub fn append_segment(
        &mut self,
        label: &str,
        removed: &RecordSet,
        added: &RecordSet,
    ) -> Result<()> {
        let lock = WriterLock::acquire(&self.layout)?;
        self.ensure_current()?;

        if self.history.labels().iter().any(|l| l == label) {
            return Err(domain_error(
                "append_segment",
                RollcallError::LabelExists {
                    label: label.to_string(),
                },
            ));
        }
        let previous = self.history.latest_label().to_string();
        check_successor(&previous, label).map_err(|e| domain_error("append_segment", e))?;

        let segment = DiffSegment::build(removed, added);
        atomic_write(
            &self.layout.segment_path(&previous, label),
            segment.to_tsv().as_bytes(),
        )?;

        let mut labels = self.history.labels().to_vec();
        labels.push(label.to_string());
        atomic_write(&self.layout.meta_path(), render_meta(&labels).as_bytes())?;

        self.history
            .push_segment(label, segment)
            .map_err(|e| domain_error("append_segment", e))?;
        drop(lock);

        tracing::debug!(
            store_dir = %self.layout.dir().display(),
            label = label,
            removed_len = removed.len() as u64,
            added_len = added.len() as u64,
            "appended segment"
        );
        Ok(())
    }

    /// Fold the first `n` segments into a new root at `labels[n]`
    ///
    /// Writes the new root file (moving a differing file of the same name
    /// aside), archives `_meta.txt`, then atomically
    /// replaces `_meta.txt` with `labels[n..]`. Segment files are never
    /// deleted. Returns the store re-opened from disk; `n == 0` changes
    /// nothing on disk.
    ///
    /// # Errors
    ///
    /// - `Range`: `n` is past the newest label
    /// - `Concurrency`: another writer holds the lock, or the directory
    ///   changed since this store was opened
    /// - `Io`: files cannot be written or moved
    pub fn rebase(&self, n: usize) -> Result<DiskStore> {
        let lock = WriterLock::acquire(&self.layout)?;
        self.ensure_current()?;

        let sliced = self
            .history
            .slice(n, self.history.len())
            .map_err(|e| domain_error("rebase", e))?;

        if n > 0 {
            let stamp = file_stamp();
            self.write_new_root(sliced.root_label(), sliced.root(), &stamp)?;
            self.archive_meta(&stamp)?;
            atomic_write(
                &self.layout.meta_path(),
                render_meta(sliced.labels()).as_bytes(),
            )?;
            tracing::debug!(
                store_dir = %self.layout.dir().display(),
                label = sliced.root_label(),
                folded = n as u64,
                "rebased store"
            );
        }
        drop(lock);

        Self::open_with_config(self.layout.dir(), self.config.clone())
    }

    fn write_new_root(&self, label: &str, root: &RecordSet, stamp: &str) -> Result<()> {
        let path = self.layout.root_path(label);
        let content = root.to_tsv();
        if path.exists() {
            let existing = read_text("rebase", &path)?;
            if existing == content {
                return Ok(());
            }
            let aside = self.layout.moved_root_path(label, stamp);
            fs::rename(&path, &aside).map_err(|e| io_error("rebase", &path, e))?;
            tracing::debug!(
                moved_to = %aside.display(),
                "moved differing root file aside"
            );
        }
        atomic_write(&path, content.as_bytes())
    }

    fn archive_meta(&self, stamp: &str) -> Result<()> {
        let meta = self.layout.meta_path();
        let mut attempt = 0;
        let mut target = self.layout.archived_meta_path(stamp, attempt);
        while target.exists() {
            attempt += 1;
            target = self.layout.archived_meta_path(stamp, attempt);
        }
        fs::copy(&meta, &target).map_err(|e| io_error("archive_meta", &meta, e))?;
        Ok(())
    }

    /// Fail if another process changed `_meta.txt` after this store was loaded
    fn ensure_current(&self) -> Result<()> {
        let on_disk = read_labels(&self.layout)?;
        if on_disk.as_slice() != self.history.labels() {
            let found = on_disk.last().map(String::as_str).unwrap_or_default();
            return Err(stale_store(
                self.layout.dir(),
                self.history.latest_label(),
                found,
            ));
        }
        Ok(())
    }
}

fn read_text(operation: &str, path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| io_error(operation, path, e))
}

fn read_labels(layout: &StoreLayout) -> Result<Vec<String>> {
    let meta_path = layout.meta_path();
    let labels = parse_meta(&read_text("read_meta", &meta_path)?);
    if labels.is_empty() {
        return Err(empty_metadata(&meta_path));
    }
    Ok(labels)
}
