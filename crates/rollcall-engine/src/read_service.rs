//! Read layer over a store directory
//!
//! [`ReadService`] serves replay, segment, presence and navigation queries
//! for a presentation layer. Reconstructed states are memoized in a
//! [`ReadCache`] owned by the service and handed in by the caller; the cache
//! is dropped whenever `_meta.txt` lists different labels than the ones it
//! was filled under, or when the caller asks for it.

#![allow(clippy::result_large_err)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rollcall_core::diff::DiffSegment;
use rollcall_core::errors::{ExError, ExErrorKind};
use rollcall_core::history::ReplayTarget;
use rollcall_core::model::RecordSet;
use rollcall_store::errors::{domain_error, Result};
use rollcall_store::{DiskStore, StoreConfig};

/// Memoized read results, valid for one label list
#[derive(Debug, Default)]
pub struct ReadCache {
    fingerprint: Option<Vec<String>>,
    states: HashMap<String, RecordSet>,
    presence: Option<RecordSet>,
    hits: u64,
    misses: u64,
}

impl ReadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every memoized result
    pub fn invalidate(&mut self) {
        self.fingerprint = None;
        self.states.clear();
        self.presence = None;
    }

    /// Number of memoized roster states
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.presence.is_none()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    fn is_valid_for(&self, labels: &[String]) -> bool {
        self.fingerprint.as_deref() == Some(labels)
    }

    fn reset_for(&mut self, labels: Vec<String>) {
        self.invalidate();
        self.fingerprint = Some(labels);
    }
}

/// Query surface for one store directory
#[derive(Debug)]
pub struct ReadService {
    dir: PathBuf,
    config: Option<StoreConfig>,
    store: Option<DiskStore>,
    cache: ReadCache,
}

impl ReadService {
    /// Serve `dir` using `cache`; configuration comes from `{dir}/rollcall.toml`
    pub fn new(dir: impl Into<PathBuf>, cache: ReadCache) -> Self {
        Self {
            dir: dir.into(),
            config: None,
            store: None,
            cache,
        }
    }

    /// Serve `dir` with an explicit configuration instead of `rollcall.toml`
    pub fn with_config(dir: impl Into<PathBuf>, config: StoreConfig, cache: ReadCache) -> Self {
        Self {
            config: Some(config),
            ..Self::new(dir, cache)
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn cache(&self) -> &ReadCache {
        &self.cache
    }

    /// Forget the loaded store and every memoized result
    pub fn invalidate(&mut self) {
        self.store = None;
        self.cache.invalidate();
    }

    /// The store as currently listed on disk, reloading if `_meta.txt` changed
    ///
    /// # Errors
    ///
    /// Propagates load errors from [`DiskStore::open`].
    pub fn store(&mut self) -> Result<&DiskStore> {
        let labels = DiskStore::labels_on_disk(&self.dir)?;
        let loaded_matches = self
            .store
            .as_ref()
            .is_some_and(|s| s.labels() == labels.as_slice());

        if !self.cache.is_valid_for(&labels) || !loaded_matches {
            tracing::debug!(
                store_dir = %self.dir.display(),
                labels = labels.len() as u64,
                "reloading store for read cache"
            );
            let store = match &self.config {
                Some(config) => DiskStore::open_with_config(&self.dir, config.clone())?,
                None => DiskStore::open(&self.dir)?,
            };
            // Labels read from the freshly loaded store, in case a writer
            // landed between the check and the load
            self.cache.reset_for(store.labels().to_vec());
            self.store = Some(store);
        }

        self.loaded()
    }

    fn loaded(&self) -> Result<&DiskStore> {
        self.store.as_ref().ok_or_else(|| {
            ExError::new(ExErrorKind::Internal)
                .with_op("read_service")
                .with_message("store accessed before it was loaded")
        })
    }

    pub fn labels(&mut self) -> Result<Vec<String>> {
        Ok(self.store()?.labels().to_vec())
    }

    /// Roster at `target`, memoized per label
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown labels and `Range` for indexes past
    /// the newest label.
    pub fn replay(&mut self, target: ReplayTarget) -> Result<RecordSet> {
        let store = self.store()?;
        let index = store
            .history()
            .resolve(&target)
            .map_err(|e| domain_error("replay", e))?;
        let label = store.labels()[index].clone();

        if let Some(state) = self.cache.states.get(&label) {
            self.cache.hits += 1;
            return Ok(state.clone());
        }

        let state = self.loaded()?.replay(ReplayTarget::Index(index))?;
        self.cache.misses += 1;
        self.cache.states.insert(label, state.clone());
        Ok(state)
    }

    /// Segment between adjacent labels, optionally restricted to one agency
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown labels and `Range` for non-adjacent ones.
    pub fn segment_between(
        &mut self,
        from: &str,
        to: &str,
        agency: Option<&str>,
    ) -> Result<DiffSegment> {
        let segment = self.store()?.segment_between(from, to)?;
        Ok(match agency {
            Some(needle) => segment.filter_agency(needle),
            None => segment.clone(),
        })
    }

    /// Net-current presence, memoized until the labels change
    pub fn current_presence(&mut self) -> Result<RecordSet> {
        self.store()?;
        if let Some(presence) = &self.cache.presence {
            self.cache.hits += 1;
            return Ok(presence.clone());
        }
        let presence = self.loaded()?.current_presence();
        self.cache.misses += 1;
        self.cache.presence = Some(presence.clone());
        Ok(presence)
    }

    /// Labels immediately before and after `label`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the label is not recorded.
    pub fn neighbors(&mut self, label: &str) -> Result<(Option<String>, Option<String>)> {
        let (previous, next) = self
            .store()?
            .history()
            .neighbors(label)
            .map_err(|e| domain_error("neighbors", e))?;
        Ok((previous.map(str::to_string), next.map(str::to_string)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::model::Record;
    use tempfile::TempDir;

    #[test]
    fn test_repeated_replay_hits_cache() {
        let temp_dir = TempDir::new().unwrap();
        DiskStore::init(
            temp_dir.path(),
            "L0",
            &RecordSet::from_records([Record::new("Alice", "1", "A", "Officer", "Active")]),
        )
        .unwrap();

        let mut service = ReadService::new(temp_dir.path(), ReadCache::new());
        service.replay(ReplayTarget::Latest).unwrap();
        service.replay("L0".into()).unwrap();

        assert_eq!(service.cache().misses(), 1);
        assert_eq!(service.cache().hits(), 1);
        assert_eq!(service.cache().len(), 1);
    }

    #[test]
    fn test_explicit_invalidate_empties_cache() {
        let temp_dir = TempDir::new().unwrap();
        DiskStore::init(temp_dir.path(), "L0", &RecordSet::new()).unwrap();

        let mut service = ReadService::new(temp_dir.path(), ReadCache::new());
        service.current_presence().unwrap();
        assert!(!service.cache().is_empty());

        service.invalidate();
        assert!(service.cache().is_empty());
    }
}
