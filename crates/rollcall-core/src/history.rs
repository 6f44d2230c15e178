//! Root snapshot plus ordered diff segments
//!
//! `segments[i]` is the transition from the state at `labels[i]` to the
//! state at `labels[i + 1]`, so a history always holds one more label than
//! segments. Replaying the root through `segments[..i]` yields the state at
//! `labels[i]`.

use crate::diff::{DiffMode, DiffSegment};
use crate::errors::{Result, RollcallError};
use crate::model::{check_successor, validate_label, RecordSet};

/// Point in the history to reconstruct
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReplayTarget {
    /// The newest recorded state
    #[default]
    Latest,
    /// The state at `labels[index]`
    Index(usize),
    /// The state at the given label (exact match)
    Label(String),
}

impl From<usize> for ReplayTarget {
    fn from(index: usize) -> Self {
        ReplayTarget::Index(index)
    }
}

impl From<&str> for ReplayTarget {
    fn from(label: &str) -> Self {
        ReplayTarget::Label(label.to_string())
    }
}

/// Counters collected while replaying
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Segments applied
    pub segments_applied: usize,
    /// Added records that duplicated a member already present
    pub duplicates: usize,
    /// Records dropped by removal entries
    pub removed: usize,
}

/// A root snapshot plus the ordered transitions recorded after it
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStore {
    root: RecordSet,
    labels: Vec<String>,
    segments: Vec<DiffSegment>,
}

impl HistoryStore {
    /// Assemble a history from its parts
    ///
    /// # Errors
    ///
    /// Returns `HistoryInvariant` if there is not exactly one more label than
    /// segments, `InvalidLabel` for malformed labels, and `LabelOutOfOrder` /
    /// `LabelExists` if labels do not increase strictly.
    pub fn new(root: RecordSet, labels: Vec<String>, segments: Vec<DiffSegment>) -> Result<Self> {
        if labels.is_empty() {
            return Err(RollcallError::HistoryInvariant {
                reason: "a history needs at least its root label".to_string(),
            });
        }
        if segments.len() + 1 != labels.len() {
            return Err(RollcallError::HistoryInvariant {
                reason: format!(
                    "{} labels require {} segments, found {}",
                    labels.len(),
                    labels.len() - 1,
                    segments.len()
                ),
            });
        }
        validate_label(&labels[0])?;
        for pair in labels.windows(2) {
            check_successor(&pair[0], &pair[1])?;
        }
        Ok(Self {
            root,
            labels,
            segments,
        })
    }

    /// A history holding only its root snapshot
    ///
    /// # Errors
    ///
    /// Returns `InvalidLabel` if `label` is malformed.
    pub fn from_root(label: impl Into<String>, root: RecordSet) -> Result<Self> {
        Self::new(root, vec![label.into()], Vec::new())
    }

    pub fn root(&self) -> &RecordSet {
        &self.root
    }

    /// Labels in chronological order; `labels()[0]` names the root
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn segments(&self) -> &[DiffSegment] {
        &self.segments
    }

    /// Number of segments (and index of the latest label)
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when the history holds only its root
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn root_label(&self) -> &str {
        &self.labels[0]
    }

    pub fn latest_label(&self) -> &str {
        &self.labels[self.labels.len() - 1]
    }

    /// Index of `label` in the label list
    ///
    /// # Errors
    ///
    /// Returns `LabelNotFound` if the label is not recorded.
    pub fn resolve_label(&self, label: &str) -> Result<usize> {
        self.labels
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| RollcallError::LabelNotFound {
                label: label.to_string(),
            })
    }

    /// Label index a replay target refers to
    ///
    /// # Errors
    ///
    /// Returns `LabelNotFound` for unknown labels and `IndexOutOfRange` for
    /// indexes past the latest label.
    pub fn resolve(&self, target: &ReplayTarget) -> Result<usize> {
        match target {
            ReplayTarget::Latest => Ok(self.len()),
            ReplayTarget::Index(index) if *index <= self.len() => Ok(*index),
            ReplayTarget::Index(index) => Err(RollcallError::IndexOutOfRange {
                index: *index,
                len: self.len(),
            }),
            ReplayTarget::Label(label) => self.resolve_label(label),
        }
    }

    /// Reconstruct the roster at `target`
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn replay(&self, target: ReplayTarget) -> Result<RecordSet> {
        self.replay_with_report(target).map(|(state, _)| state)
    }

    /// Reconstruct the roster at `target` and report what replay did
    ///
    /// Each segment merges its added records (duplicates are kept and
    /// counted) and then drops every member matching a removed record.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn replay_with_report(
        &self,
        target: ReplayTarget,
    ) -> Result<(RecordSet, ReplayReport)> {
        let upto = self.resolve(&target)?;
        let mut state = self.root.clone();
        let mut report = ReplayReport::default();

        for segment in &self.segments[..upto] {
            report.duplicates += state.merge(segment.records_with(DiffMode::Added));
            for removed in segment.records_with(DiffMode::Removed) {
                report.removed += state.remove_matching(removed);
            }
            report.segments_applied += 1;
        }

        Ok((state, report))
    }

    /// Sub-history spanning labels `start..=stop`
    ///
    /// The new root is the replayed state at `start`; segments
    /// `start..stop` follow it. The source history is not modified.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSlice` if `start > stop` or `stop > len()`.
    pub fn slice(&self, start: usize, stop: usize) -> Result<HistoryStore> {
        if start > stop || stop > self.len() {
            return Err(RollcallError::InvalidSlice {
                start,
                stop,
                len: self.len(),
            });
        }
        Ok(HistoryStore {
            root: self.replay(ReplayTarget::Index(start))?,
            labels: self.labels[start..=stop].to_vec(),
            segments: self.segments[start..stop].to_vec(),
        })
    }

    /// Append a transition recorded at `label`
    ///
    /// # Errors
    ///
    /// Returns `InvalidLabel`, `LabelExists` or `LabelOutOfOrder` when
    /// `label` cannot follow the latest label.
    pub fn push_segment(&mut self, label: impl Into<String>, segment: DiffSegment) -> Result<()> {
        let label = label.into();
        if self.labels.contains(&label) {
            return Err(RollcallError::LabelExists { label });
        }
        check_successor(self.latest_label(), &label)?;
        self.labels.push(label);
        self.segments.push(segment);
        Ok(())
    }

    /// The segment stored between two adjacent labels
    ///
    /// # Errors
    ///
    /// Returns `LabelNotFound` for unknown labels and `NotAdjacent` unless
    /// `to` directly follows `from`.
    pub fn segment_between(&self, from: &str, to: &str) -> Result<&DiffSegment> {
        let a = self.resolve_label(from)?;
        let b = self.resolve_label(to)?;
        if b != a + 1 {
            return Err(RollcallError::NotAdjacent {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(&self.segments[a])
    }

    /// Labels recorded immediately before and after `label`
    ///
    /// # Errors
    ///
    /// Returns `LabelNotFound` if the label is not recorded.
    pub fn neighbors(&self, label: &str) -> Result<(Option<&str>, Option<&str>)> {
        let i = self.resolve_label(label)?;
        let previous = i.checked_sub(1).map(|p| self.labels[p].as_str());
        let next = self.labels.get(i + 1).map(|n| n.as_str());
        Ok((previous, next))
    }
}
