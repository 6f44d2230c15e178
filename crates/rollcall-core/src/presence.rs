//! Cross-time presence aggregation
//!
//! Walks the whole log once (O(total log size)); meant for periodic
//! analytics rather than per-request serving.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::diff::DiffMode;
use crate::history::HistoryStore;
use crate::model::{Record, RecordSet};

/// Presence aggregation settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// When several records share an id, prefer the one whose agency
    /// contains this text. Empty means no preference.
    #[serde(default)]
    pub preferred_agency: String,
}

/// Addition/removal counts for one identifier
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceTally {
    pub id: String,
    /// Root membership plus every `+` entry
    pub additions: usize,
    /// Every `-` entry
    pub removals: usize,
    /// Distinct records (by business key) seen for this id, first-seen order
    pub candidates: Vec<Record>,
}

impl PresenceTally {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            additions: 0,
            removals: 0,
            candidates: Vec::new(),
        }
    }

    fn observe(&mut self, record: &Record) {
        if !self.candidates.iter().any(|c| c.matches(record)) {
            self.candidates.push(record.clone());
        }
    }

    /// Balanced tallies are reported as present
    pub fn is_present(&self) -> bool {
        self.additions == self.removals
    }

    fn pick(&self, config: &PresenceConfig) -> Option<&Record> {
        if !config.preferred_agency.is_empty() {
            if let Some(preferred) = self
                .candidates
                .iter()
                .find(|c| c.agency().contains(&config.preferred_agency))
            {
                return Some(preferred);
            }
        }
        self.candidates.first()
    }
}

/// Per-identifier tallies over root and every segment, first-seen order
pub fn presence_tallies(store: &HistoryStore) -> Vec<PresenceTally> {
    let mut order: Vec<PresenceTally> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();

    let mut tally = |record: &Record, mode: DiffMode| {
        let slot = *by_id.entry(record.id().to_string()).or_insert_with(|| {
            order.push(PresenceTally::new(record.id()));
            order.len() - 1
        });
        let entry = &mut order[slot];
        match mode {
            DiffMode::Added => entry.additions += 1,
            DiffMode::Removed => entry.removals += 1,
        }
        entry.observe(record);
    };

    for record in store.root() {
        tally(record, DiffMode::Added);
    }
    for segment in store.segments() {
        for entry in segment.entries() {
            tally(entry.record(), entry.mode());
        }
    }

    order
}

/// Identifiers whose additions equal their removals, one record each
///
/// Among several candidate records for an id, the first whose agency
/// contains `config.preferred_agency` wins; otherwise the first seen.
pub fn current_presence(store: &HistoryStore, config: &PresenceConfig) -> RecordSet {
    let mut present = RecordSet::new();
    for tally in presence_tallies(store) {
        if !tally.is_present() {
            continue;
        }
        if let Some(record) = tally.pick(config) {
            present.insert(record.clone());
        }
    }
    present
}
