use std::collections::HashMap;

use rollcall_core_types::schema::EVENT_DUPLICATE_MERGED;

use crate::errors::Result;
use crate::model::record::Record;

/// Hash bucket key shared by every schema's comparison width
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct IdentityKey {
    name: String,
    id: String,
}

impl IdentityKey {
    fn of(record: &Record) -> Self {
        Self {
            name: record.name().to_string(),
            id: record.id().to_string(),
        }
    }
}

/// Insertion-ordered collection of records with business-key set semantics
///
/// Membership and removal go through a hash index bucketed by `(name, id)`;
/// the business-key match is resolved inside the bucket. Order only matters
/// for deterministic serialization.
///
/// [`insert`](Self::insert) keeps the set unique. [`merge`](Self::merge)
/// appends without deduplication, counting and logging every duplicate it
/// lets through.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    slots: Vec<Option<Record>>,
    index: HashMap<IdentityKey, Vec<usize>>,
    live: usize,
    duplicates_merged: usize,
}

impl RecordSet {
    /// Create a new empty RecordSet
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from records, silently dropping business-key duplicates
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut set = Self::new();
        for record in records {
            set.insert(record);
        }
        set
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Iterate records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }

    /// Find the first record matching `record` by business key
    pub fn find(&self, record: &Record) -> Option<&Record> {
        self.index
            .get(&IdentityKey::of(record))?
            .iter()
            .filter_map(|&i| self.slots[i].as_ref())
            .find(|candidate| candidate.matches(record))
    }

    pub fn contains(&self, record: &Record) -> bool {
        self.find(record).is_some()
    }

    /// Insert `record` unless a business-key match is already present
    ///
    /// Returns `true` if the record was added.
    pub fn insert(&mut self, record: Record) -> bool {
        if self.contains(&record) {
            return false;
        }
        self.push(record);
        true
    }

    /// Append every record without deduplication
    ///
    /// Returns the number of records that duplicated an existing member.
    /// Duplicates are accepted, but each merge that lets any through emits a
    /// `duplicate_merged` warning and bumps [`duplicates_merged`](Self::duplicates_merged).
    pub fn merge<'a>(&mut self, records: impl IntoIterator<Item = &'a Record>) -> usize {
        let mut duplicates = 0;
        let mut first_id: Option<String> = None;
        for record in records {
            if self.contains(record) {
                duplicates += 1;
                first_id.get_or_insert_with(|| record.id().to_string());
            }
            self.push(record.clone());
        }
        if let Some(id) = first_id {
            self.duplicates_merged += duplicates;
            tracing::warn!(
                component = module_path!(),
                event = EVENT_DUPLICATE_MERGED,
                duplicates = duplicates as u64,
                id = %id,
                "merge introduced business-key duplicates"
            );
        }
        duplicates
    }

    /// Remove every record matching `record` by business key
    ///
    /// Returns the number of records removed.
    pub fn remove_matching(&mut self, record: &Record) -> usize {
        let key = IdentityKey::of(record);
        let Some(bucket) = self.index.get_mut(&key) else {
            return 0;
        };

        let slots = &mut self.slots;
        let mut removed = 0;
        bucket.retain(|&i| {
            let hit = slots[i].as_ref().is_some_and(|r| r.matches(record));
            if hit {
                slots[i] = None;
                removed += 1;
            }
            !hit
        });
        if bucket.is_empty() {
            self.index.remove(&key);
        }

        self.live -= removed;
        if self.slots.len() > 2 * self.live + 64 {
            self.compact();
        }
        removed
    }

    /// Running count of duplicates accepted by [`merge`](Self::merge)
    pub fn duplicates_merged(&self) -> usize {
        self.duplicates_merged
    }

    /// Parse one record per line, skipping blank lines
    ///
    /// # Errors
    ///
    /// Returns `Parse` with the 1-based line number of the first malformed line.
    pub fn parse(text: &str) -> Result<Self> {
        let mut set = Self::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            set.insert(Record::parse_line_at(line, i + 1)?);
        }
        Ok(set)
    }

    /// Parse one record per line, keeping business-key duplicates
    ///
    /// Used for root files, which a rebase writes from a replayed state
    /// that may legitimately hold duplicates. Duplicates are counted in
    /// [`duplicates_merged`](Self::duplicates_merged) and logged like any
    /// other [`merge`](Self::merge).
    ///
    /// # Errors
    ///
    /// Returns `Parse` with the 1-based line number of the first malformed line.
    pub fn parse_merged(text: &str) -> Result<Self> {
        let mut records = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            records.push(Record::parse_line_at(line, i + 1)?);
        }
        let mut set = Self::new();
        set.merge(&records);
        Ok(set)
    }

    /// One encoded record per line, newline terminated
    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        for record in self.iter() {
            out.push_str(&record.encode());
            out.push('\n');
        }
        out
    }

    fn push(&mut self, record: Record) {
        let slot = self.slots.len();
        self.index
            .entry(IdentityKey::of(&record))
            .or_default()
            .push(slot);
        self.slots.push(Some(record));
        self.live += 1;
    }

    fn compact(&mut self) {
        let records: Vec<Record> = self.slots.drain(..).flatten().collect();
        self.index.clear();
        self.live = 0;
        for record in records {
            self.push(record);
        }
    }
}

/// Order-insensitive set equality under the business key
impl PartialEq for RecordSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|r| other.contains(r))
            && other.iter().all(|r| self.contains(r))
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = Box<dyn Iterator<Item = &'a Record> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
