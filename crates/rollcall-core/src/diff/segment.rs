use std::fmt;

use crate::errors::{Result, RollcallError};
use crate::model::{Record, RecordSet};

/// Whether a record entered or left the roster in a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffMode {
    Added,
    Removed,
}

impl DiffMode {
    /// One-character tag used in segment files
    pub fn symbol(&self) -> char {
        match self {
            DiffMode::Added => '+',
            DiffMode::Removed => '-',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(DiffMode::Added),
            '-' => Some(DiffMode::Removed),
            _ => None,
        }
    }
}

/// A record tagged with the direction of its change
///
/// Comparisons go through [`record`](Self::record), so the tag never takes
/// part in business-key equality.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffRecord {
    mode: DiffMode,
    record: Record,
}

impl DiffRecord {
    pub fn new(mode: DiffMode, record: Record) -> Self {
        Self { mode, record }
    }

    pub fn added(record: Record) -> Self {
        Self::new(DiffMode::Added, record)
    }

    pub fn removed(record: Record) -> Self {
        Self::new(DiffMode::Removed, record)
    }

    pub fn mode(&self) -> DiffMode {
        self.mode
    }

    /// The record with its tag stripped
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Parse a `+`/`-` tag immediately followed by a tab-joined record
    ///
    /// # Errors
    ///
    /// Returns `Parse` for an empty line, an unknown tag, or a malformed record.
    pub fn parse_line_at(line: &str, line_no: usize) -> Result<Self> {
        let mut chars = line.chars();
        let symbol = chars.next().ok_or_else(|| RollcallError::Parse {
            line: line_no,
            reason: "empty segment line".to_string(),
        })?;
        let mode = DiffMode::from_symbol(symbol).ok_or_else(|| RollcallError::Parse {
            line: line_no,
            reason: format!("unknown mode tag {:?}, expected '+' or '-'", symbol),
        })?;
        let record = Record::parse_line_at(chars.as_str(), line_no)?;
        Ok(Self { mode, record })
    }

    pub fn encode(&self) -> String {
        format!("{}{}", self.mode.symbol(), self.record.encode())
    }
}

impl fmt::Display for DiffRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Everything that changed between two consecutive labeled states
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffSegment {
    entries: Vec<DiffRecord>,
}

impl DiffSegment {
    /// Removed records tagged `-`, followed by added records tagged `+`
    pub fn build(removed: &RecordSet, added: &RecordSet) -> Self {
        let entries = removed
            .iter()
            .cloned()
            .map(DiffRecord::removed)
            .chain(added.iter().cloned().map(DiffRecord::added))
            .collect();
        Self { entries }
    }

    pub fn from_entries(entries: Vec<DiffRecord>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[DiffRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records tagged with `mode`, in segment order, duplicates included
    pub fn records_with(&self, mode: DiffMode) -> impl Iterator<Item = &Record> {
        self.entries
            .iter()
            .filter(move |e| e.mode == mode)
            .map(|e| &e.record)
    }

    pub fn added(&self) -> RecordSet {
        self.records_with(DiffMode::Added).cloned().collect()
    }

    pub fn removed(&self) -> RecordSet {
        self.records_with(DiffMode::Removed).cloned().collect()
    }

    /// Entries whose agency contains `needle`
    pub fn filter_agency(&self, needle: &str) -> DiffSegment {
        let entries = self
            .entries
            .iter()
            .filter(|e| e.record.agency().contains(needle))
            .cloned()
            .collect();
        Self { entries }
    }

    /// Parse one tagged record per line, skipping blank lines
    ///
    /// # Errors
    ///
    /// Returns `Parse` with the 1-based line number of the first malformed line.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            entries.push(DiffRecord::parse_line_at(line, i + 1)?);
        }
        Ok(Self { entries })
    }

    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.encode());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, id: &str, agency: &str) -> Record {
        Record::new(name, id, agency, "Officer", "Active")
    }

    #[test]
    fn test_build_lists_removed_before_added() {
        let removed = RecordSet::from_records([rec("Alice", "1", "AgencyA")]);
        let added = RecordSet::from_records([rec("Bob", "2", "AgencyA")]);
        let segment = DiffSegment::build(&removed, &added);
        let modes: Vec<DiffMode> = segment.entries().iter().map(|e| e.mode()).collect();
        assert_eq!(modes, vec![DiffMode::Removed, DiffMode::Added]);
    }

    #[test]
    fn test_mode_is_concatenated_without_separator() {
        let entry = DiffRecord::added(rec("Bob", "2", "AgencyA"));
        assert_eq!(entry.encode(), "+Bob\t2\tAgencyA\tOfficer\tActive");
    }

    #[test]
    fn test_parse_accepts_every_schema() {
        let text = "-Alice\t1\n-Carol\t3\tAgencyB\n+Bob\t2\tAgencyA\tOfficer\tActive\n";
        let segment = DiffSegment::parse(text).unwrap();
        assert_eq!(segment.len(), 3);
        assert_eq!(segment.removed().len(), 2);
        assert_eq!(segment.added().len(), 1);
    }

    #[test]
    fn test_parse_rejects_unknown_mode_tag() {
        let err = DiffSegment::parse("+Bob\t2\tA\n*Eve\t5\tA\n").unwrap_err();
        assert!(matches!(err, RollcallError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_rejects_bare_tag() {
        assert!(DiffSegment::parse("+\n").is_err());
    }

    #[test]
    fn test_tag_is_not_part_of_equality() {
        let a = DiffRecord::added(rec("Bob", "2", "AgencyA"));
        let r = DiffRecord::removed(rec("Bob", "2", "AgencyA"));
        assert_eq!(a.record(), r.record());
        assert_ne!(a, r);
    }

    #[test]
    fn test_filter_agency() {
        let segment = DiffSegment::from_entries(vec![
            DiffRecord::added(rec("Bob", "2", "Portland Police Bureau")),
            DiffRecord::removed(rec("Alice", "1", "Multnomah County")),
        ]);
        let filtered = segment.filter_agency("Police Bureau");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.entries()[0].record().name(), "Bob");
    }
}
