//! Roster analytics over a reconstructed state
//!
//! All functions take any [`RecordSet`], usually the result of a replay.
//! Text matches are case-insensitive.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::model::{Record, RecordSet};

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn has_status(record: &Record, status: &str) -> bool {
    eq_ignore_case(record.status(), status)
}

/// Records with `status` whose agency contains any of `agency_terms`
///
/// An empty term list matches no agency.
pub fn count_by_status_in_agencies(set: &RecordSet, status: &str, agency_terms: &[&str]) -> usize {
    set.iter()
        .filter(|r| has_status(r, status))
        .filter(|r| {
            agency_terms
                .iter()
                .any(|term| contains_ignore_case(r.agency(), term))
        })
        .count()
}

/// Records holding `rank` with `status`
pub fn count_by_rank(set: &RecordSet, rank: &str, status: &str) -> usize {
    set.iter()
        .filter(|r| eq_ignore_case(r.rank(), rank) && has_status(r, status))
        .count()
}

/// Distinct names among records with `status`
pub fn count_distinct_names_with_status(set: &RecordSet, status: &str) -> usize {
    set.iter()
        .filter(|r| has_status(r, status))
        .map(|r| r.name())
        .collect::<HashSet<_>>()
        .len()
}

/// Summary of one roster state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterStats {
    pub total: usize,
    /// Record count per status; legacy records without a status count under `""`
    pub by_status: BTreeMap<String, usize>,
    pub agencies: usize,
}

impl RosterStats {
    pub fn of(set: &RecordSet) -> Self {
        let mut by_status = BTreeMap::new();
        let mut agencies = BTreeSet::new();
        for record in set {
            *by_status.entry(record.status().to_string()).or_insert(0) += 1;
            if !record.agency().is_empty() {
                agencies.insert(record.agency());
            }
        }
        Self {
            total: set.len(),
            by_status,
            agencies: agencies.len(),
        }
    }
}

/// Counts for one status, optionally narrowed by agency terms and rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub status: String,
    pub distinct_names: usize,
    /// Set when agency terms were given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_agencies: Option<usize>,
    /// Set when a rank was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_rank: Option<usize>,
}

impl StatusBreakdown {
    pub fn of(set: &RecordSet, status: &str, agency_terms: &[&str], rank: Option<&str>) -> Self {
        Self {
            status: status.to_string(),
            distinct_names: count_distinct_names_with_status(set, status),
            in_agencies: (!agency_terms.is_empty())
                .then(|| count_by_status_in_agencies(set, status, agency_terms)),
            with_rank: rank.map(|rank| count_by_rank(set, rank, status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> RecordSet {
        RecordSet::from_records([
            Record::new("Alice", "1", "Portland Police Bureau", "Officer", "Active"),
            Record::new("Bob", "2", "Portland Police Bureau", "Sergeant", "Inactive"),
            Record::new("Carol", "3", "Multnomah County Sheriff", "officer", "active"),
            Record::new("Alice", "4", "Gresham Police", "Officer", "Active"),
            Record::parse("Dan\t5").unwrap(),
        ])
    }

    #[test]
    fn test_count_by_status_in_agencies() {
        let set = roster();
        assert_eq!(count_by_status_in_agencies(&set, "active", &["police"]), 2);
        assert_eq!(
            count_by_status_in_agencies(&set, "Active", &["police", "sheriff"]),
            3
        );
        assert_eq!(count_by_status_in_agencies(&set, "Active", &[]), 0);
    }

    #[test]
    fn test_count_by_rank_ignores_case() {
        assert_eq!(count_by_rank(&roster(), "Officer", "Active"), 3);
        assert_eq!(count_by_rank(&roster(), "sergeant", "Active"), 0);
    }

    #[test]
    fn test_distinct_names() {
        assert_eq!(count_distinct_names_with_status(&roster(), "Active"), 2);
    }

    #[test]
    fn test_roster_stats() {
        let stats = RosterStats::of(&roster());
        assert_eq!(stats.total, 5);
        assert_eq!(stats.agencies, 3);
        assert_eq!(stats.by_status.get("Active"), Some(&2));
        assert_eq!(stats.by_status.get(""), Some(&1));
    }

    #[test]
    fn test_status_breakdown_only_fills_requested_counts() {
        let set = roster();

        let plain = StatusBreakdown::of(&set, "active", &[], None);
        assert_eq!(plain.distinct_names, 2);
        assert_eq!(plain.in_agencies, None);
        assert_eq!(plain.with_rank, None);

        let narrowed = StatusBreakdown::of(&set, "Active", &["sheriff"], Some("officer"));
        assert_eq!(narrowed.in_agencies, Some(1));
        assert_eq!(narrowed.with_rank, Some(3));
    }
}
