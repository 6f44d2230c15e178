//! Property suites for the differ, replay and slicing.

use proptest::prelude::*;
use rollcall_core::diff::{diff, DiffSegment};
use rollcall_core::history::{HistoryStore, ReplayTarget};
use rollcall_core::model::{Record, RecordSet};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Small alphabets so that snapshots overlap often
fn arb_record() -> impl Strategy<Value = Record> {
    (
        prop::sample::select(vec!["Alice", "Bob", "Carol", "Dan"]),
        "[1-4]",
        prop::sample::select(vec!["AgencyA", "AgencyB"]),
        prop::sample::select(vec!["Officer", "Sergeant"]),
        prop::sample::select(vec!["Active", "Inactive", ""]),
    )
        .prop_map(|(name, id, agency, rank, status)| Record::new(name, id, agency, rank, status))
}

fn arb_snapshot() -> impl Strategy<Value = RecordSet> {
    prop::collection::vec(arb_record(), 0..12).prop_map(RecordSet::from_records)
}

fn build_history(snapshots: &[RecordSet]) -> HistoryStore {
    let mut history = HistoryStore::from_root("D00", snapshots[0].clone()).unwrap();
    for (i, pair) in snapshots.windows(2).enumerate() {
        let (removed, added) = diff(&pair[0], &pair[1]);
        history
            .push_segment(format!("D{:02}", i + 1), DiffSegment::build(&removed, &added))
            .unwrap();
    }
    history
}

proptest! {
    #[test]
    fn prop_diff_is_antisymmetric(a in arb_snapshot(), b in arb_snapshot()) {
        let (removed_ab, added_ab) = diff(&a, &b);
        let (removed_ba, added_ba) = diff(&b, &a);
        prop_assert_eq!(removed_ab, added_ba);
        prop_assert_eq!(added_ab, removed_ba);
    }

    #[test]
    fn prop_diff_of_identical_sets_is_empty(a in arb_snapshot()) {
        let (removed, added) = diff(&a, &a);
        prop_assert!(removed.is_empty());
        prop_assert!(added.is_empty());
    }

    #[test]
    fn prop_replay_zero_is_root(snapshots in prop::collection::vec(arb_snapshot(), 1..6)) {
        let history = build_history(&snapshots);
        prop_assert_eq!(&history.replay(ReplayTarget::Index(0)).unwrap(), history.root());
    }

    #[test]
    fn prop_replay_reproduces_every_snapshot(snapshots in prop::collection::vec(arb_snapshot(), 1..6)) {
        let history = build_history(&snapshots);
        for (i, snapshot) in snapshots.iter().enumerate() {
            prop_assert_eq!(&history.replay(ReplayTarget::Index(i)).unwrap(), snapshot);
        }
    }

    #[test]
    fn prop_segments_match_differ(snapshots in prop::collection::vec(arb_snapshot(), 2..6)) {
        let history = build_history(&snapshots);
        for i in 0..history.len() {
            let before = history.replay(ReplayTarget::Index(i)).unwrap();
            let after = history.replay(ReplayTarget::Index(i + 1)).unwrap();
            let (removed, added) = diff(&before, &after);
            prop_assert_eq!(removed, history.segments()[i].removed());
            prop_assert_eq!(added, history.segments()[i].added());
        }
    }

    #[test]
    fn prop_tsv_round_trip(set in arb_snapshot()) {
        prop_assert_eq!(RecordSet::parse(&set.to_tsv()).unwrap(), set);
    }

    #[test]
    fn prop_segment_tsv_round_trip(a in arb_snapshot(), b in arb_snapshot()) {
        let (removed, added) = diff(&a, &b);
        let segment = DiffSegment::build(&removed, &added);
        let parsed = DiffSegment::parse(&segment.to_tsv()).unwrap();
        prop_assert_eq!(parsed.removed(), removed);
        prop_assert_eq!(parsed.added(), added);
    }

    #[test]
    fn prop_full_slice_preserves_latest(snapshots in prop::collection::vec(arb_snapshot(), 1..6)) {
        let history = build_history(&snapshots);
        let sliced = history.slice(0, history.len()).unwrap();
        prop_assert_eq!(
            sliced.replay(ReplayTarget::Latest).unwrap(),
            history.replay(ReplayTarget::Latest).unwrap()
        );
    }

    #[test]
    fn prop_suffix_slice_keeps_later_states(
        snapshots in prop::collection::vec(arb_snapshot(), 2..6),
        start_seed in any::<usize>(),
    ) {
        let history = build_history(&snapshots);
        let start = start_seed % (history.len() + 1);
        let sliced = history.slice(start, history.len()).unwrap();
        prop_assert_eq!(sliced.root_label(), history.labels()[start].as_str());
        for i in start..=history.len() {
            prop_assert_eq!(
                sliced.replay(ReplayTarget::Index(i - start)).unwrap(),
                history.replay(ReplayTarget::Index(i)).unwrap()
            );
        }
    }
}
