use crate::model::RecordSet;

/// Compute `(removed, added)` between two snapshots
///
/// `removed` holds the members of `before` with no business-key match in
/// `after`; `added` holds the members of `after` with no match in `before`.
/// Runs in O(n + m) through the sets' hash indexes.
pub fn diff(before: &RecordSet, after: &RecordSet) -> (RecordSet, RecordSet) {
    let removed = before
        .iter()
        .filter(|r| !after.contains(r))
        .cloned()
        .collect();
    let added = after
        .iter()
        .filter(|r| !before.contains(r))
        .cloned()
        .collect();
    (removed, added)
}
