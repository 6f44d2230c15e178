//! Point-in-time labels
//!
//! Labels name files on disk (`{label}.tsv`, `{a}-{b}.tsv`), so they may not
//! contain path separators, the segment separator `-`, or line breaks.

use crate::errors::{Result, RollcallError};

/// Characters a label may never contain
const FORBIDDEN: &[char] = &['/', '\\', '-', '\t', '\n', '\r'];

/// Check that `label` can be used as a point-in-time identifier
///
/// # Errors
///
/// Returns `InvalidLabel` for empty labels, labels containing forbidden
/// characters, and labels starting with `_` or `.` (reserved for store files).
pub fn validate_label(label: &str) -> Result<()> {
    let invalid = |reason: &str| RollcallError::InvalidLabel {
        label: label.to_string(),
        reason: reason.to_string(),
    };

    if label.trim().is_empty() {
        return Err(invalid("label is empty"));
    }
    if let Some(c) = label.chars().find(|c| FORBIDDEN.contains(c)) {
        return Err(invalid(&format!("contains forbidden character {:?}", c)));
    }
    if label.starts_with('_') || label.starts_with('.') {
        return Err(invalid("labels starting with '_' or '.' are reserved"));
    }
    Ok(())
}

/// Check that `next` may follow `previous` in a history
///
/// # Errors
///
/// Returns `InvalidLabel` if `next` is malformed, `LabelExists` if it equals
/// `previous`, and `LabelOutOfOrder` if it sorts before it.
pub fn check_successor(previous: &str, next: &str) -> Result<()> {
    validate_label(next)?;
    match next.cmp(previous) {
        std::cmp::Ordering::Greater => Ok(()),
        std::cmp::Ordering::Equal => Err(RollcallError::LabelExists {
            label: next.to_string(),
        }),
        std::cmp::Ordering::Less => Err(RollcallError::LabelOutOfOrder {
            label: next.to_string(),
            previous: previous.to_string(),
        }),
    }
}

/// File name of the root snapshot stored under `label`
pub fn root_file_name(label: &str) -> String {
    format!("{}.tsv", label)
}

/// File name of the segment spanning `from` to `to`
pub fn segment_file_name(from: &str, to: &str) -> String {
    format!("{}-{}.tsv", from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_codes_are_valid() {
        assert!(validate_label("20211111").is_ok());
    }

    #[test]
    fn test_rejects_separator_and_reserved_prefixes() {
        assert!(validate_label("2021-11-11").is_err());
        assert!(validate_label("a/b").is_err());
        assert!(validate_label("_meta").is_err());
        assert!(validate_label(".hidden").is_err());
        assert!(validate_label("  ").is_err());
    }

    #[test]
    fn test_successor_ordering() {
        assert!(check_successor("20240101", "20240102").is_ok());
        assert!(matches!(
            check_successor("20240102", "20240102"),
            Err(RollcallError::LabelExists { .. })
        ));
        assert!(matches!(
            check_successor("20240102", "20240101"),
            Err(RollcallError::LabelOutOfOrder { .. })
        ));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(root_file_name("L0"), "L0.tsv");
        assert_eq!(segment_file_name("L0", "L1"), "L0-L1.tsv");
    }
}
