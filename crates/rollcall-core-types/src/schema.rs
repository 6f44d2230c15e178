//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_CYCLE_ID: &str = "cycle_id";

// History coordinates
pub const FIELD_LABEL: &str = "label";
pub const FIELD_SEGMENT_INDEX: &str = "segment_index";
pub const FIELD_STORE_DIR: &str = "store_dir";

// Collection sizes
pub const FIELD_ADDED_LEN: &str = "added_len";
pub const FIELD_REMOVED_LEN: &str = "removed_len";
pub const FIELD_RECORD_COUNT: &str = "record_count";
pub const FIELD_DUPLICATES: &str = "duplicates";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
/// Non-fatal: a merge introduced a business-key duplicate
pub const EVENT_DUPLICATE_MERGED: &str = "duplicate_merged";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        assert!(!FIELD_COMPONENT.is_empty());
        assert!(!FIELD_OP.is_empty());
        assert!(!FIELD_LABEL.is_empty());
        assert!(!EVENT_START.is_empty());
        assert!(!EVENT_END.is_empty());
        assert!(!EVENT_END_ERROR.is_empty());
        assert!(!EVENT_DUPLICATE_MERGED.is_empty());
    }

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
        assert_ne!(EVENT_DUPLICATE_MERGED, EVENT_END_ERROR);
    }
}
