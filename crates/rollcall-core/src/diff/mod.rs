//! Roster differencing.
//!
//! [`differ::diff`] compares two snapshots and [`segment::DiffSegment`]
//! stores the result as one tagged transition.
//!
//! ## Entry point
//!
//! ```
//! use rollcall_core::diff::{diff, DiffSegment};
//! use rollcall_core::model::{Record, RecordSet};
//!
//! let before = RecordSet::from_records([Record::new("Alice", "1", "AgencyA", "Officer", "Active")]);
//! let after = RecordSet::from_records([Record::new("Bob", "2", "AgencyA", "Officer", "Active")]);
//! let (removed, added) = diff(&before, &after);
//! let segment = DiffSegment::build(&removed, &added);
//! assert_eq!(segment.to_tsv(), "-Alice\t1\tAgencyA\tOfficer\tActive\n+Bob\t2\tAgencyA\tOfficer\tActive\n");
//! ```
//!
//! ## Guarantees
//!
//! - **Purity**: inputs are borrowed immutably; callers that want the
//!   historical consume-the-before-set behavior drop their handle themselves.
//! - **Determinism**: output order follows input insertion order.

pub mod differ;
pub mod segment;

pub use differ::diff;
pub use segment::{DiffMode, DiffRecord, DiffSegment};
