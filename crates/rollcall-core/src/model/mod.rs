pub mod label;
pub mod record;
pub mod record_set;

pub use label::{check_successor, validate_label};
pub use record::{Record, SchemaVersion};
pub use record_set::RecordSet;
