//! Lifecycle macros for engine operations
//!
//! Every operation the engine runs emits exactly one `start` and then one
//! `end` or `end_error` event, all carrying `component`, `op` and `event`.
//! The expanding crate must depend on `rollcall-core-types` for the event
//! names.

/// Shared body of the lifecycle macros; not part of the public surface
#[doc(hidden)]
#[macro_export]
macro_rules! __rollcall_lifecycle_event {
    ($level:expr, $event:expr, $op:expr $(, $($field:tt)*)?) => {
        tracing::event!(
            $level,
            component = module_path!(),
            op = $op,
            event = $event,
            $($($field)*)?
        )
    };
}

/// Open an operation, with optional extra fields
///
/// ```
/// # use rollcall_core::log_op_start;
/// log_op_start!("record_observation", label = "20240301");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__rollcall_lifecycle_event!(
            tracing::Level::INFO,
            rollcall_core_types::schema::EVENT_START,
            $op
            $(, $($field)*)?
        )
    };
}

/// Close an operation that succeeded; `duration_ms` is mandatory
///
/// ```
/// # use rollcall_core::log_op_end;
/// log_op_end!("rebase", duration_ms = 3, segment_index = 12);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__rollcall_lifecycle_event!(
            tracing::Level::INFO,
            rollcall_core_types::schema::EVENT_END,
            $op,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Close an operation that failed
///
/// `$err` is anything convertible into `ExError`; its kind and stable
/// code are attached as `err_kind` / `err_code`.
///
/// ```
/// # use rollcall_core::{log_op_error, errors::RollcallError};
/// let err = RollcallError::LabelExists { label: "20240301".to_string() };
/// log_op_error!("record_observation", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let failure: $crate::errors::ExError = $err.into();
        $crate::__rollcall_lifecycle_event!(
            tracing::Level::ERROR,
            rollcall_core_types::schema::EVENT_END_ERROR,
            $op,
            duration_ms = $duration,
            err_kind = ?failure.kind(),
            err_code = failure.code()
            $(, $($field)*)?
        )
    }};
}
