use rollcall_core_types::CycleId;
use thiserror::Error;

/// Result type alias using RollcallError
pub type Result<T> = std::result::Result<T, RollcallError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (the acquisition job,
/// the read layer, the CLI) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Data
    /// Malformed record or segment line, or unparsable mode tag
    Parse,
    /// Label absent from the metadata index
    NotFound,
    /// Invalid replay index or slice bounds
    Range,
    /// Caller supplied an unusable value (bad label, out-of-order label)
    InvalidInput,
    /// Label already recorded
    AlreadyExists,
    /// In-memory history disagrees with its own invariants
    InvariantViolation,

    // Integration/IO
    Io,
    Persistence,
    /// Another writer holds the store lock
    Concurrency,
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Parse => "ERR_PARSE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Range => "ERR_RANGE",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::InvariantViolation => "ERR_INVARIANT_VIOLATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification plus optional context (operation, label, file
/// path, line number, cycle id) so a failed load can be traced back to the
/// exact line on disk.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    label: Option<String>,
    path: Option<String>,
    line: Option<usize>,
    cycle_id: Option<CycleId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            label: None,
            path: None,
            line: None,
            cycle_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add label context
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add 1-based line number context
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Add cycle ID context
    pub fn with_cycle_id(mut self, cycle_id: CycleId) -> Self {
        self.cycle_id = Some(cycle_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the label context, if any
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Get the file path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the line number context, if any
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Get the cycle ID context, if any
    pub fn cycle_id(&self) -> Option<&CycleId> {
        self.cycle_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(label) = &self.label {
            write!(f, " (label: {})", label)?;
        }
        if let Some(path) = &self.path {
            match self.line {
                Some(line) => write!(f, " ({}:{})", path, line)?,
                None => write!(f, " ({})", path)?,
            }
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for roster history operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RollcallError {
    // ===== Parsing =====
    /// A record or segment line could not be parsed
    #[error("Parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    // ===== Labels =====
    /// Label is not present in the history's label index
    #[error("Label not found: {label}")]
    LabelNotFound { label: String },

    /// Label cannot be used as a point-in-time identifier
    #[error("Invalid label '{label}': {reason}")]
    InvalidLabel { label: String, reason: String },

    /// Label does not sort strictly after the newest recorded label
    #[error("Label '{label}' must sort after the newest label '{previous}'")]
    LabelOutOfOrder { label: String, previous: String },

    /// Label was already recorded
    #[error("Label already recorded: {label}")]
    LabelExists { label: String },

    // ===== Ranges =====
    /// Replay index beyond the number of segments
    #[error("Index {index} out of range for history with {len} segments")]
    IndexOutOfRange { index: usize, len: usize },

    /// Slice bounds are reversed or out of range
    #[error("Invalid slice {start}..{stop} for history with {len} segments")]
    InvalidSlice {
        start: usize,
        stop: usize,
        len: usize,
    },

    /// Two labels do not bound a single stored segment
    #[error("Labels '{from}' and '{to}' are not adjacent in the history")]
    NotAdjacent { from: String, to: String },

    // ===== Structure =====
    /// History parts disagree (segment count vs label count, empty label list)
    #[error("History invariant violated: {reason}")]
    HistoryInvariant { reason: String },
}

/// Conversion from RollcallError to ExError
impl From<RollcallError> for ExError {
    fn from(err: RollcallError) -> Self {
        match err {
            RollcallError::Parse { line, reason } => ExError::new(ExErrorKind::Parse)
                .with_line(line)
                .with_message(reason),

            RollcallError::LabelNotFound { label } => ExError::new(ExErrorKind::NotFound)
                .with_label(label)
                .with_message("Label not found in metadata index"),

            RollcallError::InvalidLabel { label, reason } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_label(label)
                    .with_message(format!("Invalid label: {}", reason))
            }

            RollcallError::LabelOutOfOrder { label, previous } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_label(label)
                    .with_message(format!("Label must sort after '{}'", previous))
            }

            RollcallError::LabelExists { label } => ExError::new(ExErrorKind::AlreadyExists)
                .with_label(label)
                .with_message("Label already recorded"),

            err @ RollcallError::IndexOutOfRange { .. } => {
                ExError::new(ExErrorKind::Range).with_message(err.to_string())
            }

            err @ RollcallError::InvalidSlice { .. } => {
                ExError::new(ExErrorKind::Range).with_message(err.to_string())
            }

            RollcallError::NotAdjacent { from, to } => ExError::new(ExErrorKind::Range)
                .with_label(from.clone())
                .with_message(format!("No single segment spans '{}' to '{}'", from, to)),

            RollcallError::HistoryInvariant { reason } => {
                ExError::new(ExErrorKind::InvariantViolation).with_message(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes_are_stable() {
        assert_eq!(ExErrorKind::Parse.code(), "ERR_PARSE");
        assert_eq!(ExErrorKind::NotFound.code(), "ERR_NOT_FOUND");
        assert_eq!(ExErrorKind::Range.code(), "ERR_RANGE");
        assert_eq!(ExErrorKind::Concurrency.code(), "ERR_CONCURRENCY");
    }

    #[test]
    fn test_display_includes_path_and_line() {
        let err = ExError::new(ExErrorKind::Parse)
            .with_op("load_root")
            .with_path("/data/_meta.txt")
            .with_line(7)
            .with_message("too few fields");
        let text = err.to_string();
        assert!(text.starts_with("[ERR_PARSE]"));
        assert!(text.contains("load_root"));
        assert!(text.contains("/data/_meta.txt:7"));
    }

    #[test]
    fn test_source_chain_is_exposed() {
        let inner = ExError::new(ExErrorKind::Io).with_message("disk full");
        let outer = ExError::new(ExErrorKind::Persistence).with_source(inner);
        assert_eq!(
            outer.source_error().map(|e| e.kind()),
            Some(ExErrorKind::Io)
        );
        assert!(std::error::Error::source(&outer).is_some());
    }
}
