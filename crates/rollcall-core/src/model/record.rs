use std::fmt;

use crate::errors::{Result, RollcallError};

/// Field separator of the compact textual encoding
pub const FIELD_SEPARATOR: char = '\t';

/// Capture schema a record was parsed from
///
/// Older captures carried fewer columns. Missing trailing fields are filled
/// with empty strings, and the version decides how many business-key fields
/// take part in comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
    /// `name, id`
    Legacy2,
    /// `name, id, agency`
    Legacy3,
    /// `name, id, agency, rank, status`
    Full,
}

impl SchemaVersion {
    /// Number of fields written when encoding a record of this schema
    pub fn field_count(&self) -> usize {
        match self {
            SchemaVersion::Legacy2 => 2,
            SchemaVersion::Legacy3 => 3,
            SchemaVersion::Full => 5,
        }
    }

    /// Number of business-key fields (`name, id, agency, rank`) this schema knows
    pub fn key_width(&self) -> usize {
        match self {
            SchemaVersion::Legacy2 => 2,
            SchemaVersion::Legacy3 => 3,
            SchemaVersion::Full => 4,
        }
    }

    fn from_field_count(count: usize) -> Option<Self> {
        match count {
            2 => Some(SchemaVersion::Legacy2),
            3 => Some(SchemaVersion::Legacy3),
            4 | 5 => Some(SchemaVersion::Full),
            _ => None,
        }
    }
}

/// One roster entry
///
/// Equality uses the business key `(name, id, agency, rank)`; `status` is
/// recorded but never compared. When the two sides come from different
/// schemas only the fields of the narrower schema are compared, whichever
/// side is narrower.
#[derive(Debug, Clone)]
pub struct Record {
    name: String,
    id: String,
    agency: String,
    rank: String,
    status: String,
    schema: SchemaVersion,
}

impl Record {
    /// Create a full-schema record
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        agency: impl Into<String>,
        rank: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            agency: agency.into(),
            rank: rank.into(),
            status: status.into(),
            schema: SchemaVersion::Full,
        }
    }

    /// Parse one tab-joined line
    ///
    /// Reported line numbers are 1; callers parsing whole files use
    /// [`parse_line_at`](Self::parse_line_at) to report the real position.
    ///
    /// # Errors
    ///
    /// Returns `Parse` when the line has fewer than 2 or more than 5 fields.
    pub fn parse(line: &str) -> Result<Self> {
        Self::parse_line_at(line, 1)
    }

    /// Parse one tab-joined line found at `line_no` (1-based)
    ///
    /// # Errors
    ///
    /// Returns `Parse` when the line has fewer than 2 or more than 5 fields.
    pub fn parse_line_at(line: &str, line_no: usize) -> Result<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        let schema =
            SchemaVersion::from_field_count(fields.len()).ok_or_else(|| RollcallError::Parse {
                line: line_no,
                reason: format!("expected 2 to 5 tab-separated fields, found {}", fields.len()),
            })?;

        let field = |i: usize| fields.get(i).map(|s| s.to_string()).unwrap_or_default();
        Ok(Self {
            name: field(0),
            id: field(1),
            agency: field(2),
            rank: field(3),
            status: field(4),
            schema,
        })
    }

    /// Tab-joined encoding with the field count of the record's own schema
    pub fn encode(&self) -> String {
        let fields = [
            self.name.as_str(),
            self.id.as_str(),
            self.agency.as_str(),
            self.rank.as_str(),
            self.status.as_str(),
        ];
        fields[..self.schema.field_count()].join("\t")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Durable identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn agency(&self) -> &str {
        &self.agency
    }

    pub fn rank(&self) -> &str {
        &self.rank
    }

    /// Informational only, excluded from equality
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    /// Business-key comparison over the narrower of the two schemas
    pub fn matches(&self, other: &Record) -> bool {
        let width = self.schema.key_width().min(other.schema.key_width());
        self.key_fields()[..width] == other.key_fields()[..width]
    }

    fn key_fields(&self) -> [&str; 4] {
        [&self.name, &self.id, &self.agency, &self.rank]
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_line() {
        let r = Record::parse("Alice\t1\tAgencyA\tOfficer\tActive").unwrap();
        assert_eq!(r.name(), "Alice");
        assert_eq!(r.id(), "1");
        assert_eq!(r.agency(), "AgencyA");
        assert_eq!(r.rank(), "Officer");
        assert_eq!(r.status(), "Active");
        assert_eq!(r.schema(), SchemaVersion::Full);
    }

    #[test]
    fn test_parse_legacy_three_field_line() {
        let r = Record::parse("Carol\t3\tAgencyB").unwrap();
        assert_eq!(r.rank(), "");
        assert_eq!(r.status(), "");
        assert_eq!(r.schema(), SchemaVersion::Legacy3);
    }

    #[test]
    fn test_parse_two_field_line_defaults_agency() {
        let r = Record::parse("Dan\t4").unwrap();
        assert_eq!(r.agency(), "");
        assert_eq!(r.schema(), SchemaVersion::Legacy2);
    }

    #[test]
    fn test_parse_four_fields_is_full_with_empty_status() {
        let r = Record::parse("Eve\t5\tAgencyC\tSergeant").unwrap();
        assert_eq!(r.schema(), SchemaVersion::Full);
        assert_eq!(r.status(), "");
        assert_eq!(r.encode(), "Eve\t5\tAgencyC\tSergeant\t");
    }

    #[test]
    fn test_parse_rejects_single_field() {
        let err = Record::parse_line_at("Nobody", 12).unwrap_err();
        assert!(matches!(err, RollcallError::Parse { line: 12, .. }));
    }

    #[test]
    fn test_parse_rejects_too_many_fields() {
        assert!(Record::parse("a\tb\tc\td\te\tf").is_err());
    }

    #[test]
    fn test_parse_strips_line_endings_but_keeps_empty_fields() {
        let r = Record::parse("Carol\t3\tAgencyB\t\t\r\n").unwrap();
        assert_eq!(r.schema(), SchemaVersion::Full);
        assert_eq!(r.encode(), "Carol\t3\tAgencyB\t\t");
    }

    #[test]
    fn test_status_excluded_from_equality() {
        let a = Record::new("Alice", "1", "AgencyA", "Officer", "Active");
        let b = Record::new("Alice", "1", "AgencyA", "Officer", "Inactive");
        assert_eq!(a, b);
    }

    #[test]
    fn test_rank_included_in_equality() {
        let a = Record::new("Alice", "1", "AgencyA", "Officer", "Active");
        let b = Record::new("Alice", "1", "AgencyA", "Sergeant", "Active");
        assert_ne!(a, b);
    }

    #[test]
    fn test_narrower_schema_governs_both_directions() {
        let legacy = Record::parse("Carol\t3\tAgencyB").unwrap();
        let full = Record::new("Carol", "3", "AgencyB", "Officer", "Active");
        assert!(legacy.matches(&full));
        assert!(full.matches(&legacy));
    }

    #[test]
    fn test_legacy_record_still_compares_agency() {
        let legacy = Record::parse("Carol\t3\tAgencyB").unwrap();
        let other = Record::new("Carol", "3", "AgencyZ", "", "");
        assert_ne!(legacy, other);
    }

    #[test]
    fn test_encode_keeps_schema_width() {
        assert_eq!(Record::parse("Dan\t4").unwrap().encode(), "Dan\t4");
        assert_eq!(
            Record::parse("Carol\t3\tAgencyB").unwrap().encode(),
            "Carol\t3\tAgencyB"
        );
    }
}
