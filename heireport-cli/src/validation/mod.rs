//! Record validation and auto-calculation
//!
//! Rules are declarative per field; the first violation of a record is the one
//! reported. Any violation blocks submission of the whole workbook.

mod calc;
mod rules;

pub use calc::apply_totals;
pub use rules::{Check, FieldRule, RuleSet, Violation};

use std::collections::HashMap;

use crate::records::{Record, RecordKind};

/// Validation result for a single field value
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationResult {
    /// Value is valid
    Valid,
    /// Value is definitely invalid
    Error(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        !matches!(self, ValidationResult::Error(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ValidationResult::Error(_))
    }
}

/// A record that failed validation, with its first violation
#[derive(Debug, Clone, PartialEq)]
pub struct RecordIssue {
    /// Where the record came from, e.g. "GROUP A1!R12"
    pub location: String,
    pub violation: Violation,
}

impl std::fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.violation)
    }
}

/// Validate a batch of records; returns one issue per invalid record
pub fn validate_records(records: &[Record]) -> Vec<RecordIssue> {
    let mut rule_sets: HashMap<RecordKind, RuleSet> = HashMap::new();
    let mut issues = Vec::new();

    for record in records {
        let rules = rule_sets
            .entry(record.kind)
            .or_insert_with(|| RuleSet::for_kind(record.kind));

        if let Some(violation) = rules.first_violation(record) {
            issues.push(RecordIssue {
                location: record.location(),
                violation,
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Value;

    fn faculty(name: &str, row: u32) -> Record {
        let mut record = Record::new(RecordKind::Faculty, "GROUP A1", row);
        record.set("name", Value::Text(name.into()));
        record
    }

    #[test]
    fn test_negative_value_is_flagged() {
        let mut bad = faculty("Santos, Maria", 10);
        bad.set("research_load", Value::Decimal(-3.0));
        let good = faculty("Reyes, Jose", 11);

        let issues = validate_records(&[good, bad]);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].location, "GROUP A1!R10");
        assert_eq!(issues[0].violation.field, "research_load");
    }

    #[test]
    fn test_one_issue_per_record() {
        let mut bad = faculty("", 12);
        bad.set("research_load", Value::Decimal(-3.0));

        let issues = validate_records(&[bad]);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].violation.field, "name");
    }

    #[test]
    fn test_mixed_kinds_use_their_own_rules() {
        let mut graduate = Record::new(RecordKind::Graduate, "Sheet1", 2);
        graduate.set("last_name", Value::Text("Cruz".into()));
        graduate.set("first_name", Value::Text("Ana".into()));

        let issues = validate_records(&[faculty("Reyes, Jose", 10), graduate]);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].violation.field, "student_id");
    }
}
