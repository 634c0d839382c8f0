//! Declarative field rules

use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationResult;
use crate::excel::templates::Template;
use crate::records::{Record, RecordKind, Value};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("digits pattern"));
static POSTAL_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").expect("postal code pattern"));

/// Codes for sex/gender in the commission's code tables
const SEX_CODES: &[i32] = &[1, 2];

#[derive(Debug, Clone)]
pub enum Check {
    Required,
    NonNegative,
    Min(f64),
    Max(f64),
    MaxLength(usize),
    Pattern {
        regex: Regex,
        description: &'static str,
    },
    OneOf(&'static [i32]),
}

impl Check {
    /// Apply the check; `None` when the value passes
    fn apply(&self, value: &Value) -> Option<String> {
        match self {
            Check::Required => value.is_blank().then(|| "is required".to_string()),
            // Everything below only constrains values that are present
            _ if value.is_null() => None,
            Check::NonNegative => value
                .as_number()
                .filter(|n| *n < 0.0)
                .map(|n| format!("must not be negative (got {})", n)),
            Check::Min(min) => value
                .as_number()
                .filter(|n| n < min)
                .map(|n| format!("must be at least {} (got {})", min, n)),
            Check::Max(max) => value
                .as_number()
                .filter(|n| n > max)
                .map(|n| format!("must be at most {} (got {})", max, n)),
            Check::MaxLength(len) => value
                .as_str()
                .filter(|s| s.chars().count() > *len)
                .map(|_| format!("must be at most {} characters", len)),
            Check::Pattern { regex, description } => value
                .as_str()
                .filter(|s| !regex.is_match(s.trim()))
                .map(|s| format!("'{}' is not {}", s, description)),
            Check::OneOf(codes) => match value {
                Value::Code(c) if !codes.contains(c) => Some(format!(
                    "code {} is not one of {}",
                    c,
                    codes
                        .iter()
                        .map(|c| c.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                )),
                _ => None,
            },
        }
    }
}

/// All checks for one field, in the order they are applied
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: &'static str,
    pub label: &'static str,
    pub checks: Vec<Check>,
}

/// First failed check of a record
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub field: String,
    pub label: String,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) {}", self.label, self.field, self.message)
    }
}

/// Rules for one record kind
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
}

impl RuleSet {
    /// Build the rule set for a record kind from its template:
    /// the identifying field is required, numeric columns must not be
    /// negative, and kind-specific checks are appended.
    pub fn for_kind(kind: RecordKind) -> Self {
        let template = Template::for_kind(kind);
        let key_fields: Vec<&str> = template
            .sheets_for(kind)
            .map(|s| s.layout.key_field())
            .collect();

        let mut rules: Vec<FieldRule> = template
            .fields(kind)
            .into_iter()
            .map(|spec| {
                let mut checks = Vec::new();
                if key_fields.contains(&spec.field) {
                    checks.push(Check::Required);
                }
                if spec.kind.is_numeric() {
                    checks.push(Check::NonNegative);
                }
                FieldRule {
                    field: spec.field,
                    label: spec.label,
                    checks,
                }
            })
            .collect();

        for (field, extra) in extra_checks(kind) {
            if let Some(rule) = rules.iter_mut().find(|r| r.field == field) {
                for check in extra {
                    if matches!(check, Check::Required) {
                        if !rule.checks.iter().any(|c| matches!(c, Check::Required)) {
                            rule.checks.insert(0, check);
                        }
                    } else {
                        rule.checks.push(check);
                    }
                }
            }
        }

        rules.retain(|r| !r.checks.is_empty());
        Self { rules }
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// First violation, following template field order
    pub fn first_violation(&self, record: &Record) -> Option<Violation> {
        for rule in &self.rules {
            let value = record.get(rule.field);
            for check in &rule.checks {
                if let Some(message) = check.apply(value) {
                    return Some(Violation {
                        field: rule.field.to_string(),
                        label: rule.label.to_string(),
                        message,
                    });
                }
            }
        }
        None
    }

    /// Validate one field value (used when editing a single field)
    pub fn check_field(&self, field: &str, value: &Value) -> ValidationResult {
        let rule = match self.rules.iter().find(|r| r.field == field) {
            Some(rule) => rule,
            None => return ValidationResult::Valid,
        };

        for check in &rule.checks {
            if let Some(message) = check.apply(value) {
                return ValidationResult::Error(format!("{} {}", rule.label, message));
            }
        }
        ValidationResult::Valid
    }
}

fn year_range() -> Vec<Check> {
    vec![
        Check::Min(1800.0),
        Check::Max(chrono::Local::now().year() as f64),
    ]
}

fn pattern(regex: &Lazy<Regex>, description: &'static str) -> Check {
    Check::Pattern {
        regex: Regex::clone(regex),
        description,
    }
}

/// Kind-specific checks on top of the template-derived ones
fn extra_checks(kind: RecordKind) -> Vec<(&'static str, Vec<Check>)> {
    match kind {
        RecordKind::Institution => vec![
            ("name", vec![Check::MaxLength(255)]),
            ("uii", vec![Check::Required, pattern(&DIGITS, "a numeric identifier")]),
            ("institutional_email", vec![pattern(&EMAIL, "a valid email address")]),
            ("postal_code", vec![pattern(&POSTAL_CODE, "a 4-digit postal code")]),
            ("year_established", year_range()),
            ("year_granted_approved", year_range()),
            ("year_converted_college", year_range()),
            ("year_converted_university", year_range()),
        ],
        RecordKind::Campus => vec![
            ("name", vec![Check::MaxLength(255)]),
            ("year_first_operation", year_range()),
        ],
        RecordKind::Program => vec![
            ("program_name", vec![Check::MaxLength(255)]),
            ("year", year_range()),
            ("program_normal_length_in_years", vec![Check::Max(10.0)]),
        ],
        RecordKind::Faculty => vec![
            ("gender", vec![Check::OneOf(SEX_CODES)]),
            ("ssl_salary_grade", vec![Check::Min(1.0), Check::Max(33.0)]),
            ("full_time_equivalent", vec![Check::Max(1.0)]),
        ],
        RecordKind::Graduate => vec![
            ("student_id", vec![Check::Required]),
            ("first_name", vec![Check::Required]),
            ("sex", vec![Check::OneOf(SEX_CODES)]),
            ("year_granted", year_range()),
        ],
    }
}
