//! Field edits on stored records
//!
//! Edits are parsed strictly for the field's type, checked against the
//! kind's rule set, and followed by a recalculation of derived totals.

use serde_json::Map;
use thiserror::Error;

use super::{Record, Value};
use crate::excel::cells::parse_input;
use crate::excel::layout::FieldKind;
use crate::excel::templates::Template;
use crate::validation::{RuleSet, ValidationResult, apply_totals};

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("Unknown field '{field}' for {kind} records")]
    UnknownField { kind: String, field: String },

    #[error("'{field}' is calculated from {parts}")]
    Calculated { field: String, parts: String },

    #[error("{field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// A field whose value changed through an edit or a recalculated total
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: String,
    pub before: Value,
    pub after: Value,
}

/// Apply `field=value` edits to a record.
///
/// Nothing is changed when any edit is rejected.
pub fn apply_edits(record: &mut Record, edits: &[(String, String)]) -> Result<Vec<FieldChange>, EditError> {
    let template = Template::for_kind(record.kind);
    let rules = RuleSet::for_kind(record.kind);

    let mut edited = record.clone();
    normalize(&mut edited, &template);
    let before = edited.clone();

    for (field, raw) in edits {
        let spec = template
            .field(record.kind, field)
            .ok_or_else(|| EditError::UnknownField {
                kind: record.kind.to_string(),
                field: field.clone(),
            })?;

        if let Some(total) = template
            .sheets_for(record.kind)
            .flat_map(|s| s.derived.iter())
            .find(|d| d.field == spec.field)
        {
            return Err(EditError::Calculated {
                field: field.clone(),
                parts: total.sum_of.join(" + "),
            });
        }

        let value = parse_input(raw, spec.kind).map_err(|message| EditError::InvalidValue {
            field: field.clone(),
            message,
        })?;

        if let ValidationResult::Error(message) = rules.check_field(spec.field, &value) {
            return Err(EditError::InvalidValue {
                field: field.clone(),
                message,
            });
        }
        edited.set(spec.field, value);
    }

    for sheet in template.sheets_for(record.kind) {
        apply_totals(&mut edited, sheet.derived);
    }

    let changes = template
        .fields(record.kind)
        .into_iter()
        .filter(|spec| before.get(spec.field) != edited.get(spec.field))
        .map(|spec| FieldChange {
            field: spec.field.to_string(),
            before: before.get(spec.field).clone(),
            after: edited.get(spec.field).clone(),
        })
        .collect();

    *record = edited;
    Ok(changes)
}

/// Request body holding only the template's fields
pub fn template_payload(record: &Record) -> serde_json::Value {
    let template = Template::for_kind(record.kind);
    let mut data = Map::new();
    for spec in template.fields(record.kind) {
        if let Some(value) = record.fields.get(spec.field) {
            data.insert(spec.field.to_string(), value.to_json());
        }
    }
    serde_json::Value::Object(data)
}

/// Bring API values to their template types (e.g. decimals sent as strings)
fn normalize(record: &mut Record, template: &Template) {
    for spec in template.fields(record.kind) {
        let current = record.get(spec.field);
        if current.is_null() || conforms(current, spec.kind) {
            continue;
        }
        if let Ok(value) = parse_input(&current.to_string(), spec.kind) {
            record.set(spec.field, value);
        }
    }
}

fn conforms(value: &Value, kind: FieldKind) -> bool {
    matches!(
        (value, kind),
        (Value::Text(_), FieldKind::Text)
            | (Value::Int(_), FieldKind::Integer(_))
            | (Value::Decimal(_), FieldKind::Decimal(_))
            | (Value::Date(_), FieldKind::Date)
            | (Value::Code(_), FieldKind::Code)
    )
}
