//! Report records mapped from workbook rows

use std::collections::BTreeMap;

use serde_json::Map;

use super::Value;
use crate::api::Resource;

/// The kind of record a worksheet row maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Institution,
    Campus,
    Program,
    Faculty,
    Graduate,
}

impl RecordKind {
    /// REST resource the record is submitted to
    pub fn resource(&self) -> Resource {
        match self {
            RecordKind::Institution => Resource::Institutions,
            RecordKind::Campus => Resource::Campuses,
            RecordKind::Program => Resource::Programs,
            RecordKind::Faculty => Resource::FacultyProfiles,
            RecordKind::Graduate => Resource::Graduates,
        }
    }

    /// Whether records of this kind carry the `institution_id` foreign key
    pub fn belongs_to_institution(&self) -> bool {
        !matches!(self, RecordKind::Institution)
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Institution => write!(f, "Institution"),
            RecordKind::Campus => write!(f, "Campus"),
            RecordKind::Program => write!(f, "Curricular Program"),
            RecordKind::Faculty => write!(f, "Faculty Profile"),
            RecordKind::Graduate => write!(f, "Graduate"),
        }
    }
}

/// One mapped row
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub kind: RecordKind,
    /// Worksheet the row came from
    pub sheet: String,
    /// 1-based worksheet row, as shown in Excel
    pub row: u32,
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(kind: RecordKind, sheet: impl Into<String>, row: u32) -> Self {
        Self {
            kind,
            sheet: sheet.into(),
            row,
            fields: BTreeMap::new(),
        }
    }

    /// Build a record from an API payload (used by edit and export)
    pub fn from_json(kind: RecordKind, json: &serde_json::Value) -> Self {
        let mut record = Record::new(kind, "api", 0);
        if let serde_json::Value::Object(obj) = json {
            for (key, value) in obj {
                record.fields.insert(key.clone(), Value::from_json(value));
            }
        }
        record
    }

    pub fn get(&self, field: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(field).unwrap_or(&NULL)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    /// Location used in user-facing messages, e.g. "GROUP A1!R12"
    pub fn location(&self) -> String {
        format!("{}!R{}", self.sheet, self.row)
    }

    /// JSON body for create/update requests
    pub fn to_payload(&self) -> serde_json::Value {
        let mut data = Map::new();
        for (field, value) in &self.fields {
            data.insert(field.clone(), value.to_json());
        }
        serde_json::Value::Object(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_contains_all_fields() {
        let mut record = Record::new(RecordKind::Faculty, "GROUP A1", 10);
        record.set("name", Value::Text("Dela Cruz, Juan".into()));
        record.set("ssl_salary_grade", Value::Null);
        record.set("full_time_equivalent", Value::Decimal(1.0));

        let payload = record.to_payload();
        assert_eq!(payload["name"], "Dela Cruz, Juan");
        assert!(payload["ssl_salary_grade"].is_null());
        assert_eq!(payload["full_time_equivalent"], 1.0);
        assert_eq!(record.location(), "GROUP A1!R10");
    }

    #[test]
    fn test_missing_field_reads_as_null() {
        let record = Record::new(RecordKind::Graduate, "Sheet1", 2);
        assert!(record.get("student_id").is_null());
    }

    #[test]
    fn test_only_institutions_skip_foreign_key() {
        assert!(!RecordKind::Institution.belongs_to_institution());
        assert!(RecordKind::Campus.belongs_to_institution());
        assert_eq!(RecordKind::Faculty.resource(), Resource::FacultyProfiles);
    }
}
