//! Government workbook templates
//!
//! Each template lists the sheet layouts of one prescribed workbook:
//! - `institution`: Form A (institutional profile + campuses)
//! - `programs`: Form B/C (curricular programs, one sheet per program level)
//! - `faculty`: Form E2 (faculty profiles, one sheet per faculty group)
//! - `graduates`: list of graduates

mod faculty;
mod graduates;
mod institution;
mod programs;

use clap::ValueEnum;

use super::layout::{FieldKind, FieldSpec, SheetSpec};
use crate::records::RecordKind;

/// Which workbook template to read or write
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TemplateId {
    Institution,
    Programs,
    Faculty,
    Graduates,
}

impl TemplateId {
    /// Template that carries records of the given kind
    pub fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Institution | RecordKind::Campus => TemplateId::Institution,
            RecordKind::Program => TemplateId::Programs,
            RecordKind::Faculty => TemplateId::Faculty,
            RecordKind::Graduate => TemplateId::Graduates,
        }
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateId::Institution => write!(f, "Form A (Institutional Profile)"),
            TemplateId::Programs => write!(f, "Form B/C (Curricular Programs)"),
            TemplateId::Faculty => write!(f, "Form E2 (Faculty Profile)"),
            TemplateId::Graduates => write!(f, "List of Graduates"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Template {
    pub id: TemplateId,
    pub sheets: Vec<SheetSpec>,
}

impl Template {
    pub fn load(id: TemplateId) -> Self {
        let sheets = match id {
            TemplateId::Institution => institution::sheets(),
            TemplateId::Programs => programs::sheets(),
            TemplateId::Faculty => faculty::sheets(),
            TemplateId::Graduates => graduates::sheets(),
        };
        Self { id, sheets }
    }

    pub fn for_kind(kind: RecordKind) -> Self {
        Self::load(TemplateId::for_kind(kind))
    }

    /// Sheet specs producing records of the given kind
    pub fn sheets_for(&self, kind: RecordKind) -> impl Iterator<Item = &SheetSpec> {
        self.sheets.iter().filter(move |s| s.kind == kind)
    }

    /// All mapped fields of a record kind, in template order
    pub fn fields(&self, kind: RecordKind) -> Vec<FieldSpec> {
        let mut fields: Vec<FieldSpec> = Vec::new();
        for sheet in self.sheets_for(kind) {
            let sheet_field = sheet.sheet_field.map(|field| FieldSpec {
                field,
                label: field,
                kind: FieldKind::Text,
            });
            for spec in sheet.layout.fields().into_iter().chain(sheet_field) {
                if !fields.iter().any(|f| f.field == spec.field) {
                    fields.push(spec);
                }
            }
        }
        fields
    }

    pub fn field(&self, kind: RecordKind, name: &str) -> Option<FieldSpec> {
        self.fields(kind).into_iter().find(|f| f.field == name)
    }

    /// Record kinds produced by this template, in submission order
    pub fn kinds(&self) -> Vec<RecordKind> {
        let mut kinds = Vec::new();
        for sheet in &self.sheets {
            if !kinds.contains(&sheet.kind) {
                kinds.push(sheet.kind);
            }
        }
        kinds
    }
}
