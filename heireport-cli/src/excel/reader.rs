//! Read report records from a government workbook
//!
//! Every sheet spec of the template is matched against the workbook's sheet
//! names; matched sheets are mapped cell-by-cell into records. Rows without
//! the identifying field are skipped. Problems that only affect a sheet
//! (missing sheet, no valid rows) become warnings instead of errors.

use std::io::{Read, Seek};
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use log::{debug, warn};

use super::cells::{cell_text, coerce};
use super::layout::{Layout, SheetSpec};
use super::templates::Template;
use crate::records::{Record, RecordKind, Value};
use crate::validation::apply_totals;

/// Result of mapping a workbook
#[derive(Debug, Clone, Default)]
pub struct MappedWorkbook {
    pub records: Vec<Record>,
    pub sheets: Vec<SheetSummary>,
    /// User-facing warnings (missing sheets, sheets without valid rows)
    pub warnings: Vec<String>,
}

impl MappedWorkbook {
    pub fn records_of(&self, kind: RecordKind) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(move |r| r.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Per-sheet mapping statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    pub sheet_name: String,
    pub kind: RecordKind,
    /// Non-blank rows inspected
    pub rows_read: usize,
    /// Non-blank rows dropped for lacking the identifying field
    pub rows_skipped: usize,
    pub records: usize,
}

/// Open a workbook (.xlsx or .xls) and map it with the given template
pub fn read_workbook<P: AsRef<Path>>(path: P, template: &Template) -> Result<MappedWorkbook> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    map_workbook(&mut workbook, template)
}

/// Map an already opened workbook
pub fn map_workbook<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    template: &Template,
) -> Result<MappedWorkbook> {
    let sheet_names = workbook.sheet_names();
    let mut mapped = MappedWorkbook::default();

    for spec in &template.sheets {
        let selected = spec.selector.select(&sheet_names);
        if selected.is_empty() {
            let message = format!("{}: no {} found in workbook", spec.kind, spec.selector);
            warn!("{}", message);
            mapped.warnings.push(message);
            continue;
        }

        for sheet_name in selected {
            let range = workbook
                .worksheet_range(&sheet_name)
                .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

            let (records, summary) = map_sheet(&range, &sheet_name, spec);
            debug!(
                "Sheet '{}': {} rows read, {} skipped, {} records",
                sheet_name, summary.rows_read, summary.rows_skipped, summary.records
            );

            if records.is_empty() {
                mapped.warnings.push(format!(
                    "Sheet '{}' has no valid {} rows",
                    sheet_name, spec.kind
                ));
            }

            mapped.records.extend(records);
            mapped.sheets.push(summary);
        }
    }

    if mapped.records.is_empty() {
        mapped
            .warnings
            .push(format!("No valid rows found for {}", template.id));
    }

    Ok(mapped)
}

/// Map one worksheet range according to a sheet spec
pub fn map_sheet(range: &Range<Data>, sheet_name: &str, spec: &SheetSpec) -> (Vec<Record>, SheetSummary) {
    let mut summary = SheetSummary {
        sheet_name: sheet_name.to_string(),
        kind: spec.kind,
        rows_read: 0,
        rows_skipped: 0,
        records: 0,
    };

    let mut records = match spec.layout {
        Layout::Table {
            first_row,
            key_col,
            columns,
        } => {
            let mut records = Vec::new();
            let last_row = match range.end() {
                Some((row, _)) => row,
                None => return (records, summary),
            };

            for row in first_row..=last_row {
                let has_content = columns
                    .iter()
                    .any(|c| cell_text(range.get_value((row, c.col))).is_some());
                if !has_content {
                    continue;
                }
                summary.rows_read += 1;

                if cell_text(range.get_value((row, key_col))).is_none() {
                    debug!("{}!R{}: identifying column blank, skipping", sheet_name, row + 1);
                    summary.rows_skipped += 1;
                    continue;
                }

                let mut record = Record::new(spec.kind, sheet_name, row + 1);
                for column in columns {
                    let value = coerce(range.get_value((row, column.col)), column.kind);
                    record.set(column.field, value);
                }
                records.push(record);
            }
            records
        }
        Layout::Form { cells, key_field } => {
            let mut record = Record::new(spec.kind, sheet_name, 0);
            for cell in cells {
                let value = coerce(range.get_value((cell.row, cell.col)), cell.kind);
                if !value.is_null() {
                    record.row = record.row.max(cell.row + 1);
                }
                record.set(cell.field, value);
            }

            if record.fields.values().all(Value::is_blank) {
                Vec::new()
            } else {
                summary.rows_read = 1;
                if record.get(key_field).is_blank() {
                    debug!("{}: form field '{}' blank, skipping", sheet_name, key_field);
                    summary.rows_skipped = 1;
                    Vec::new()
                } else {
                    vec![record]
                }
            }
        }
    };

    for record in &mut records {
        if let Some(field) = spec.sheet_field {
            record.set(field, Value::Text(spec.selector.sheet_value(sheet_name)));
        }
        apply_totals(record, spec.derived);
    }

    summary.records = records.len();
    (records, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::templates::TemplateId;
    use rust_xlsxwriter::Workbook;

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    fn faculty_spec() -> SheetSpec {
        Template::load(TemplateId::Faculty).sheets.remove(0)
    }

    #[test]
    fn test_rows_without_name_are_excluded() {
        let mut range = Range::new((0, 0), (12, 40));
        range.set_value((9, 0), s("Santos, Maria"));
        range.set_value((9, 5), Data::Float(15.0));
        // Row 11 has data but no name
        range.set_value((10, 5), Data::Float(18.0));
        range.set_value((10, 2), s("College of Engineering"));
        range.set_value((11, 0), s("Reyes, Jose"));

        let (records, summary) = map_sheet(&range, "GROUP A1", &faculty_spec());

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("name"), &Value::Text("Santos, Maria".into()));
        assert_eq!(records[0].row, 10);
        assert_eq!(records[1].get("name"), &Value::Text("Reyes, Jose".into()));
        assert_eq!(summary.rows_read, 3);
        assert_eq!(summary.rows_skipped, 1);
        assert_eq!(summary.records, 2);
    }

    #[test]
    fn test_numeric_blank_policy_per_field() {
        let mut range = Range::new((0, 0), (9, 40));
        range.set_value((9, 0), s("Santos, Maria"));
        range.set_value((9, 5), s("not graded"));

        let (records, _) = map_sheet(&range, "GROUP B", &faculty_spec());
        let record = &records[0];

        // Null policy
        assert_eq!(record.get("ssl_salary_grade"), &Value::Null);
        assert_eq!(record.get("annual_basic_salary"), &Value::Null);
        // Zero policy
        assert_eq!(record.get("research_load"), &Value::Decimal(0.0));
        assert_eq!(record.get("faculty_group"), &Value::Text("B".into()));
    }

    #[test]
    fn test_totals_recomputed_on_ingest() {
        let mut range = Range::new((0, 0), (9, 40));
        range.set_value((9, 0), s("Santos, Maria"));
        range.set_value((9, 19), Data::Float(3.0));
        range.set_value((9, 20), Data::Float(15.0));
        range.set_value((9, 21), Data::Float(99.0));

        let (records, _) = map_sheet(&range, "GROUP A1", &faculty_spec());
        assert_eq!(
            records[0].get("undergrad_total_credit_units"),
            &Value::Decimal(18.0)
        );
        assert_eq!(records[0].get("total_work_load"), &Value::Decimal(18.0));
    }

    #[test]
    fn test_form_layout_reads_fixed_cells() {
        let spec = Template::load(TemplateId::Institution).sheets.remove(0);
        let mut range = Range::new((0, 0), (25, 2));
        range.set_value((4, 2), s("13001"));
        range.set_value((5, 2), s("Northern Luzon State University"));
        range.set_value((17, 2), Data::Float(1965.0));

        let (records, summary) = map_sheet(&range, "A1", &spec);
        assert_eq!(records.len(), 1);
        assert_eq!(summary.records, 1);
        assert_eq!(
            records[0].get("name"),
            &Value::Text("Northern Luzon State University".into())
        );
        assert_eq!(records[0].get("year_established"), &Value::Int(1965));
        assert_eq!(records[0].get("year_converted_college"), &Value::Null);
    }

    #[test]
    fn test_form_without_name_yields_nothing() {
        let spec = Template::load(TemplateId::Institution).sheets.remove(0);
        let mut range = Range::new((0, 0), (25, 2));
        range.set_value((4, 2), s("13001"));

        let (records, summary) = map_sheet(&range, "A1", &spec);
        assert!(records.is_empty());
        assert_eq!(summary.rows_skipped, 1);
    }

    fn write_fixture(build: impl FnOnce(&mut Workbook)) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("heireport-reader-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("fixture.xlsx");
        let mut workbook = Workbook::new();
        build(&mut workbook);
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_read_workbook_across_group_sheets() {
        let path = write_fixture(|wb| {
            let ws = wb.add_worksheet();
            ws.set_name("Instructions").unwrap();
            ws.write_string(0, 0, "Fill in one row per faculty member").unwrap();

            let ws = wb.add_worksheet();
            ws.set_name("GROUP A1").unwrap();
            ws.write_string(0, 0, "FORM E2").unwrap();
            ws.write_string(9, 0, "Santos, Maria").unwrap();
            ws.write_number(9, 9, 2).unwrap();
            ws.write_string(10, 0, "Reyes, Jose").unwrap();
            ws.write_string(11, 2, "orphan row without a name").unwrap();

            let ws = wb.add_worksheet();
            ws.set_name("GROUP C2").unwrap();
            ws.write_string(9, 0, "Garcia, Ana").unwrap();

            let ws = wb.add_worksheet();
            ws.set_name("GROUP D").unwrap();
            ws.write_string(0, 0, "FORM E2").unwrap();
        });

        let mapped = read_workbook(&path, &Template::load(TemplateId::Faculty)).unwrap();

        assert_eq!(mapped.records.len(), 3);
        assert_eq!(mapped.sheets.len(), 3);
        assert_eq!(mapped.records[0].get("gender"), &Value::Code(2));
        assert_eq!(mapped.records[2].get("faculty_group"), &Value::Text("C2".into()));
        // Empty group sheet is a warning, not an error
        assert_eq!(mapped.warnings.len(), 1);
        assert!(mapped.warnings[0].contains("GROUP D"));
    }

    #[test]
    fn test_huge_counts_do_not_overflow_totals() {
        let spec = Template::load(TemplateId::Programs).sheets.remove(0);
        let mut range = Range::new((0, 0), (10, 40));
        range.set_value((10, 0), s("BS Civil Engineering"));
        range.set_value((10, 11), Data::Float(1e19));
        range.set_value((10, 12), Data::Float(1e19));

        let (records, _) = map_sheet(&range, "Baccalaureate", &spec);
        assert_eq!(records.len(), 1);
        match records[0].get("total_units") {
            Value::Decimal(total) => assert!(*total > 0.0),
            other => panic!("expected a decimal total, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_named_sheet_is_a_warning() {
        let path = write_fixture(|wb| {
            let ws = wb.add_worksheet();
            ws.set_name("A1").unwrap();
            ws.write_string(4, 2, "13001").unwrap();
            ws.write_string(5, 2, "Northern Luzon State University").unwrap();
        });

        let mapped = read_workbook(&path, &Template::load(TemplateId::Institution)).unwrap();

        assert_eq!(mapped.records.len(), 1);
        assert_eq!(mapped.records_of(RecordKind::Institution).count(), 1);
        assert_eq!(mapped.warnings, vec!["Campus: no sheet 'A2' found in workbook"]);
    }

    #[test]
    fn test_workbook_without_valid_rows_warns() {
        let path = write_fixture(|wb| {
            let ws = wb.add_worksheet();
            ws.write_string(0, 0, "Student ID").unwrap();
            ws.write_string(1, 0, "2019-0001").unwrap();
        });

        let mapped = read_workbook(&path, &Template::load(TemplateId::Graduates)).unwrap();
        assert!(mapped.is_empty());
        assert!(mapped.warnings.iter().any(|w| w.starts_with("No valid rows")));
    }
}
