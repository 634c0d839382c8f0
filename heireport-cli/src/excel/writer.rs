//! Write records back into a template workbook
//!
//! The exported file uses the same sheet names and cell positions the reader
//! expects, so it can be edited in Excel and uploaded again.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Datelike;
use log::{debug, warn};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};

use super::layout::{Layout, SheetSpec};
use super::templates::Template;
use crate::records::{Record, Value};

/// What an export wrote, and what it left out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Records written per worksheet, in sheet order
    pub sheets: Vec<(String, usize)>,
    /// Records whose target sheet the template would not read back
    pub skipped: Vec<String>,
}

impl ExportSummary {
    pub fn written(&self) -> usize {
        self.sheets.iter().map(|(_, count)| count).sum()
    }
}

/// Export records into the template's layout and save to `path`
pub fn write_workbook(records: &[Record], template: &Template, path: &Path) -> Result<ExportSummary> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let header_format = Format::new().set_bold();
    let mut summary = ExportSummary::default();

    for spec in &template.sheets {
        let (groups, skipped) = group_by_sheet(records, spec);
        summary.skipped.extend(skipped);

        for (sheet_name, group) in groups {
            let ws = workbook.add_worksheet();
            ws.set_name(&sheet_name)
                .with_context(|| format!("Invalid sheet name '{}'", sheet_name))?;

            let written = match spec.layout {
                Layout::Table {
                    first_row, columns, ..
                } => {
                    if first_row > 0 {
                        for column in columns {
                            ws.write_string_with_format(
                                first_row - 1,
                                column.col as u16,
                                column.label,
                                &header_format,
                            )?;
                        }
                    }
                    for (offset, record) in group.iter().enumerate() {
                        let row = first_row + offset as u32;
                        for column in columns {
                            write_value(ws, row, column.col, record.get(column.field), &date_format)?;
                        }
                    }
                    group.len()
                }
                Layout::Form { cells, .. } => {
                    if group.len() > 1 {
                        warn!(
                            "{} holds a single record; {} extra record(s) not exported",
                            sheet_name,
                            group.len() - 1
                        );
                    }
                    let record = group[0];
                    for cell in cells {
                        if cell.col > 0 {
                            ws.write_string(cell.row, (cell.col - 1) as u16, cell.label)?;
                        }
                        write_value(ws, cell.row, cell.col, record.get(cell.field), &date_format)?;
                    }
                    1
                }
            };

            debug!("Exported {} record(s) to sheet {}", written, sheet_name);
            summary.sheets.push((sheet_name, written));
        }
    }

    if summary.sheets.is_empty() {
        // An xlsx file needs at least one worksheet
        workbook.add_worksheet();
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    Ok(summary)
}

/// Records of this spec's kind grouped into their target sheets, sheets
/// ordered by first appearance. Records whose sheet would not be selected
/// again on upload are left out and described in the second list.
fn group_by_sheet<'a>(records: &'a [Record], spec: &SheetSpec) -> (Vec<(String, Vec<&'a Record>)>, Vec<String>) {
    let mut order: Vec<String> = Vec::new();
    let mut groups: BTreeMap<String, Vec<&'a Record>> = BTreeMap::new();
    let mut skipped = Vec::new();

    for record in records.iter().filter(|r| r.kind == spec.kind) {
        let sheet_value = spec
            .sheet_field
            .and_then(|field| record.get(field).as_str())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        let name = spec.export_sheet_name(sheet_value);

        if spec.selector.select(std::slice::from_ref(&name)).is_empty() {
            let message = format!(
                "{} '{}': sheet '{}' would not be read back ({} is {})",
                spec.kind,
                record.get(spec.layout.key_field()),
                name,
                spec.sheet_field.unwrap_or("sheet"),
                sheet_value.unwrap_or("blank")
            );
            warn!("{}", message);
            skipped.push(message);
            continue;
        }

        if !groups.contains_key(&name) {
            order.push(name.clone());
        }
        groups.entry(name).or_default().push(record);
    }

    let groups = order
        .into_iter()
        .filter_map(|name| groups.remove(&name).map(|group| (name, group)))
        .collect();
    (groups, skipped)
}

fn write_value(ws: &mut Worksheet, row: u32, col: u32, value: &Value, date_format: &Format) -> Result<()> {
    let col = col as u16;
    match value {
        Value::Null => {}
        Value::Text(s) => {
            ws.write_string(row, col, s)?;
        }
        Value::Int(i) => {
            ws.write_number(row, col, *i as f64)?;
        }
        Value::Decimal(f) => {
            ws.write_number(row, col, *f)?;
        }
        Value::Code(c) => {
            ws.write_number(row, col, *c)?;
        }
        Value::Date(d) => {
            let date = ExcelDateTime::from_ymd(d.year() as u16, d.month() as u8, d.day() as u8)?;
            ws.write_datetime_with_format(row, col, &date, date_format)?;
        }
    }
    Ok(())
}
