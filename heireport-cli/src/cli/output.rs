//! Output formatting for listing commands

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::*;
use serde_json::Value;

/// Widest a table cell is allowed to get before it is cut
const MAX_CELL_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Comma-separated values with a header row
    Csv,
}

/// Format API data (a list of objects or a single object)
pub fn format_output(data: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(data).context("Failed to format JSON output"),
        OutputFormat::Csv => json_to_csv(data),
        OutputFormat::Table => Ok(json_to_table(data)),
    }
}

/// Column names: keys of the first object, then keys only later rows have
fn columns(rows: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        if let Value::Object(obj) = row {
            for key in obj.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }
    columns
}

fn json_to_csv(data: &Value) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    match data {
        Value::Array(rows) => {
            let headers = columns(rows);
            if !headers.is_empty() {
                writer.write_record(&headers)?;
            }
            for row in rows {
                let record: Vec<String> = headers
                    .iter()
                    .map(|h| json_value_to_string(row.get(h).unwrap_or(&Value::Null)))
                    .collect();
                writer.write_record(&record)?;
            }
        }
        Value::Object(obj) => {
            writer.write_record(["field", "value"])?;
            for (key, value) in obj {
                let text = json_value_to_string(value);
                writer.write_record([key.as_str(), text.as_str()])?;
            }
        }
        other => {
            writer.write_record(["value"])?;
            writer.write_record([json_value_to_string(other)])?;
        }
    }

    let bytes = writer.into_inner().context("Failed to flush CSV output")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

fn json_to_table(data: &Value) -> String {
    match data {
        Value::Array(rows) if rows.is_empty() => "No records found".dimmed().to_string(),
        Value::Array(rows) => {
            let headers = columns(rows);
            let cells: Vec<Vec<String>> = rows
                .iter()
                .map(|row| {
                    headers
                        .iter()
                        .map(|h| truncate(&json_value_to_string(row.get(h).unwrap_or(&Value::Null))))
                        .collect()
                })
                .collect();
            render_table(&headers, &cells)
        }
        Value::Object(obj) => {
            let width = obj.keys().map(|k| k.chars().count()).max().unwrap_or(0);
            obj.iter()
                .map(|(key, value)| {
                    format!(
                        "{}  {}",
                        pad(key, width).bold(),
                        json_value_to_string(value)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        other => json_value_to_string(other),
    }
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(
        headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| pad(h, *w).bold().to_string())
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ")
            .dimmed()
            .to_string(),
    );
    for row in rows {
        lines.push(
            row.iter()
                .zip(&widths)
                .map(|(cell, w)| pad(cell, *w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string(),
        );
    }
    lines.join("\n")
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

fn truncate(s: &str) -> String {
    let single_line = s.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= MAX_CELL_WIDTH {
        return single_line;
    }
    let cut: String = single_line.chars().take(MAX_CELL_WIDTH - 1).collect();
    format!("{}…", cut)
}

/// Convert a JSON value to its display text; null is empty
pub fn json_value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
