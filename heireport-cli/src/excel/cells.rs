//! Cell coercion from calamine cells to record values

use calamine::Data;
use chrono::{Duration, NaiveDate};

use super::layout::{Blank, FieldKind};
use crate::records::Value;

/// Trimmed, non-empty text of a cell
pub fn cell_text(cell: Option<&Data>) -> Option<String> {
    let text = match cell? {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match excel_serial_to_date(dt.as_f64()) {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => format_float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => s.trim().to_string(),
        Data::DurationIso(s) => s.trim().to_string(),
    };
    if text.is_empty() { None } else { Some(text) }
}

/// Coerce a cell to the value of the given field kind
pub fn coerce(cell: Option<&Data>, kind: FieldKind) -> Value {
    match kind {
        FieldKind::Text => cell_text(cell).map(Value::Text).unwrap_or(Value::Null),
        FieldKind::Integer(blank) => match cell_number(cell) {
            Some(n) => Value::Int(n.round() as i64),
            None => blank_value(blank, Value::Int(0)),
        },
        FieldKind::Decimal(blank) => match cell_number(cell) {
            Some(n) => Value::Decimal(n),
            None => blank_value(blank, Value::Decimal(0.0)),
        },
        FieldKind::Date => cell_date(cell).map(Value::Date).unwrap_or(Value::Null),
        FieldKind::Code => match cell {
            Some(Data::Int(i)) => Value::Code(*i as i32),
            Some(Data::Float(f)) if f.fract() == 0.0 => Value::Code(*f as i32),
            _ => cell_text(cell)
                .and_then(|s| parse_code(&s))
                .map(Value::Code)
                .unwrap_or(Value::Null),
        },
    }
}

/// Parse user-entered text (e.g. `--set field=value`) for a field kind.
///
/// Unlike cell coercion this is strict: a value that cannot be read as the
/// field's type is an error instead of falling back to zero/null.
pub fn parse_input(input: &str, kind: FieldKind) -> Result<Value, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        return Ok(Value::Null);
    }

    match kind {
        FieldKind::Text => Ok(Value::Text(trimmed.to_string())),
        FieldKind::Integer(_) => parse_number(trimmed)
            .filter(|n| n.fract() == 0.0)
            .map(|n| Value::Int(n as i64))
            .ok_or_else(|| format!("'{}' is not a valid whole number", trimmed)),
        FieldKind::Decimal(_) => parse_number(trimmed)
            .map(Value::Decimal)
            .ok_or_else(|| format!("'{}' is not a valid number", trimmed)),
        FieldKind::Date => parse_date(trimmed)
            .map(Value::Date)
            .ok_or_else(|| format!("'{}' is not a valid date (use YYYY-MM-DD)", trimmed)),
        FieldKind::Code => parse_code(trimmed)
            .map(Value::Code)
            .ok_or_else(|| format!("'{}' is not a valid code", trimmed)),
    }
}

fn blank_value(blank: Blank, zero: Value) -> Value {
    match blank {
        Blank::Zero => zero,
        Blank::Null => Value::Null,
    }
}

fn cell_number(cell: Option<&Data>) -> Option<f64> {
    match cell? {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        Data::String(s) => parse_number(s),
        _ => None,
    }
}

fn cell_date(cell: Option<&Data>) -> Option<NaiveDate> {
    match cell? {
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()),
        Data::Float(f) => excel_serial_to_date(*f),
        Data::Int(i) => excel_serial_to_date(*i as f64),
        Data::DateTimeIso(s) | Data::String(s) => parse_date(s),
        _ => None,
    }
}

/// Parse a number, tolerating thousands separators ("1,250.50")
fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse code format: "3", "3.0", "3 (Doctorate)", "3 - Doctorate" -> Some(3)
fn parse_code(s: &str) -> Option<i32> {
    let s = s.trim();
    let end = s
        .find(|c: char| !(c.is_ascii_digit() || c == '-' || c == '.'))
        .unwrap_or(s.len());
    let num_part = s[..end].trim().trim_end_matches('-').trim();
    let value = num_part.parse::<f64>().ok()?;
    if value.fract() == 0.0 { Some(value as i32) } else { None }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // ISO datetimes: keep the date part
    let date_part = s.get(..10).filter(|p| p.len() == 10).unwrap_or(s);
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%d-%b-%Y", "%B %d, %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(date_part, fmt) {
            return Some(d);
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Convert an Excel serial date (1900 date system) to a calendar date
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..2_958_466.0).contains(&serial) {
        return None;
    }
    // Serial 60 is the fictitious 1900-02-29; 1899-12-30 as epoch absorbs it for later dates
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// Format a float without a trailing ".0" for whole numbers
fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}
