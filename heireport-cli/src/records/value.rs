//! Field value representation for report records

use chrono::NaiveDate;

/// A single field value, as read from a workbook cell or an API payload
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Null/empty value
    #[default]
    Null,
    /// Free text
    Text(String),
    /// Whole number (counts, years, salary grades)
    Int(i64),
    /// Decimal number (units, hours, money)
    Decimal(f64),
    /// Calendar date
    Date(NaiveDate),
    /// Coded enumeration from the government code tables
    Code(i32),
}

impl Value {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null, or text that is only whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view used by range checks and totals
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Decimal(d) => Some(*d),
            Value::Code(c) => Some(*c as f64),
            _ => None,
        }
    }

    /// Convert to JSON value for API calls
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => serde_json::json!(*i),
            Value::Decimal(d) => serde_json::json!(*d),
            Value::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
            Value::Code(c) => serde_json::json!(*c),
        }
    }

    /// Parse from a JSON value returned by the API
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Int(*b as i64),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Decimal(f)
                } else {
                    Value::Null
                }
            }
            serde_json::Value::String(s) => {
                if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    return Value::Date(d);
                }
                Value::Text(s.clone())
            }
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Value::Text(json.to_string())
            }
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Code(c) => write!(f, "{}", c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json_formats_dates_as_iso() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        assert_eq!(Value::Date(date).to_json(), serde_json::json!("2023-06-15"));
        assert_eq!(Value::Code(3).to_json(), serde_json::json!(3));
        assert_eq!(Value::Null.to_json(), serde_json::Value::Null);
    }

    #[test]
    fn test_from_json_recognises_dates_and_numbers() {
        assert_eq!(
            Value::from_json(&serde_json::json!("1999-01-02")),
            Value::Date(NaiveDate::from_ymd_opt(1999, 1, 2).unwrap())
        );
        assert_eq!(Value::from_json(&serde_json::json!(12)), Value::Int(12));
        assert_eq!(Value::from_json(&serde_json::json!(1.5)), Value::Decimal(1.5));
        assert_eq!(
            Value::from_json(&serde_json::json!("Main Campus")),
            Value::Text("Main Campus".into())
        );
    }

    #[test]
    fn test_blank_detection() {
        assert!(Value::Null.is_blank());
        assert!(Value::Text("   ".into()).is_blank());
        assert!(!Value::Int(0).is_blank());
    }
}
