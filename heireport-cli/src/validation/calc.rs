//! Auto-calculated totals
//!
//! Totals declared by a template are recomputed from their parts after a
//! workbook is mapped and after every edit, so a stale or hand-typed total in
//! the source sheet never reaches the API.

use crate::excel::layout::Derived;
use crate::records::{Record, Value};

/// Recompute every derived field of a record, in declaration order
pub fn apply_totals(record: &mut Record, derived: &[Derived]) {
    for total in derived {
        let value = sum_fields(record, total.sum_of);
        record.set(total.field, value);
    }
}

/// Sum the numeric parts of a record. Null parts count as zero; the sum is an
/// integer when every non-null part is an integer and it fits in `i64`.
fn sum_fields(record: &Record, parts: &[&str]) -> Value {
    let mut int_sum: Option<i64> = Some(0);
    let mut float_sum: f64 = 0.0;

    for part in parts {
        match record.get(part) {
            Value::Int(i) => {
                int_sum = int_sum.and_then(|sum| sum.checked_add(*i));
                float_sum += *i as f64;
            }
            Value::Decimal(d) => {
                int_sum = None;
                float_sum += d;
            }
            _ => {}
        }
    }

    if let Some(sum) = int_sum {
        Value::Int(sum)
    } else {
        // Keep hour/unit sums free of binary noise (0.1 + 0.2)
        Value::Decimal((float_sum * 1_000_000.0).round() / 1_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordKind;

    const UNITS: &[Derived] = &[
        Derived {
            field: "total_units",
            sum_of: &["lab_units", "lecture_units"],
        },
        Derived {
            field: "grand_total",
            sum_of: &["total_units", "bonus"],
        },
    ];

    #[test]
    fn test_totals_overwrite_stale_values() {
        let mut record = Record::new(RecordKind::Program, "Baccalaureate", 11);
        record.set("lab_units", Value::Int(6));
        record.set("lecture_units", Value::Int(150));
        record.set("total_units", Value::Int(999));

        apply_totals(&mut record, UNITS);

        assert_eq!(record.get("total_units"), &Value::Int(156));
        // Chained: grand_total sees the recomputed total, missing "bonus" counts as zero
        assert_eq!(record.get("grand_total"), &Value::Int(156));
    }

    #[test]
    fn test_decimal_parts_produce_decimal_total() {
        let mut record = Record::new(RecordKind::Faculty, "GROUP A1", 10);
        record.set("lab_units", Value::Decimal(0.1));
        record.set("lecture_units", Value::Decimal(0.2));

        apply_totals(&mut record, &UNITS[..1]);

        assert_eq!(record.get("total_units"), &Value::Decimal(0.3));
    }

    #[test]
    fn test_integer_overflow_falls_back_to_decimal() {
        let mut record = Record::new(RecordKind::Program, "Baccalaureate", 11);
        record.set("lab_units", Value::Int(i64::MAX));
        record.set("lecture_units", Value::Int(i64::MAX));

        apply_totals(&mut record, &UNITS[..1]);

        match record.get("total_units") {
            Value::Decimal(total) => assert!(*total > 0.0),
            other => panic!("expected a decimal total, got {:?}", other),
        }
    }
}
