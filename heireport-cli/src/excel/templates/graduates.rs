//! List of graduates: first sheet, one header row

use crate::excel::layout::FieldKind::{Code, Date, Integer, Text};
use crate::excel::layout::{Blank, ColumnSpec, Layout, SheetSelector, SheetSpec};
use crate::records::RecordKind;

const GRADUATES: &[ColumnSpec] = &[
    ColumnSpec::new(0, "student_id", "Student ID", Text),
    ColumnSpec::new(1, "date_of_birth", "Date of Birth", Date),
    ColumnSpec::new(2, "last_name", "Last Name", Text),
    ColumnSpec::new(3, "first_name", "First Name", Text),
    ColumnSpec::new(4, "middle_name", "Middle Name", Text),
    ColumnSpec::new(5, "sex", "Sex", Code),
    ColumnSpec::new(6, "date_graduated", "Date Graduated", Date),
    ColumnSpec::new(7, "program_name", "Program Name", Text),
    ColumnSpec::new(8, "program_major", "Major", Text),
    ColumnSpec::new(9, "authority_number", "Authority to Operate/Graduate", Text),
    ColumnSpec::new(10, "year_granted", "Year Granted", Integer(Blank::Null)),
];

pub fn sheets() -> Vec<SheetSpec> {
    vec![SheetSpec {
        kind: RecordKind::Graduate,
        selector: SheetSelector::Index(0),
        layout: Layout::Table {
            first_row: 1,
            key_col: 2,
            columns: GRADUATES,
        },
        sheet_field: None,
        export_name: "Graduates",
        derived: &[],
    }]
}
