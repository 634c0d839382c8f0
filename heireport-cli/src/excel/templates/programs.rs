//! Form B/C: curricular programs, one sheet per program level

use once_cell::sync::Lazy;
use regex::Regex;

use crate::excel::layout::FieldKind::{Code, Decimal, Integer, Text};
use crate::excel::layout::{Blank, ColumnSpec, Derived, FieldKind, Layout, SheetSelector, SheetSpec};
use crate::records::RecordKind;

const COUNT: FieldKind = Integer(Blank::Zero);

static LEVEL_SHEET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(pre-baccalaureate|baccalaureate|post-baccalaureate|masters?|doctoral|doctorate)$")
        .expect("program level sheet pattern")
});

const PROGRAMS: &[ColumnSpec] = &[
    ColumnSpec::new(0, "program_name", "Program Name", Text),
    ColumnSpec::new(1, "program_code", "Program Code", Text),
    ColumnSpec::new(2, "major_name", "Major", Text),
    ColumnSpec::new(3, "major_code", "Major Code", Text),
    ColumnSpec::new(4, "category", "Program Category", Code),
    ColumnSpec::new(5, "serial", "Authority Serial", Text),
    ColumnSpec::new(6, "year", "Authority Year", Integer(Blank::Null)),
    ColumnSpec::new(7, "is_thesis_dissertation_required", "Thesis/Dissertation", Code),
    ColumnSpec::new(8, "program_status", "Program Status", Code),
    ColumnSpec::new(9, "calendar_use_code", "Calendar", Code),
    ColumnSpec::new(10, "program_normal_length_in_years", "Normal Length (years)", Integer(Blank::Null)),
    ColumnSpec::new(11, "lab_units", "Lab Units", COUNT),
    ColumnSpec::new(12, "lecture_units", "Lecture Units", COUNT),
    ColumnSpec::new(13, "total_units", "Total Units", COUNT),
    ColumnSpec::new(14, "tuition_per_unit", "Tuition per Unit", Decimal(Blank::Null)),
    ColumnSpec::new(15, "program_fee", "Program Fee", Decimal(Blank::Null)),
    ColumnSpec::new(16, "first_year_male", "1st Year Male", COUNT),
    ColumnSpec::new(17, "first_year_female", "1st Year Female", COUNT),
    ColumnSpec::new(18, "second_year_male", "2nd Year Male", COUNT),
    ColumnSpec::new(19, "second_year_female", "2nd Year Female", COUNT),
    ColumnSpec::new(20, "third_year_male", "3rd Year Male", COUNT),
    ColumnSpec::new(21, "third_year_female", "3rd Year Female", COUNT),
    ColumnSpec::new(22, "fourth_year_male", "4th Year Male", COUNT),
    ColumnSpec::new(23, "fourth_year_female", "4th Year Female", COUNT),
    ColumnSpec::new(24, "fifth_year_male", "5th Year Male", COUNT),
    ColumnSpec::new(25, "fifth_year_female", "5th Year Female", COUNT),
    ColumnSpec::new(26, "sixth_year_male", "6th Year Male", COUNT),
    ColumnSpec::new(27, "sixth_year_female", "6th Year Female", COUNT),
    ColumnSpec::new(28, "subtotal_male", "Subtotal Male", COUNT),
    ColumnSpec::new(29, "subtotal_female", "Subtotal Female", COUNT),
    ColumnSpec::new(30, "grand_total", "Grand Total", COUNT),
    ColumnSpec::new(31, "graduates_males", "Graduates Male", COUNT),
    ColumnSpec::new(32, "graduates_females", "Graduates Female", COUNT),
    ColumnSpec::new(33, "graduates_total", "Graduates Total", COUNT),
    ColumnSpec::new(34, "externally_funded_merit_scholars", "Externally Funded Scholars", COUNT),
    ColumnSpec::new(35, "internally_funded_grantees", "Internally Funded Grantees", COUNT),
    ColumnSpec::new(36, "suc_funded_grantees", "SUC Funded Grantees", COUNT),
];

/// Order matters: subtotals feed the grand total
const TOTALS: &[Derived] = &[
    Derived {
        field: "total_units",
        sum_of: &["lab_units", "lecture_units"],
    },
    Derived {
        field: "subtotal_male",
        sum_of: &[
            "first_year_male",
            "second_year_male",
            "third_year_male",
            "fourth_year_male",
            "fifth_year_male",
            "sixth_year_male",
        ],
    },
    Derived {
        field: "subtotal_female",
        sum_of: &[
            "first_year_female",
            "second_year_female",
            "third_year_female",
            "fourth_year_female",
            "fifth_year_female",
            "sixth_year_female",
        ],
    },
    Derived {
        field: "grand_total",
        sum_of: &["subtotal_male", "subtotal_female"],
    },
    Derived {
        field: "graduates_total",
        sum_of: &["graduates_males", "graduates_females"],
    },
];

pub fn sheets() -> Vec<SheetSpec> {
    vec![SheetSpec {
        kind: RecordKind::Program,
        selector: SheetSelector::Matching(LEVEL_SHEET.clone()),
        layout: Layout::Table {
            first_row: 10,
            key_col: 0,
            columns: PROGRAMS,
        },
        sheet_field: Some("program_level"),
        export_name: "{}",
        derived: TOTALS,
    }]
}
