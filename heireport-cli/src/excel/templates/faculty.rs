//! Form E2: faculty profiles, one sheet per faculty group ("GROUP A1" .. "GROUP E")

use once_cell::sync::Lazy;
use regex::Regex;

use crate::excel::layout::FieldKind::{Code, Decimal, Integer, Text};
use crate::excel::layout::{Blank, ColumnSpec, Derived, FieldKind, Layout, SheetSelector, SheetSpec};
use crate::records::RecordKind;

const LOAD: FieldKind = Decimal(Blank::Zero);

static GROUP_SHEET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^GROUP\s+([A-E]\d?)$").expect("faculty group sheet pattern")
});

const FACULTY: &[ColumnSpec] = &[
    ColumnSpec::new(0, "name", "Name of Faculty (Last, First, Middle)", Text),
    ColumnSpec::new(1, "generic_faculty_rank", "Generic Faculty Rank", Code),
    ColumnSpec::new(2, "home_college", "Home College", Text),
    ColumnSpec::new(3, "home_department", "Home Department", Text),
    ColumnSpec::new(4, "is_tenured", "Tenure", Code),
    ColumnSpec::new(5, "ssl_salary_grade", "SSL Salary Grade", Integer(Blank::Null)),
    ColumnSpec::new(6, "annual_basic_salary", "Annual Basic Salary", Decimal(Blank::Null)),
    ColumnSpec::new(7, "on_leave_without_pay", "On Leave Without Pay", Code),
    ColumnSpec::new(8, "full_time_equivalent", "Full-Time Equivalent", Decimal(Blank::Null)),
    ColumnSpec::new(9, "gender", "Gender", Code),
    ColumnSpec::new(10, "highest_degree_attained", "Highest Degree Attained", Code),
    ColumnSpec::new(11, "pursuing_next_degree", "Pursuing Next Degree", Code),
    ColumnSpec::new(12, "discipline_teaching_load_1", "Discipline of Teaching Load 1", Code),
    ColumnSpec::new(13, "discipline_teaching_load_2", "Discipline of Teaching Load 2", Code),
    ColumnSpec::new(14, "discipline_bachelors", "Bachelor's Discipline", Code),
    ColumnSpec::new(15, "discipline_masters", "Master's Discipline", Code),
    ColumnSpec::new(16, "discipline_doctorate", "Doctorate Discipline", Code),
    ColumnSpec::new(17, "masters_with_thesis", "Master's with Thesis", Code),
    ColumnSpec::new(18, "doctorate_with_dissertation", "Doctorate with Dissertation", Code),
    ColumnSpec::new(19, "undergrad_lab_credit_units", "UG Lab Credit Units", LOAD),
    ColumnSpec::new(20, "undergrad_lecture_credit_units", "UG Lecture Credit Units", LOAD),
    ColumnSpec::new(21, "undergrad_total_credit_units", "UG Total Credit Units", LOAD),
    ColumnSpec::new(22, "undergrad_lab_hours_per_week", "UG Lab Hours/Week", LOAD),
    ColumnSpec::new(23, "undergrad_lecture_hours_per_week", "UG Lecture Hours/Week", LOAD),
    ColumnSpec::new(24, "undergrad_total_hours_per_week", "UG Total Hours/Week", LOAD),
    ColumnSpec::new(25, "undergrad_lab_contact_hours", "UG Lab Contact Hours", LOAD),
    ColumnSpec::new(26, "undergrad_lecture_contact_hours", "UG Lecture Contact Hours", LOAD),
    ColumnSpec::new(27, "undergrad_total_contact_hours", "UG Total Contact Hours", LOAD),
    ColumnSpec::new(28, "graduate_lab_credit_units", "Grad Lab Credit Units", LOAD),
    ColumnSpec::new(29, "graduate_lecture_credit_units", "Grad Lecture Credit Units", LOAD),
    ColumnSpec::new(30, "graduate_total_credit_units", "Grad Total Credit Units", LOAD),
    ColumnSpec::new(31, "graduate_lab_contact_hours", "Grad Lab Contact Hours", LOAD),
    ColumnSpec::new(32, "graduate_lecture_contact_hours", "Grad Lecture Contact Hours", LOAD),
    ColumnSpec::new(33, "graduate_total_contact_hours", "Grad Total Contact Hours", LOAD),
    ColumnSpec::new(34, "research_load", "Research Load", LOAD),
    ColumnSpec::new(35, "extension_services_load", "Extension Services Load", LOAD),
    ColumnSpec::new(36, "study_load", "Study Load", LOAD),
    ColumnSpec::new(37, "production_load", "Production Load", LOAD),
    ColumnSpec::new(38, "administrative_load", "Administrative Load", LOAD),
    ColumnSpec::new(39, "other_load_credits", "Other Load Credits", LOAD),
    ColumnSpec::new(40, "total_work_load", "Total Work Load", LOAD),
];

const TOTALS: &[Derived] = &[
    Derived {
        field: "undergrad_total_credit_units",
        sum_of: &["undergrad_lab_credit_units", "undergrad_lecture_credit_units"],
    },
    Derived {
        field: "undergrad_total_hours_per_week",
        sum_of: &["undergrad_lab_hours_per_week", "undergrad_lecture_hours_per_week"],
    },
    Derived {
        field: "undergrad_total_contact_hours",
        sum_of: &["undergrad_lab_contact_hours", "undergrad_lecture_contact_hours"],
    },
    Derived {
        field: "graduate_total_credit_units",
        sum_of: &["graduate_lab_credit_units", "graduate_lecture_credit_units"],
    },
    Derived {
        field: "graduate_total_contact_hours",
        sum_of: &["graduate_lab_contact_hours", "graduate_lecture_contact_hours"],
    },
    Derived {
        field: "total_work_load",
        sum_of: &[
            "undergrad_total_credit_units",
            "graduate_total_credit_units",
            "research_load",
            "extension_services_load",
            "study_load",
            "production_load",
            "administrative_load",
            "other_load_credits",
        ],
    },
];

pub fn sheets() -> Vec<SheetSpec> {
    vec![SheetSpec {
        kind: RecordKind::Faculty,
        selector: SheetSelector::Matching(GROUP_SHEET.clone()),
        layout: Layout::Table {
            first_row: 9,
            key_col: 0,
            columns: FACULTY,
        },
        sheet_field: Some("faculty_group"),
        export_name: "GROUP {}",
        derived: TOTALS,
    }]
}
