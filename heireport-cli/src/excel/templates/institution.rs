//! Form A: institutional profile (sheet A1) and campuses (sheet A2)

use crate::excel::layout::FieldKind::{Code, Decimal, Integer, Text};
use crate::excel::layout::{Blank, CellSpec, ColumnSpec, Layout, SheetSelector, SheetSpec};
use crate::records::RecordKind;

/// Values sit in column C, labels in column B
const VALUE_COL: u32 = 2;

const PROFILE: &[CellSpec] = &[
    CellSpec::new(4, VALUE_COL, "uii", "Unique Institutional Identifier", Text),
    CellSpec::new(5, VALUE_COL, "name", "Institution Name", Text),
    CellSpec::new(6, VALUE_COL, "short_name", "Institution Short Name", Text),
    CellSpec::new(7, VALUE_COL, "region", "Region", Text),
    CellSpec::new(8, VALUE_COL, "address_street", "Street", Text),
    CellSpec::new(9, VALUE_COL, "municipality_city", "Municipality/City", Text),
    CellSpec::new(10, VALUE_COL, "province", "Province", Text),
    CellSpec::new(11, VALUE_COL, "postal_code", "Postal/Zip Code", Text),
    CellSpec::new(12, VALUE_COL, "institutional_telephone", "Institutional Telephone", Text),
    CellSpec::new(13, VALUE_COL, "institutional_fax", "Institutional Fax", Text),
    CellSpec::new(14, VALUE_COL, "head_telephone", "Institutional Head's Telephone", Text),
    CellSpec::new(15, VALUE_COL, "institutional_email", "Institutional Email", Text),
    CellSpec::new(16, VALUE_COL, "institutional_website", "Institutional Website", Text),
    CellSpec::new(17, VALUE_COL, "year_established", "Year Established", Integer(Blank::Null)),
    CellSpec::new(18, VALUE_COL, "sec_registration", "SEC Registration", Text),
    CellSpec::new(19, VALUE_COL, "year_granted_approved", "Year Granted/Approved", Integer(Blank::Null)),
    CellSpec::new(20, VALUE_COL, "year_converted_college", "Year Converted to College", Integer(Blank::Null)),
    CellSpec::new(21, VALUE_COL, "year_converted_university", "Year Converted to University", Integer(Blank::Null)),
    CellSpec::new(22, VALUE_COL, "head_name", "Name of Institutional Head", Text),
    CellSpec::new(23, VALUE_COL, "head_title", "Title of Head", Text),
    CellSpec::new(24, VALUE_COL, "head_education", "Highest Educational Attainment of Head", Text),
    CellSpec::new(25, VALUE_COL, "ownership_code", "Ownership", Code),
];

const CAMPUSES: &[ColumnSpec] = &[
    ColumnSpec::new(1, "name", "Campus Name", Text),
    ColumnSpec::new(2, "short_name", "Short Name", Text),
    ColumnSpec::new(3, "region", "Region", Text),
    ColumnSpec::new(4, "province_municipality", "Province/City/Municipality", Text),
    ColumnSpec::new(5, "address", "Address", Text),
    ColumnSpec::new(6, "year_first_operation", "Year of First Operation", Integer(Blank::Null)),
    ColumnSpec::new(7, "land_area_hectares", "Land Area (hectares)", Decimal(Blank::Null)),
    ColumnSpec::new(8, "distance_from_main_km", "Distance from Main Campus (km)", Decimal(Blank::Null)),
    ColumnSpec::new(9, "autonomous_code", "Autonomous from Main Campus", Code),
    ColumnSpec::new(10, "position_title", "Position Title of Campus Head", Text),
    ColumnSpec::new(11, "head_name", "Name of Campus Head", Text),
    ColumnSpec::new(12, "head_title", "Title of Campus Head", Text),
    ColumnSpec::new(13, "former_name", "Former Name", Text),
];

pub fn sheets() -> Vec<SheetSpec> {
    vec![
        SheetSpec {
            kind: RecordKind::Institution,
            selector: SheetSelector::Named("A1"),
            layout: Layout::Form {
                cells: PROFILE,
                key_field: "name",
            },
            sheet_field: None,
            export_name: "A1",
            derived: &[],
        },
        SheetSpec {
            kind: RecordKind::Campus,
            selector: SheetSelector::Named("A2"),
            layout: Layout::Table {
                first_row: 13,
                key_col: 1,
                columns: CAMPUSES,
            },
            sheet_field: None,
            export_name: "A2",
            derived: &[],
        },
    ]
}
