//! Declarative sheet layouts
//!
//! A layout fixes where each field lives in a government template:
//! - `Layout::Table`: one record per row, columns at fixed indices
//! - `Layout::Form`: one record built from fixed (row, col) cells
//!
//! All coordinates are 0-based and absolute (A1 = (0, 0)).

use regex::Regex;

use crate::records::RecordKind;

/// What a blank or non-numeric numeric cell becomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blank {
    Zero,
    Null,
}

/// Target type of a mapped field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer(Blank),
    Decimal(Blank),
    Date,
    Code,
}

impl FieldKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Integer(_) | FieldKind::Decimal(_))
    }
}

/// One column of a table layout
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub col: u32,
    pub field: &'static str,
    /// Header text used when exporting
    pub label: &'static str,
    pub kind: FieldKind,
}

impl ColumnSpec {
    pub const fn new(col: u32, field: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            col,
            field,
            label,
            kind,
        }
    }
}

/// One fixed cell of a form layout
#[derive(Debug, Clone, Copy)]
pub struct CellSpec {
    pub row: u32,
    pub col: u32,
    pub field: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl CellSpec {
    pub const fn new(
        row: u32,
        col: u32,
        field: &'static str,
        label: &'static str,
        kind: FieldKind,
    ) -> Self {
        Self {
            row,
            col,
            field,
            label,
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Layout {
    Table {
        /// First data row; rows above it are template headers
        first_row: u32,
        /// Identifying column; rows where it is blank are skipped
        key_col: u32,
        columns: &'static [ColumnSpec],
    },
    Form {
        cells: &'static [CellSpec],
        key_field: &'static str,
    },
}

impl Layout {
    /// Field name of the mandatory identifying field
    pub fn key_field(&self) -> &'static str {
        match self {
            Layout::Table { key_col, columns, .. } => columns
                .iter()
                .find(|c| c.col == *key_col)
                .map(|c| c.field)
                .unwrap_or(""),
            Layout::Form { key_field, .. } => key_field,
        }
    }

    pub fn fields(&self) -> Vec<FieldSpec> {
        match self {
            Layout::Table { columns, .. } => columns
                .iter()
                .map(|c| FieldSpec {
                    field: c.field,
                    label: c.label,
                    kind: c.kind,
                })
                .collect(),
            Layout::Form { cells, .. } => cells
                .iter()
                .map(|c| FieldSpec {
                    field: c.field,
                    label: c.label,
                    kind: c.kind,
                })
                .collect(),
        }
    }
}

/// Field name, label and type regardless of layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

/// Which worksheet(s) a sheet spec reads
#[derive(Debug, Clone)]
pub enum SheetSelector {
    Named(&'static str),
    Index(usize),
    /// Every sheet whose name matches; capture group 1 (if any) feeds `sheet_field`
    Matching(Regex),
}

impl SheetSelector {
    /// Names of the workbook sheets this selector picks, in workbook order
    pub fn select(&self, sheet_names: &[String]) -> Vec<String> {
        match self {
            SheetSelector::Named(name) => sheet_names
                .iter()
                .filter(|s| s.trim().eq_ignore_ascii_case(name))
                .cloned()
                .collect(),
            SheetSelector::Index(idx) => sheet_names.get(*idx).cloned().into_iter().collect(),
            SheetSelector::Matching(re) => sheet_names
                .iter()
                .filter(|s| re.is_match(s.trim()))
                .cloned()
                .collect(),
        }
    }

    /// Value stored in `sheet_field` for a selected sheet
    pub fn sheet_value(&self, sheet_name: &str) -> String {
        let trimmed = sheet_name.trim();
        if let SheetSelector::Matching(re) = self {
            if let Some(m) = re.captures(trimmed).and_then(|c| c.get(1)) {
                return m.as_str().to_string();
            }
        }
        trimmed.to_string()
    }
}

impl std::fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetSelector::Named(name) => write!(f, "sheet '{}'", name),
            SheetSelector::Index(idx) => write!(f, "sheet #{}", idx + 1),
            SheetSelector::Matching(re) => write!(f, "sheets matching '{}'", re.as_str()),
        }
    }
}

/// Auto-calculated total: `field = sum(sum_of)`
#[derive(Debug, Clone, Copy)]
pub struct Derived {
    pub field: &'static str,
    pub sum_of: &'static [&'static str],
}

/// How one kind of record is laid out in the workbook
#[derive(Debug, Clone)]
pub struct SheetSpec {
    pub kind: RecordKind,
    pub selector: SheetSelector,
    pub layout: Layout,
    /// Field that receives the sheet name (or its captured code)
    pub sheet_field: Option<&'static str>,
    /// Sheet name written on export; `{}` stands for the `sheet_field` value
    pub export_name: &'static str,
    pub derived: &'static [Derived],
}

impl SheetSpec {
    /// Worksheet name for records carrying `sheet_value` in `sheet_field`
    pub fn export_sheet_name(&self, sheet_value: Option<&str>) -> String {
        match sheet_value {
            Some(value) if self.export_name.contains("{}") => self.export_name.replace("{}", value),
            _ => self.export_name.replace("{}", "Unassigned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_named_selector_ignores_case_and_padding() {
        let sheets = names(&["Instructions", " a1 ", "A2"]);
        assert_eq!(SheetSelector::Named("A1").select(&sheets), vec![" a1 "]);
        assert!(SheetSelector::Named("B").select(&sheets).is_empty());
    }

    #[test]
    fn test_matching_selector_captures_code() {
        let selector = SheetSelector::Matching(Regex::new(r"^GROUP\s+([A-E]\d?)$").unwrap());
        let sheets = names(&["Instructions", "GROUP A1", "GROUP B", "Codes"]);
        assert_eq!(selector.select(&sheets), vec!["GROUP A1", "GROUP B"]);
        assert_eq!(selector.sheet_value("GROUP A1"), "A1");
    }

    #[test]
    fn test_index_selector_out_of_range() {
        let sheets = names(&["Only"]);
        assert_eq!(SheetSelector::Index(0).select(&sheets), vec!["Only"]);
        assert!(SheetSelector::Index(3).select(&sheets).is_empty());
    }
}
