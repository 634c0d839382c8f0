//! Excel import/export for government report templates

pub mod cells;
pub mod layout;
pub mod reader;
pub mod templates;
pub mod upload;
pub mod writer;

pub use reader::{MappedWorkbook, SheetSummary, map_sheet, map_workbook, read_workbook};
pub use templates::{Template, TemplateId};
pub use upload::{UploadError, UploadPolicy};
pub use writer::{ExportSummary, write_workbook};
