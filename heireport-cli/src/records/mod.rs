//! Record types shared by ingestion, validation, submission and export

pub mod edit;
mod record;
mod value;

pub use edit::{EditError, FieldChange, apply_edits, template_payload};
pub use record::*;
pub use value::*;
