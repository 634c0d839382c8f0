//! Workbook upload and validation

mod handler;

pub use handler::{handle_upload_command, handle_validate_command};

use std::path::PathBuf;

use clap::Args;

use crate::excel::TemplateId;
use crate::submit::SubmitMode;

#[derive(Args)]
pub struct UploadArgs {
    /// Workbook template
    #[arg(value_enum)]
    pub template: TemplateId,

    /// Workbook to read (.xlsx or .xls)
    pub file: PathBuf,

    /// Existing institution the records belong to
    #[arg(long)]
    pub institution: Option<String>,

    /// Submission mode (defaults to the configured mode)
    #[arg(long, value_enum)]
    pub mode: Option<SubmitMode>,

    /// Map and validate without submitting
    #[arg(long)]
    pub dry_run: bool,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Workbook template
    #[arg(value_enum)]
    pub template: TemplateId,

    /// Workbook to read (.xlsx or .xls)
    pub file: PathBuf,
}
