//! Export stored records into a template workbook

mod handler;

pub use handler::handle_export_command;

use std::path::PathBuf;

use clap::Args;

use crate::excel::TemplateId;

#[derive(Args)]
pub struct ExportArgs {
    /// Workbook template to fill
    #[arg(value_enum)]
    pub template: TemplateId,

    /// Institution whose records are exported
    #[arg(long)]
    pub institution: String,

    /// Output file (.xlsx)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Overwrite an existing output file
    #[arg(short, long)]
    pub force: bool,
}
