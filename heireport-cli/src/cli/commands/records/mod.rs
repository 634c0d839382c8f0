//! Listing and editing records held by the API

mod handler;

pub use handler::{
    handle_delete_command, handle_get_command, handle_list_command, handle_update_command,
};

use clap::Args;

use crate::api::Resource;
use crate::cli::output::OutputFormat;

#[derive(Args)]
pub struct ListArgs {
    #[arg(value_enum)]
    pub resource: Resource,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long, default_value_t = 25)]
    pub per_page: u32,

    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,

    /// Only records of this institution
    #[arg(long)]
    pub institution: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct GetArgs {
    #[arg(value_enum)]
    pub resource: Resource,

    pub id: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[arg(value_enum)]
    pub resource: Resource,

    pub id: String,

    /// Field assignment, e.g. --set research_load=3 (repeatable)
    #[arg(long = "set", value_parser = parse_assignment, required = true)]
    pub set: Vec<(String, String)>,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[arg(value_enum)]
    pub resource: Resource,

    pub id: String,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{}'", s))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{}'", s));
    }
    Ok((field.to_string(), value.to_string()))
}
