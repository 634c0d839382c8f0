//! Export command handler

use anyhow::{Context, Result};
use colored::*;
use log::debug;

use super::ExportArgs;
use crate::api::ApiClient;
use crate::excel::{Template, write_workbook};
use crate::records::{Record, RecordKind};

pub async fn handle_export_command(args: ExportArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    let client = ApiClient::from_config(crate::global_config())?;
    let template = Template::load(args.template);
    let mut records = Vec::new();

    for kind in template.kinds() {
        let resource = kind.resource();
        let items = if kind == RecordKind::Institution {
            vec![
                client
                    .get(resource, &args.institution)
                    .await
                    .with_context(|| format!("Failed to fetch institution {}", args.institution))?,
            ]
        } else {
            client
                .list_all(resource, Some(args.institution.as_str()))
                .await
                .with_context(|| format!("Failed to list {}", resource))?
        };
        debug!("Fetched {} {} record(s)", items.len(), kind);
        records.extend(items.iter().map(|item| Record::from_json(kind, item)));
    }

    let summary = write_workbook(&records, &template, &args.output)?;
    if summary.sheets.is_empty() {
        println!("{}", "No records to export; wrote an empty workbook".yellow());
    }
    for (sheet, count) in &summary.sheets {
        println!("  {:<24} {:>5}", sheet, count);
    }
    for message in &summary.skipped {
        println!("  {} {}", "skipped:".yellow(), message);
    }
    println!(
        "{} Exported {} of {} record(s) to {}",
        "✓".green(),
        summary.written(),
        records.len(),
        args.output.display().to_string().bright_green()
    );
    Ok(())
}
