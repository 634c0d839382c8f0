//! Record command handlers

use anyhow::{Context, Result};
use colored::*;
use dialoguer::Confirm;
use log::info;
use serde_json::Value;

use super::{DeleteArgs, GetArgs, ListArgs, UpdateArgs};
use crate::api::{ApiClient, Executor, ListQuery, Operation};
use crate::cli::output::{OutputFormat, format_output};
use crate::records::{Record, apply_edits, template_payload};

fn client() -> Result<ApiClient> {
    ApiClient::from_config(crate::global_config())
}

pub async fn handle_list_command(args: ListArgs) -> Result<()> {
    let query = ListQuery {
        page: args.page.max(1),
        per_page: args.per_page.clamp(1, 100),
        search: args.search,
        institution_id: args.institution,
    };

    let page = client()?
        .list(args.resource, &query)
        .await
        .with_context(|| format!("Failed to list {}", args.resource))?;

    println!("{}", format_output(&Value::Array(page.items.clone()), args.format)?);

    if args.format == OutputFormat::Table {
        let total = page
            .total
            .map(|t| format!(", {} total", t))
            .unwrap_or_default();
        eprintln!(
            "{}",
            format!("Page {} of {}{}", page.current_page, page.last_page, total).dimmed()
        );
        if page.has_next() {
            eprintln!("{}", format!("Next: --page {}", page.current_page + 1).dimmed());
        }
    }
    Ok(())
}

pub async fn handle_get_command(args: GetArgs) -> Result<()> {
    let record = client()?
        .get(args.resource, &args.id)
        .await
        .with_context(|| format!("Failed to fetch {}/{}", args.resource, args.id))?;
    println!("{}", format_output(&record, args.format)?);
    Ok(())
}

pub async fn handle_update_command(args: UpdateArgs) -> Result<()> {
    let kind = args
        .resource
        .record_kind()
        .ok_or_else(|| anyhow::anyhow!("{} records cannot be edited here", args.resource))?;
    let client = client()?;

    let current = client
        .get(args.resource, &args.id)
        .await
        .with_context(|| format!("Failed to fetch {}/{}", args.resource, args.id))?;
    let mut record = Record::from_json(kind, &current);

    let changes = apply_edits(&mut record, &args.set)?;
    if changes.is_empty() {
        println!("No changes");
        return Ok(());
    }

    for change in &changes {
        println!(
            "  {}: {} → {}",
            change.field.bold(),
            display(&change.before).dimmed(),
            display(&change.after).green()
        );
    }

    if !args.yes
        && !Confirm::new()
            .with_prompt(format!("Save {} change(s)?", changes.len()))
            .default(true)
            .interact()?
    {
        println!("Cancelled");
        return Ok(());
    }

    let operation = Operation::update(args.resource, &args.id, template_payload(&record));
    client
        .execute(&operation)
        .await
        .with_context(|| format!("Failed to update {}/{}", args.resource, args.id))?;

    info!("Updated {}/{}", args.resource, args.id);
    println!("{} Updated {}/{}", "✓".green(), args.resource, args.id);
    Ok(())
}

pub async fn handle_delete_command(args: DeleteArgs) -> Result<()> {
    if !args.yes
        && !Confirm::new()
            .with_prompt(format!("Delete {}/{}?", args.resource, args.id))
            .default(false)
            .interact()?
    {
        println!("Cancelled");
        return Ok(());
    }

    let operation = Operation::delete(args.resource, &args.id);
    client()?
        .execute(&operation)
        .await
        .with_context(|| format!("Failed to delete {}/{}", args.resource, args.id))?;

    println!("{} Deleted {}/{}", "✓".green(), args.resource, args.id);
    Ok(())
}

fn display(value: &crate::records::Value) -> String {
    if value.is_null() {
        "(empty)".to_string()
    } else {
        value.to_string()
    }
}
