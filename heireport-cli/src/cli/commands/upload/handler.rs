//! Upload and validate command handlers

use std::io::Write;

use anyhow::Result;
use colored::*;
use dialoguer::Confirm;
use is_terminal::IsTerminal;

use super::{UploadArgs, ValidateArgs};
use crate::api::ApiClient;
use crate::excel::{MappedWorkbook, Template, UploadPolicy, read_workbook};
use crate::submit::{Progress, SubmitError, SubmitOptions, render_bar, upload_workbook};
use crate::validation::{RecordIssue, validate_records};

const BAR_WIDTH: usize = 30;

pub async fn handle_upload_command(args: UploadArgs) -> Result<()> {
    let config = crate::global_config();
    let template = Template::load(args.template);
    let policy = UploadPolicy::new(config.upload.max_file_bytes);
    let options = SubmitOptions {
        mode: args.mode.unwrap_or(config.upload.mode),
        batch_size: config.upload.batch_size,
        institution_id: args.institution.clone(),
        dry_run: args.dry_run,
    };

    let client = ApiClient::from_config(config)?;
    if !options.dry_run && !client.has_token() {
        anyhow::bail!("Not logged in. Run 'heireport auth login' first.");
    }

    let mut summary_shown = false;
    let yes = args.yes;
    let base_url = client.base_url().to_string();
    let mut confirm = |mapped: &MappedWorkbook| {
        print_mapping_summary(mapped);
        summary_shown = true;
        if yes {
            return true;
        }
        Confirm::new()
            .with_prompt(format!(
                "Submit {} record(s) to {}?",
                mapped.records.len(),
                base_url
            ))
            .default(true)
            .interact()
            .unwrap_or(false)
    };

    let interactive = std::io::stderr().is_terminal();
    let mut on_progress = |progress: Progress| draw_progress(progress, interactive);

    let outcome = upload_workbook(
        &client,
        &args.file,
        &template,
        &policy,
        &options,
        &mut confirm,
        &mut on_progress,
    )
    .await;

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(err) => {
            if interactive {
                eprintln!();
            }
            if let Some(SubmitError::Invalid { issues }) = err.downcast_ref::<SubmitError>() {
                print_issues(issues);
            }
            return Err(err);
        }
    };

    if !summary_shown {
        print_mapping_summary(&outcome.mapped);
    }

    match outcome.report {
        Some(report) => {
            println!(
                "{} Submitted {} record(s) in {} request(s)",
                "✓".green(),
                report.submitted.to_string().bold(),
                report.calls
            );
            if args.institution.is_none() {
                if let Some(id) = report.institution_id {
                    println!("Institution id: {}", id.cyan());
                }
            }
        }
        None if outcome.mapped.is_empty() => {
            println!("{}", "Nothing to submit".yellow());
        }
        None if options.dry_run => {
            println!("{} Dry run: all records are valid, nothing was sent", "✓".green());
        }
        None => println!("Cancelled"),
    }
    Ok(())
}

pub fn handle_validate_command(args: ValidateArgs) -> Result<()> {
    let config = crate::global_config();
    let template = Template::load(args.template);
    UploadPolicy::new(config.upload.max_file_bytes).check(&args.file)?;

    let mapped = read_workbook(&args.file, &template)?;
    print_mapping_summary(&mapped);

    let issues = validate_records(&mapped.records);
    if issues.is_empty() {
        println!("{} All {} record(s) are valid", "✓".green(), mapped.records.len());
        return Ok(());
    }

    print_issues(&issues);
    anyhow::bail!("{} record(s) failed validation", issues.len())
}

fn print_mapping_summary(mapped: &MappedWorkbook) {
    for sheet in &mapped.sheets {
        let skipped = if sheet.rows_skipped > 0 {
            format!(", {} skipped", sheet.rows_skipped).yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "  {} {:>5} {}{}",
            format!("{:<24}", sheet.sheet_name).cyan(),
            sheet.records,
            sheet.kind.to_string().dimmed(),
            skipped
        );
    }
    for warning in &mapped.warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }
}

fn print_issues(issues: &[RecordIssue]) {
    eprintln!("{}", "Validation failed:".red().bold());
    for issue in issues {
        eprintln!("  {} {}", issue.location.cyan(), issue.violation);
    }
}

fn draw_progress(progress: Progress, interactive: bool) {
    let mut stderr = std::io::stderr();
    if interactive {
        let _ = write!(stderr, "\r{}", render_bar(progress, BAR_WIDTH));
        if progress.is_complete() {
            let _ = writeln!(stderr);
        }
        let _ = stderr.flush();
    } else if progress.is_complete() {
        let _ = writeln!(stderr, "{}", render_bar(progress, BAR_WIDTH));
    }
}
