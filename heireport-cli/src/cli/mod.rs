//! Command-line interface

pub mod commands;
pub mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::auth::{AuthCommands, handle_auth_command};
use commands::export::{ExportArgs, handle_export_command};
use commands::records::{
    DeleteArgs, GetArgs, ListArgs, UpdateArgs, handle_delete_command, handle_get_command,
    handle_list_command, handle_update_command,
};
use commands::upload::{UploadArgs, ValidateArgs, handle_upload_command, handle_validate_command};

#[derive(Parser)]
#[command(name = "heireport")]
#[command(about = "Upload, edit and export HEI compliance reports")]
#[command(version)]
pub struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in, log out and show the current session
    #[command(subcommand)]
    Auth(AuthCommands),
    /// Read a template workbook and submit its records
    Upload(UploadArgs),
    /// Read a template workbook and report validation problems
    Validate(ValidateArgs),
    /// List records of a resource
    List(ListArgs),
    /// Show one record
    Get(GetArgs),
    /// Change fields of a record
    Update(UpdateArgs),
    /// Delete a record
    Delete(DeleteArgs),
    /// Export an institution's records into a template workbook
    Export(ExportArgs),
}

pub async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Auth(cmd) => handle_auth_command(cmd).await,
        Commands::Upload(args) => handle_upload_command(args).await,
        Commands::Validate(args) => handle_validate_command(args),
        Commands::List(args) => handle_list_command(args).await,
        Commands::Get(args) => handle_get_command(args).await,
        Commands::Update(args) => handle_update_command(args).await,
        Commands::Delete(args) => handle_delete_command(args).await,
        Commands::Export(args) => handle_export_command(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_upload() {
        let cli = Cli::try_parse_from([
            "heireport",
            "-vv",
            "upload",
            "faculty",
            "e2.xlsx",
            "--institution",
            "7",
            "--mode",
            "bulk",
            "--yes",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Upload(args) => {
                assert_eq!(args.institution.as_deref(), Some("7"));
                assert_eq!(args.mode, Some(crate::submit::SubmitMode::Bulk));
                assert!(args.yes);
                assert!(!args.dry_run);
            }
            _ => panic!("expected upload"),
        }
    }

    #[test]
    fn test_parse_update_sets() {
        let cli = Cli::try_parse_from([
            "heireport",
            "update",
            "faculty-profiles",
            "12",
            "--set",
            "research_load=3",
            "--set",
            "remarks=on study leave",
        ])
        .unwrap();
        match cli.command {
            Commands::Update(args) => {
                assert_eq!(args.id, "12");
                assert_eq!(
                    args.set,
                    vec![
                        ("research_load".to_string(), "3".to_string()),
                        ("remarks".to_string(), "on study leave".to_string()),
                    ]
                );
            }
            _ => panic!("expected update"),
        }
    }

    #[test]
    fn test_malformed_set_is_rejected() {
        assert!(Cli::try_parse_from(["heireport", "update", "programs", "1", "--set", "oops"]).is_err());
    }
}
