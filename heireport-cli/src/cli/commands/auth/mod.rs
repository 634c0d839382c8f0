//! Session management

mod handler;

pub use handler::handle_auth_command;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Log in with email and password, or store an existing token
    Login {
        /// Account email (prompted if omitted)
        #[arg(long)]
        email: Option<String>,
        /// Store this token instead of logging in
        #[arg(long, conflicts_with = "email")]
        token: Option<String>,
        /// API base URL to use from now on
        #[arg(long)]
        url: Option<String>,
    },
    /// End the session and forget the stored token
    Logout,
    /// Show the API URL and the logged-in user
    Status,
}
