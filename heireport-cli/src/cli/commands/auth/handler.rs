//! Auth command handlers

use anyhow::{Context, Result};
use colored::*;
use dialoguer::Input;
use log::{debug, warn};

use super::AuthCommands;
use crate::api::ApiClient;
use crate::config::{Config, Credentials};

pub async fn handle_auth_command(cmd: AuthCommands) -> Result<()> {
    match cmd {
        AuthCommands::Login { email, token, url } => login(email, token, url).await,
        AuthCommands::Logout => logout().await,
        AuthCommands::Status => status().await,
    }
}

async fn login(email: Option<String>, token: Option<String>, url: Option<String>) -> Result<()> {
    let mut config: Config = crate::global_config().clone();

    if let Some(url) = url {
        config.api.base_url = url.trim().trim_end_matches('/').to_string();
        let path = config.save()?;
        println!("API URL set to {} ({})", config.api.base_url.cyan(), path.display());
    }

    let (token, email) = match token {
        Some(token) => (token, None),
        None => {
            let email = match email {
                Some(email) => email,
                None => Input::<String>::new()
                    .with_prompt("Email")
                    .interact_text()
                    .context("Failed to read email")?,
            };
            let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;

            let client = ApiClient::from_config(&config)?;
            let token = client
                .login(email.trim(), &password)
                .await
                .context("Login failed")?;
            (token, Some(email.trim().to_string()))
        }
    };

    let credentials = Credentials::new(token, email, &config.api.base_url);
    let path = credentials.save(config.dir())?;
    debug!("Credentials written to {}", path.display());

    match &credentials.email {
        Some(email) => println!("{} Logged in as {}", "✓".green(), email.bold()),
        None => println!("{} Token stored", "✓".green()),
    }
    Ok(())
}

async fn logout() -> Result<()> {
    let config = crate::global_config();

    if config.credentials().is_some() {
        let client = ApiClient::from_config(config)?;
        // The local token is removed even when the server call fails
        if let Err(e) = client.logout().await {
            warn!("Server logout failed: {}", e);
        }
    }

    if Credentials::delete(config.dir())? {
        println!("{} Logged out", "✓".green());
    } else {
        println!("Not logged in");
    }
    Ok(())
}

async fn status() -> Result<()> {
    let config = crate::global_config();
    println!("{} {}", "API:".bold(), config.api.base_url);
    println!("{} {}", "Config:".bold(), config.dir().display());

    let Some(source) = config.token_source() else {
        println!("{} {}", "Session:".bold(), "not logged in".yellow());
        return Ok(());
    };

    if let Some(credentials) = config.credentials() {
        println!(
            "{} {} (saved {})",
            "Token:".bold(),
            credentials.masked_token(),
            credentials.saved_at.format("%Y-%m-%d %H:%M")
        );
        if credentials.api_url != config.api.base_url {
            println!(
                "{}",
                format!("Token was issued by {}", credentials.api_url).yellow()
            );
        }
    }
    println!("{} {}", "Token source:".bold(), source);

    let client = ApiClient::from_config(config)?;
    match client.me().await {
        Ok(user) => {
            let user = user.get("data").cloned().unwrap_or(user);
            let name = user.get("name").and_then(|v| v.as_str()).unwrap_or("?");
            let email = user.get("email").and_then(|v| v.as_str()).unwrap_or("?");
            println!("{} {} <{}>", "User:".bold(), name.green(), email);
        }
        Err(e) => println!("{} {}", "User:".bold(), e.to_string().red()),
    }
    Ok(())
}
