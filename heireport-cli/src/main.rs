mod api;
mod cli;
mod config;
mod excel;
mod records;
mod submit;
mod validation;

use anyhow::Result;
use clap::Parser;
use colored::*;
use is_terminal::IsTerminal;
use log::debug;
use once_cell::sync::OnceCell;

use cli::Cli;
use config::Config;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Configuration loaded at startup
pub fn global_config() -> &'static Config {
    CONFIG.get_or_init(|| {
        Config::load().unwrap_or_else(|e| {
            log::warn!("Falling back to default configuration: {:#}", e);
            Config::default()
        })
    })
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    debug!("Using configuration from {}", config.dir().display());
    let _ = CONFIG.set(config);

    cli::run(cli.command).await
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    if let Err(err) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), err);
        for cause in err.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".red(), cause);
        }
        std::process::exit(1);
    }
}
