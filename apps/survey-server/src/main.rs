mod config;
mod logging;
mod server;
mod signals;

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use survey_auth::JwtValidator;

use crate::config::{AppConfig, CliOverrides};

/// Surveys server: REST API and web front-end
#[derive(Parser)]
#[command(name = "survey-server")]
#[command(about = "Surveys server: multi-tenant survey authoring API and web front-end")]
#[command(version)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for the REST API listener
    #[arg(long)]
    api_port: Option<u16>,

    /// Port override for the web front-end listener
    #[arg(long)]
    web_port: Option<u16>,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    /// Print effective configuration (JSON, secrets omitted) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start both listeners (default)
    Run,
    /// Validate configuration and exit
    Check,
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config
        && !path.is_file()
    {
        bail!("config file does not exist: {}", path.display());
    }

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        api_port: cli.api_port,
        web_port: cli.web_port,
        mock: cli.mock,
    });

    if cli.print_config {
        println!("{}", config.to_redacted_json()?);
        return Ok(());
    }

    logging::init(&config.logging, cli.verbose)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Surveys server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            config.validate()?;
            server::run(config).await
        }
        Commands::Check => check(&config),
        Commands::Migrate => server::migrate(&config).await,
    }
}

fn check(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration");
    config.validate()?;
    JwtValidator::from_config(&config.auth)?;
    println!("Configuration is valid");
    Ok(())
}
