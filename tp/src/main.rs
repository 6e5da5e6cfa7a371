//! texplate - CLI entry point

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use texplate::cli::{Cli, Command, ExecuteArgs};
use texplate::config::Config;
use texplate::error::one_line;
use texplate::interpolate::{self, ExecuteOptions};
use texplate::sink::Sink;

fn parse_level(level: &str) -> Option<tracing::Level> {
    match level.to_uppercase().as_str() {
        "TRACE" => Some(tracing::Level::TRACE),
        "DEBUG" => Some(tracing::Level::DEBUG),
        "INFO" => Some(tracing::Level::INFO),
        "WARN" | "WARNING" => Some(tracing::Level::WARN),
        "ERROR" => Some(tracing::Level::ERROR),
        _ => None,
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > WARN
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => parse_level(s).unwrap_or_else(|| {
            eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", s);
            tracing::Level::WARN
        }),
        None => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("{e}"))?;

    debug!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), one_line(&format!("{e:#}")));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Execute(args) => cmd_execute(&args, &config),
    }
}

/// Render the template and write it to the requested sink
fn cmd_execute(args: &ExecuteArgs, config: &Config) -> Result<()> {
    debug!(?args, "cmd_execute: called");
    let options = ExecuteOptions::resolve(args, config)?;

    interpolate::run(&options)?;

    if let Sink::File(path) = &options.sink {
        info!("Wrote output to {}", path.display());
        eprintln!("Wrote output to {}", path.display());
    }
    Ok(())
}
