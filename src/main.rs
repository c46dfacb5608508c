use std::fs::{self, OpenOptions};

use anyhow::{Context, Result};
use clap::Parser;
use profile_maker::cli::{self, Cli, Command};
use profile_maker::{util, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // `config set-*` writes the file itself, which may not exist yet
    let config = match (&cli.command, &cli.config) {
        (Command::Config { .. }, _) => Config::default(),
        (_, Some(path)) => Config::load_from(path)?,
        (_, None) => Config::load(),
    };

    // Initialize logging to file (~/.profile-maker/logs/profile-maker.log)
    fs::create_dir_all(util::logs_dir()).context("Failed to create log directory")?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())
        .context("Failed to open log file")?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .init();

    cli::run(cli, config)
}
