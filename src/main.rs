// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! kindle-gphotos - Google Photos screensaver for Kindle
//!
//! Entry point for the kindle-gphotos CLI application.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;

use kindle_gphotos::cli::{Cli, Commands, RunArgs, AUTH_CODE_ENV};
use kindle_gphotos::config::Settings;
use kindle_gphotos::error::Result;

#[path = "main/cli_commands.rs"]
mod cli_commands;

use cli_commands::{run_auth, run_history, run_init, run_update};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Settings are read before tracing so `logging.file` can take effect
    let settings = load_settings(cli.config.as_ref());
    let log_file = cli.log_file.clone().or_else(|| {
        settings
            .as_ref()
            .ok()
            .and_then(|s| s.logging.file.clone())
    });

    if let Err(e) = init_tracing(cli.verbose, log_file) {
        eprintln!("Error: could not open log file: {}", e);
        return ExitCode::FAILURE;
    }

    match dispatch(cli, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
}

fn init_tracing(verbose: u8, log_file: Option<PathBuf>) -> std::io::Result<()> {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());
    if let Ok(directive) = format!("kindle_gphotos={}", level).parse() {
        env_filter = env_filter.add_directive(directive);
    }

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file = std::fs::File::create(&path)?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

async fn dispatch(cli: Cli, settings: Result<Settings>) -> Result<()> {
    // init must work even when the existing settings file is broken
    if let Some(Commands::Init { force }) = cli.command {
        let path = cli.config.unwrap_or_else(Settings::default_path);
        return run_init(&path, force);
    }

    let settings = settings?;
    settings.validate()?;

    match cli.command {
        None => {
            let args = RunArgs {
                auth_code: std::env::var(AUTH_CODE_ENV).ok(),
                ..RunArgs::default()
            };
            run_update(args, &settings).await
        }
        Some(Commands::Run(args)) => run_update(args, &settings).await,
        Some(Commands::Auth(args)) => run_auth(args, &settings).await,
        Some(Commands::History(args)) => run_history(args, &settings),
        Some(Commands::Init { .. }) => Ok(()),
    }
}
