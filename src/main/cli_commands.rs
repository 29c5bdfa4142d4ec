// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

use std::path::Path;

use kindle_gphotos::app::{run_once, RunOutcome};
use kindle_gphotos::auth::{CodeSource, ConsoleCodeSource, PresetCodeSource, SessionManager};
use kindle_gphotos::cli::{AuthArgs, HistoryArgs, RunArgs};
use kindle_gphotos::config::Settings;
use kindle_gphotos::error::Result;
use kindle_gphotos::history::HistoryStore;
use kindle_gphotos::http::build_client;

fn code_source(auth_code: Option<String>) -> Box<dyn CodeSource> {
    match auth_code {
        Some(code) => Box::new(PresetCodeSource::new(code)),
        None => Box::new(ConsoleCodeSource),
    }
}

pub(super) async fn run_update(args: RunArgs, settings: &Settings) -> Result<()> {
    let strategy = args.strategy.unwrap_or(settings.selection.strategy);
    let source = code_source(args.auth_code);

    match run_once(settings, strategy, source.as_ref()).await? {
        RunOutcome::Unchanged => {
            println!("Photo is unchanged");
        }
        RunOutcome::Updated {
            filename,
            processed,
        } => {
            println!("Downloaded '{}' to {}", filename, settings.paths.output_file.display());
            if processed {
                println!("Post-processed the file");
            }
        }
    }
    Ok(())
}

pub(super) async fn run_auth(args: AuthArgs, settings: &Settings) -> Result<()> {
    settings.ensure_directories()?;
    let http = build_client(&settings.resilience)?;
    let manager = SessionManager::from_settings(settings, http)?;
    manager.authorize(code_source(args.auth_code).as_ref()).await?;

    println!("Authorized; token stored at {}", settings.auth.token_file.display());
    Ok(())
}

pub(super) fn run_history(args: HistoryArgs, settings: &Settings) -> Result<()> {
    let store = HistoryStore::new(&settings.paths.history_file);
    let history = store.load()?;
    let entries = history.list_recent(args.limit);

    if entries.is_empty() {
        println!("\nNo photos in history.\n");
        return Ok(());
    }

    println!("\nRecently added photos ({} total):\n", history.len());
    for entry in entries {
        println!(
            "  {} | {} | taken {} | last listed {}",
            entry.first_seen_at.format("%Y-%m-%d %H:%M"),
            entry.filename,
            entry.created_at.format("%Y-%m-%d"),
            entry.last_seen_at.format("%Y-%m-%d %H:%M"),
        );
    }
    println!();
    Ok(())
}

pub(super) fn run_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!("Settings already exist at {} (use --force to overwrite).", path.display());
        return Ok(());
    }

    Settings::default().save_to(path)?;
    println!("Wrote default settings to {}", path.display());
    println!("\nNext steps:");
    println!("  1. Save your OAuth client secrets as {}", Settings::default().auth.secrets_file.display());
    println!("  2. Run `kindle-gphotos auth` once to authorize");
    Ok(())
}
