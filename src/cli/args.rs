// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! CLI argument definitions using Clap
//!
//! Defines all command-line arguments and subcommands for kindle-gphotos.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::selection::SelectionStrategy;

/// Environment variable holding a pre-provisioned authorization response
pub const AUTH_CODE_ENV: &str = "KINDLE_GPHOTOS_AUTH_CODE";

/// kindle-gphotos - Google Photos screensaver for Kindle
#[derive(Parser, Debug)]
#[command(name = "kindle-gphotos")]
#[command(version, about = "Google Photos screensaver for Kindle")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file (truncated each run)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a new screensaver photo (default when no command given)
    Run(RunArgs),

    /// Authorize with Google and save the token, without fetching
    Auth(AuthArgs),

    /// List photos recorded in the history file
    History(HistoryArgs),

    /// Write a default settings file
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

/// Arguments for a screensaver update
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Override the configured selection strategy
    #[arg(long, value_enum)]
    pub strategy: Option<SelectionStrategy>,

    /// Pasted redirect URL or bare code, for unattended first runs
    #[arg(long, env = AUTH_CODE_ENV, hide_env_values = true)]
    pub auth_code: Option<String>,
}

/// Arguments for the auth command
#[derive(Args, Debug, Default)]
pub struct AuthArgs {
    /// Pasted redirect URL or bare code instead of prompting
    #[arg(long, env = AUTH_CODE_ENV, hide_env_values = true)]
    pub auth_code: Option<String>,
}

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Maximum number of photos to show
    #[arg(short, long, default_value = "10")]
    pub limit: usize,
}
