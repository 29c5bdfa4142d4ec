// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

use clap::Parser;
use kindle_gphotos::cli::{Cli, Commands};
use kindle_gphotos::selection::SelectionStrategy;

#[test]
fn test_parse_run_command() {
    let args = vec!["kindle-gphotos", "run"];
    let cli = Cli::try_parse_from(args).expect("Valid command parsing");
    if let Some(Commands::Run(run_args)) = cli.command {
        assert!(run_args.strategy.is_none());
    } else {
        panic!("Expected Run command");
    }
}

#[test]
fn test_parse_run_with_latest_strategy() {
    let args = vec!["kindle-gphotos", "run", "--strategy", "latest"];
    let cli = Cli::try_parse_from(args).expect("Valid command parsing");
    if let Some(Commands::Run(run_args)) = cli.command {
        assert_eq!(run_args.strategy, Some(SelectionStrategy::Latest));
    } else {
        panic!("Expected Run command");
    }
}

#[test]
fn test_parse_auth_command() {
    let args = vec!["kindle-gphotos", "auth"];
    let cli = Cli::try_parse_from(args).expect("Valid command parsing");
    assert!(matches!(cli.command, Some(Commands::Auth(_))));
}

#[test]
fn test_parse_auth_with_redirect_url() {
    let args = vec![
        "kindle-gphotos",
        "auth",
        "--auth-code",
        "http://localhost/?state=abc&code=4/0AbCd",
    ];
    let cli = Cli::try_parse_from(args).expect("Valid command parsing");
    if let Some(Commands::Auth(auth_args)) = cli.command {
        assert_eq!(
            auth_args.auth_code.as_deref(),
            Some("http://localhost/?state=abc&code=4/0AbCd")
        );
    } else {
        panic!("Expected Auth command");
    }
}

#[test]
fn test_parse_history_with_limit() {
    let args = vec!["kindle-gphotos", "history", "--limit", "3"];
    let cli = Cli::try_parse_from(args).expect("Valid command parsing");
    if let Some(Commands::History(history_args)) = cli.command {
        assert_eq!(history_args.limit, 3);
    } else {
        panic!("Expected History command");
    }
}

#[test]
fn test_parse_init_command() {
    let args = vec!["kindle-gphotos", "init"];
    let cli = Cli::try_parse_from(args).expect("Valid command parsing");
    assert!(matches!(cli.command, Some(Commands::Init { force: false })));
}

#[test]
fn test_parse_verbose_flag() {
    let args = vec!["kindle-gphotos", "-vv", "run"];
    let cli = Cli::try_parse_from(args).expect("Valid command parsing");
    assert_eq!(cli.verbose, 2);
}

#[test]
fn test_parse_config_path() {
    let args = vec!["kindle-gphotos", "--config", "/mnt/us/gphotos/settings.json"];
    let cli = Cli::try_parse_from(args).expect("Valid command parsing");
    assert_eq!(
        cli.config,
        Some(std::path::PathBuf::from("/mnt/us/gphotos/settings.json"))
    );
    assert!(cli.command.is_none());
}

#[test]
fn test_invalid_command() {
    let args = vec!["kindle-gphotos", "chat"];
    let result = Cli::try_parse_from(args);
    assert!(result.is_err());
}
