// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tempfile::TempDir;

fn write_config(temp_dir: &TempDir) -> std::path::PathBuf {
    let home = temp_dir.path();
    let secrets_file = home.join("client_secret.json");
    std::fs::write(
        &secrets_file,
        serde_json::json!({
            "installed": {
                "client_id": "client-id.apps.googleusercontent.com",
                "client_secret": "shh",
                "redirect_uris": ["http://localhost"],
                "token_uri": "http://127.0.0.1:9/token"
            }
        })
        .to_string(),
    )
    .unwrap();

    let config = home.join("settings.json");
    std::fs::write(
        &config,
        serde_json::json!({
            "auth": {
                "secrets_file": secrets_file,
                "token_file": home.join(".gphotos.token"),
                "input_timeout_secs": 1
            },
            "paths": {
                "history_file": home.join("data").join("images_seen.txt"),
                "output_file": home.join("photo.jpg")
            }
        })
        .to_string(),
    )
    .unwrap();
    config
}

#[test]
fn test_unanswered_prompt_exits_with_status_2() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir);

    let mut child = Command::new(env!("CARGO_BIN_EXE_kindle-gphotos"))
        .arg("--config")
        .arg(&config)
        .arg("auth")
        .env("KINDLE_GPHOTOS_HOME", temp_dir.path())
        .env_remove("KINDLE_GPHOTOS_AUTH_CODE")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    // Held open and never written, like an unattended terminal
    let _stdin = child.stdin.take();

    let deadline = Instant::now() + Duration::from_secs(15);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break Some(status);
        }
        if Instant::now() >= deadline {
            child.kill().ok();
            child.wait().ok();
            break None;
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    let status = status.expect("process should exit after the authorization timeout");
    assert_eq!(status.code(), Some(2));
    assert!(!temp_dir.path().join(".gphotos.token").exists());
}
