// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! Where the authorization response comes from
//!
//! The first run needs a human to open the authorization URL and paste
//! back the redirect URL. Unattended environments can hand in a code
//! obtained elsewhere instead.

use async_trait::async_trait;
use reqwest::Url;
use std::io::Write;
use tokio::sync::oneshot;

use crate::error::{GphotoError, Result};

/// Source of the pasted redirect URL (or bare authorization code)
#[async_trait]
pub trait CodeSource: Send + Sync {
    /// Present `authorization_url` and return the operator's response.
    ///
    /// The caller bounds this with a timeout.
    async fn obtain(&self, authorization_url: &str, timeout_secs: u64) -> Result<String>;
}

/// Prints the URL and reads one line from stdin
#[derive(Debug, Default)]
pub struct ConsoleCodeSource;

#[async_trait]
impl CodeSource for ConsoleCodeSource {
    async fn obtain(&self, authorization_url: &str, timeout_secs: u64) -> Result<String> {
        {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "--------------------------------------------------------------")?;
            writeln!(stdout, "Please go here and authorize, then paste the return URL")?;
            writeln!(stdout, "(which your browser says it cannot reach):")?;
            writeln!(stdout, "{}", authorization_url)?;
            writeln!(stdout, "--------------------------------------------------------------")?;
            writeln!(stdout, "Paste the URL now (you have {} seconds)", timeout_secs)?;
            stdout.flush()?;
        }

        // Detached thread; a timed-out read must not block runtime shutdown
        let (tx, rx) = oneshot::channel();
        std::thread::spawn(move || {
            let mut line = String::new();
            let result = std::io::stdin().read_line(&mut line).map(|read| (read, line));
            let _ = tx.send(result);
        });

        let (read, line) = rx
            .await
            .map_err(|_| GphotoError::Auth("stdin reader exited unexpectedly".to_string()))??;
        if read == 0 {
            return Err(GphotoError::Auth(
                "stdin closed before an authorization response was pasted".to_string(),
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// A response provisioned ahead of time (CLI flag or environment)
#[derive(Debug, Clone)]
pub struct PresetCodeSource {
    response: String,
}

impl PresetCodeSource {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl CodeSource for PresetCodeSource {
    async fn obtain(&self, authorization_url: &str, _timeout_secs: u64) -> Result<String> {
        tracing::debug!("Using preset authorization response for {}", authorization_url);
        Ok(self.response.clone())
    }
}

/// Extract the authorization code from a pasted response.
///
/// Accepts a full redirect URL carrying `code` (and checks `state` when
/// present) or a bare code.
pub fn parse_authorization_response(input: &str, expected_state: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(GphotoError::Auth("empty authorization response".to_string()));
    }

    let url = match Url::parse(input) {
        Ok(url) => url,
        Err(_) => return Ok(input.to_string()),
    };

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(GphotoError::Auth(format!("authorization denied: {}", error)));
    }
    if let Some(state) = state {
        if state != expected_state {
            return Err(GphotoError::Auth(
                "state parameter does not match this authorization request".to_string(),
            ));
        }
    }

    code.filter(|c| !c.is_empty())
        .ok_or_else(|| GphotoError::Auth("redirect URL has no code parameter".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_redirect_url() {
        let code = parse_authorization_response(
            "http://localhost/?state=abc&code=4/0AX-code&scope=photos",
            "abc",
        )
        .unwrap();
        assert_eq!(code, "4/0AX-code");
    }

    #[test]
    fn test_parse_url_encoded_code() {
        let code =
            parse_authorization_response("http://localhost/?code=4%2F0AX&state=s", "s").unwrap();
        assert_eq!(code, "4/0AX");
    }

    #[test]
    fn test_parse_bare_code() {
        let code = parse_authorization_response("  4/0AX-bare\n", "s").unwrap();
        assert_eq!(code, "4/0AX-bare");
    }

    #[test]
    fn test_state_mismatch_rejected() {
        let err = parse_authorization_response("http://localhost/?code=c&state=evil", "good")
            .unwrap_err();
        assert!(err.to_string().contains("state"));
    }

    #[test]
    fn test_missing_code_rejected() {
        assert!(parse_authorization_response("http://localhost/?state=s", "s").is_err());
    }

    #[test]
    fn test_error_parameter_rejected() {
        let err = parse_authorization_response("http://localhost/?error=access_denied", "s")
            .unwrap_err();
        assert!(err.to_string().contains("access_denied"));
    }

    #[test]
    fn test_empty_response_rejected() {
        assert!(parse_authorization_response("   ", "s").is_err());
    }

    #[tokio::test]
    async fn test_preset_code_source() {
        let source = PresetCodeSource::new("4/0AX");
        let response = source.obtain("https://auth", 300).await.unwrap();
        assert_eq!(response, "4/0AX");
    }
}
