// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! OAuth client secrets downloaded from the Google API console

use serde::Deserialize;
use std::path::Path;

use crate::error::{GphotoError, Result};

/// Authorization endpoint used when the secrets file does not name one
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// The OAuth client this installation authorizes as
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub token_uri: String,
    pub auth_uri: String,
}

#[derive(Deserialize)]
struct SecretsFile {
    installed: Option<RawSecrets>,
    web: Option<RawSecrets>,
}

#[derive(Deserialize)]
struct RawSecrets {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
    token_uri: String,
    auth_uri: Option<String>,
}

impl ClientSecrets {
    /// Load the secrets file.
    ///
    /// Any failure is a configuration error: the run cannot start without it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GphotoError::Config(format!(
                "missing or unreadable secrets file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
            .map_err(|e| GphotoError::Config(format!("bad secrets file {}: {}", path.display(), e)))
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        let file: SecretsFile = serde_json::from_str(content).map_err(|e| e.to_string())?;
        let raw = file
            .installed
            .or(file.web)
            .ok_or_else(|| "expected an \"installed\" client section".to_string())?;
        let redirect_uri = raw
            .redirect_uris
            .into_iter()
            .next()
            .ok_or_else(|| "redirect_uris is empty".to_string())?;

        Ok(Self {
            client_id: raw.client_id,
            client_secret: raw.client_secret,
            redirect_uri,
            token_uri: raw.token_uri,
            auth_uri: raw.auth_uri.unwrap_or_else(|| DEFAULT_AUTH_URI.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const INSTALLED: &str = r#"{
        "installed": {
            "client_id": "123.apps.googleusercontent.com",
            "project_id": "kindle",
            "auth_uri": "https://accounts.google.com/o/oauth2/auth",
            "token_uri": "https://oauth2.googleapis.com/token",
            "client_secret": "s3cret",
            "redirect_uris": ["http://localhost"]
        }
    }"#;

    #[test]
    fn test_parse_installed() {
        let secrets = ClientSecrets::parse(INSTALLED).unwrap();
        assert_eq!(secrets.client_id, "123.apps.googleusercontent.com");
        assert_eq!(secrets.client_secret, "s3cret");
        assert_eq!(secrets.redirect_uri, "http://localhost");
        assert_eq!(secrets.token_uri, "https://oauth2.googleapis.com/token");
        assert_eq!(secrets.auth_uri, "https://accounts.google.com/o/oauth2/auth");
    }

    #[test]
    fn test_missing_auth_uri_uses_default() {
        let json = r#"{"installed": {"client_id": "id", "client_secret": "s",
            "redirect_uris": ["urn:ietf:wg:oauth:2.0:oob"], "token_uri": "https://t"}}"#;
        let secrets = ClientSecrets::parse(json).unwrap();
        assert_eq!(secrets.auth_uri, DEFAULT_AUTH_URI);
    }

    #[test]
    fn test_empty_redirect_uris_rejected() {
        let json = r#"{"installed": {"client_id": "id", "client_secret": "s",
            "redirect_uris": [], "token_uri": "https://t"}}"#;
        assert!(ClientSecrets::parse(json).is_err());
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = ClientSecrets::load(&temp_dir.path().join("client_secret.json")).unwrap_err();
        assert!(matches!(err, GphotoError::Config(_)));
    }

    #[test]
    fn test_load_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("client_secret.json");
        std::fs::write(&path, "{}").unwrap();
        let err = ClientSecrets::load(&path).unwrap_err();
        assert!(matches!(err, GphotoError::Config(_)));
    }
}
