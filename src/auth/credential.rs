// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! OAuth credential and its on-disk store

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::utils::write_atomic;

/// Credentials are refreshed this long before they actually expire
const EXPIRY_LEEWAY_SECS: i64 = 60;

/// Owner read/write only
pub const CREDENTIAL_FILE_MODE: u32 = 0o600;

/// OAuth2 token material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Provider-specific fields, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Credential {
    /// Build a credential from a token endpoint response received at `now`.
    ///
    /// Refresh responses usually omit the refresh token; `previous_refresh`
    /// is carried over in that case.
    pub fn from_token_response(
        response: TokenResponse,
        now: DateTime<Utc>,
        previous_refresh: Option<String>,
    ) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or(previous_refresh),
            expires_at: response
                .expires_in
                .map(|secs| now + Duration::seconds(secs)),
            token_type: response.token_type.unwrap_or_else(default_token_type),
            scope: response.scope,
            extra: response.extra,
        }
    }

    /// Whether the access token needs a refresh before use at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .map(|expires_at| expires_at - Duration::seconds(EXPIRY_LEEWAY_SECS) <= now)
            .unwrap_or(false)
    }
}

/// Successful response body of the token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// File-backed credential store
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved credential.
    ///
    /// A missing or malformed file means "no credential", never an error.
    pub fn load(&self) -> Option<Credential> {
        tracing::info!("Loading token from {}", self.path.display());
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("No readable token at {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(credential) => Some(credential),
            Err(e) => {
                tracing::warn!("Ignoring malformed token file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Persist a credential with owner-only permissions
    pub fn save(&self, credential: &Credential) -> Result<()> {
        tracing::info!("Saving token to {}", self.path.display());
        let content = serde_json::to_vec_pretty(credential)?;
        write_atomic(&self.path, &content, Some(CREDENTIAL_FILE_MODE))
    }
}
