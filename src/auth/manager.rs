// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! OAuth authorization flow for installed applications
//!
//! A saved credential is reused when present. Otherwise the operator is
//! sent to the consent page once, and the resulting code is exchanged and
//! saved so later unattended runs never prompt again.

use chrono::Utc;
use reqwest::{Client, Url};
use std::time::Duration;

use crate::auth::code_source::{parse_authorization_response, CodeSource};
use crate::auth::credential::{Credential, CredentialStore};
use crate::auth::secrets::ClientSecrets;
use crate::auth::session::{request_token, AuthorizedSession};
use crate::config::Settings;
use crate::error::{GphotoError, Result};
use crate::http::RetryPolicy;

/// Produces authenticated sessions
pub struct SessionManager {
    client: Client,
    secrets: ClientSecrets,
    store: CredentialStore,
    scopes: Vec<String>,
    input_timeout_secs: u64,
    policy: RetryPolicy,
}

impl SessionManager {
    pub fn new(
        client: Client,
        secrets: ClientSecrets,
        store: CredentialStore,
        scopes: Vec<String>,
        input_timeout_secs: u64,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            client,
            secrets,
            store,
            scopes,
            input_timeout_secs,
            policy,
        }
    }

    /// Build a manager from settings, loading the client secrets file.
    pub fn from_settings(settings: &Settings, client: Client) -> Result<Self> {
        let secrets = ClientSecrets::load(&settings.auth.secrets_file)?;
        Ok(Self::new(
            client,
            secrets,
            CredentialStore::new(&settings.auth.token_file),
            settings.auth.scopes.clone(),
            settings.auth.input_timeout_secs,
            RetryPolicy::from(&settings.resilience),
        ))
    }

    /// Return a session backed by the saved credential, or run the
    /// interactive grant first.
    pub async fn authorize(&self, code_source: &dyn CodeSource) -> Result<AuthorizedSession> {
        tracing::info!("Attempting authorization");

        let credential = match self.store.load() {
            Some(credential) => {
                tracing::info!("Token found");
                credential
            }
            None => {
                tracing::info!("No token found");
                self.interactive_grant(code_source).await?
            }
        };

        Ok(AuthorizedSession::new(
            self.client.clone(),
            credential,
            self.store.clone(),
            self.secrets.clone(),
            self.policy.clone(),
        ))
    }

    /// Consent page URL for the configured scopes
    pub fn authorization_url(&self, state: &str) -> Result<Url> {
        let scope = self.scopes.join(" ");
        Url::parse_with_params(
            &self.secrets.auth_uri,
            &[
                ("response_type", "code"),
                ("client_id", self.secrets.client_id.as_str()),
                ("redirect_uri", self.secrets.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("state", state),
                ("access_type", "offline"),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|e| GphotoError::Config(format!("bad auth_uri {}: {}", self.secrets.auth_uri, e)))
    }

    async fn interactive_grant(&self, code_source: &dyn CodeSource) -> Result<Credential> {
        let state = uuid::Uuid::new_v4().simple().to_string();
        let url = self.authorization_url(&state)?;

        tracing::warn!("Authorization is necessary: {}", url);
        tracing::warn!(
            "Waiting up to {} seconds for the pasted redirect URL",
            self.input_timeout_secs
        );

        let response = tokio::time::timeout(
            Duration::from_secs(self.input_timeout_secs),
            code_source.obtain(url.as_str(), self.input_timeout_secs),
        )
        .await
        .map_err(|_| GphotoError::AuthorizationTimeout(self.input_timeout_secs))??;

        let code = parse_authorization_response(&response, &state)?;
        self.exchange_code(&code).await
    }

    /// Exchange an authorization code for a credential and save it.
    pub async fn exchange_code(&self, code: &str) -> Result<Credential> {
        tracing::info!("Fetching token");
        let response = request_token(
            &self.client,
            &self.policy,
            &self.secrets.token_uri,
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.secrets.redirect_uri.as_str()),
                ("client_id", self.secrets.client_id.as_str()),
                ("client_secret", self.secrets.client_secret.as_str()),
            ],
        )
        .await?;

        let credential = Credential::from_token_response(response, Utc::now(), None);
        self.store.save(&credential)?;
        Ok(credential)
    }
}
