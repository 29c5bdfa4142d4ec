// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! Authenticated HTTP session with transparent token refresh

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, Response};
use serde::Serialize;

use crate::auth::credential::{Credential, CredentialStore, TokenResponse};
use crate::auth::secrets::ClientSecrets;
use crate::error::{ApiError, GphotoError, Result};
use crate::http::{execute_with_retry, RetryPolicy};

/// POST a form to the token endpoint and parse the token response.
pub(crate) async fn request_token(
    client: &Client,
    policy: &RetryPolicy,
    token_uri: &str,
    form: &[(&str, &str)],
) -> Result<TokenResponse> {
    let request = client.post(token_uri).form(form).build()?;
    let response = execute_with_retry(client, request, policy, "token request").await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::TokenRejected {
            status: status.as_u16(),
            message: body,
        }
        .into());
    }

    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| ApiError::InvalidResponse(format!("token response: {}", e)).into())
}

/// Session that attaches a fresh bearer token to every request
pub struct AuthorizedSession {
    client: Client,
    credential: Credential,
    store: CredentialStore,
    secrets: ClientSecrets,
    policy: RetryPolicy,
}

impl AuthorizedSession {
    pub fn new(
        client: Client,
        credential: Credential,
        store: CredentialStore,
        secrets: ClientSecrets,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            client,
            credential,
            store,
            secrets,
            policy,
        }
    }

    /// Current credential
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Refresh the access token if it is expired at `now`.
    pub async fn ensure_fresh(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.credential.is_expired(now) {
            tracing::info!("Access token expired; refreshing");
            self.refresh(now).await?;
        }
        Ok(())
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// The new credential is persisted before it is used.
    pub async fn refresh(&mut self, now: DateTime<Utc>) -> Result<()> {
        let refresh_token = self.credential.refresh_token.clone().ok_or_else(|| {
            GphotoError::Auth("access token expired and no refresh token is stored".to_string())
        })?;

        let response = request_token(
            &self.client,
            &self.policy,
            &self.secrets.token_uri,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
                ("client_id", self.secrets.client_id.as_str()),
                ("client_secret", self.secrets.client_secret.as_str()),
            ],
        )
        .await?;

        let credential = Credential::from_token_response(response, now, Some(refresh_token));
        self.store.save(&credential)?;
        self.credential = credential;
        Ok(())
    }

    async fn send_authorized(
        &mut self,
        method: Method,
        url: &str,
        json: Option<&serde_json::Value>,
        operation_name: &str,
    ) -> Result<Response> {
        self.ensure_fresh(Utc::now()).await?;

        let mut builder = self
            .client
            .request(method, url)
            .bearer_auth(&self.credential.access_token);
        if let Some(body) = json {
            builder = builder.json(body);
        }
        let request = builder.build()?;
        execute_with_retry(&self.client, request, &self.policy, operation_name).await
    }

    /// Authorized GET with query parameters
    pub async fn get(
        &mut self,
        url: &str,
        query: &[(&str, String)],
        operation_name: &str,
    ) -> Result<Response> {
        let url = reqwest::Url::parse_with_params(url, query)
            .map_err(|e| GphotoError::InvalidInput(format!("bad URL {}: {}", url, e)))?;
        self.send_authorized(Method::GET, url.as_str(), None, operation_name)
            .await
    }

    /// Authorized POST with a JSON body
    pub async fn post_json<B: Serialize>(
        &mut self,
        url: &str,
        body: &B,
        operation_name: &str,
    ) -> Result<Response> {
        let body = serde_json::to_value(body)?;
        self.send_authorized(Method::POST, url, Some(&body), operation_name)
            .await
    }

    /// Unauthenticated GET through the same client and retry policy.
    ///
    /// Media base URLs are pre-signed and need no bearer token.
    pub async fn get_public(&self, url: &str, operation_name: &str) -> Result<Response> {
        let request = self.client.get(url).build()?;
        execute_with_retry(&self.client, request, &self.policy, operation_name).await
    }
}
