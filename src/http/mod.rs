// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! HTTP transport helpers shared by the auth and photos modules

pub mod retry;

pub use retry::{execute_with_retry, RetryPolicy};

use std::time::Duration;

use crate::config::ResilienceConfig;
use crate::error::{GphotoError, Result};

/// Build the HTTP client used for every call in a run
pub fn build_client(config: &ResilienceConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("kindle-gphotos/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| GphotoError::Config(format!("HTTP client build failed: {}", e)))
}
