// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

use crate::error::{GphotoError, Result};

use super::{Settings, MAX_BACKOFF_FACTOR_SECS, MAX_PAGE_SIZE};

/// Environment variable overriding `album.name`
const ALBUM_ENV: &str = "KINDLE_GPHOTOS_ALBUM";

impl Settings {
    /// Get the album name, checking env var first.
    pub fn album_name(&self) -> String {
        // Priority: env var > config file.
        std::env::var(ALBUM_ENV)
            .ok()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.album.name.clone())
    }

    /// Reject settings the run cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.album_name().trim().is_empty() {
            return Err(GphotoError::Config("album name must not be empty".to_string()));
        }

        if self.album.page_size == 0 || self.album.page_size > MAX_PAGE_SIZE {
            return Err(GphotoError::Config(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.album.page_size
            )));
        }

        if self.selection.allowed_mime_types.is_empty() {
            return Err(GphotoError::Config(
                "allowed_mime_types must list at least one mime type".to_string(),
            ));
        }

        if !self.resilience.backoff_factor_secs.is_finite()
            || self.resilience.backoff_factor_secs < 0.0
            || self.resilience.backoff_factor_secs > MAX_BACKOFF_FACTOR_SECS
        {
            return Err(GphotoError::Config(format!(
                "backoff_factor_secs must be between 0 and {}, got {}",
                MAX_BACKOFF_FACTOR_SECS, self.resilience.backoff_factor_secs
            )));
        }

        if self.auth.scopes.is_empty() {
            return Err(GphotoError::Config("at least one OAuth scope is required".to_string()));
        }

        Ok(())
    }
}
