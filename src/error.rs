// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! Error types for kindle-gphotos
//!
//! This module defines all error types used throughout the application.

use thiserror::Error;

/// Main error type for kindle-gphotos operations
#[derive(Error, Debug)]
pub enum GphotoError {
    /// API-related errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration errors (settings or client secrets)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The operator did not paste an authorization response in time
    #[error("Authorization timed out after {0} seconds; run interactively to authorize")]
    AuthorizationTimeout(u64),

    /// OAuth flow errors other than timeouts
    #[error("Authorization error: {0}")]
    Auth(String),

    /// No shared album with the configured title
    #[error("Album not found: {0}")]
    AlbumNotFound(String),

    /// The configured album contains no media items
    #[error("Album is empty: {0}")]
    EmptyAlbum(String),

    /// A selection strategy had nothing to choose from
    #[error("No selectable photos: {0}")]
    EmptySelection(String),

    /// External image conversion failed
    #[error("Post-processing failed: {0}")]
    PostProcess(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl GphotoError {
    /// Process exit status for this error.
    ///
    /// `2` means a human has to complete authorization; everything else is `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            GphotoError::AuthorizationTimeout(_) => 2,
            _ => 1,
        }
    }
}

/// API-specific error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Server kept answering with a retryable status
    #[error("Gave up after {attempts} attempts: last status {status}")]
    RetriesExhausted { attempts: u32, status: u16 },

    /// Token endpoint rejected the grant
    #[error("Token request rejected ({status}): {message}")]
    TokenRejected { status: u16, message: String },

    /// Invalid response from API
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// API returned an error
    #[error("API error ({status}): {message}")]
    ServerError { status: u16, message: String },
}

/// Result type alias for kindle-gphotos operations
pub type Result<T> = std::result::Result<T, GphotoError>;
