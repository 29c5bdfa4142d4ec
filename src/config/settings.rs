// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! Settings management for kindle-gphotos
//!
//! Handles loading and saving settings from ~/.kindle-gphotos/settings.json

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::photos::{CropMode, DeviceType};
use crate::selection::SelectionStrategy;

mod io;
mod validation;

/// Largest page size the Photos API accepts for album and media item listings
pub const MAX_PAGE_SIZE: u32 = 50;

/// Upper bound for `resilience.backoff_factor_secs`
pub const MAX_BACKOFF_FACTOR_SECS: f64 = 3600.0;

/// Main settings structure, stored in ~/.kindle-gphotos/settings.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Which album to read and how much of it
    #[serde(default)]
    pub album: AlbumConfig,

    /// Target screen and crop
    #[serde(default)]
    pub display: DisplayConfig,

    /// Photo selection strategy and filtering
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Retry settings for API calls
    #[serde(default)]
    pub resilience: ResilienceConfig,

    /// OAuth client and token storage
    #[serde(default)]
    pub auth: AuthConfig,

    /// Photos API endpoint
    #[serde(default)]
    pub api: ApiConfig,

    /// Files written on every run
    #[serde(default)]
    pub paths: PathsConfig,

    /// External image conversion
    #[serde(default)]
    pub postprocess: PostProcessConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Album selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumConfig {
    /// Exact title of the shared album
    #[serde(default = "default_album_name")]
    pub name: String,

    /// Page size for album and media item listings (1..=50)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for AlbumConfig {
    fn default() -> Self {
        Self {
            name: default_album_name(),
            page_size: default_page_size(),
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Device size class
    #[serde(default)]
    pub device: DeviceType,

    /// Server-side crop mode
    #[serde(default)]
    pub crop: CropMode,
}

/// Selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Which strategy picks the photo
    #[serde(default)]
    pub strategy: SelectionStrategy,

    /// Mime types eligible for display
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            strategy: SelectionStrategy::default(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

/// Retry and resilience configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResilienceConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff factor in seconds; retry n sleeps `factor * 2^n`
    #[serde(default = "default_backoff_factor_secs")]
    pub backoff_factor_secs: f64,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_factor_secs: default_backoff_factor_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// OAuth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Client secrets JSON downloaded from the Google API console
    #[serde(default = "default_secrets_file")]
    pub secrets_file: PathBuf,

    /// Where the OAuth token is persisted
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,

    /// Scopes requested during authorization
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// How long to wait for the pasted redirect URL
    #[serde(default = "default_input_timeout_secs")]
    pub input_timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secrets_file: default_secrets_file(),
            token_file: default_token_file(),
            scopes: default_scopes(),
            input_timeout_secs: default_input_timeout_secs(),
        }
    }
}

/// Photos API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for API (for custom endpoints)
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
        }
    }
}

/// Files used on every run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Seen-photo history
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,

    /// Downloaded photo
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            history_file: default_history_file(),
            output_file: default_output_file(),
        }
    }
}

/// Post-processing configuration (requires the linkss screensaver hack)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostProcessConfig {
    /// Run the converter after download
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// ImageMagick `convert` binary
    #[serde(default = "default_convert_path")]
    pub convert_path: PathBuf,

    /// Palette image used for `-remap`
    #[serde(default = "default_colors_gif_path")]
    pub colors_gif_path: PathBuf,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            convert_path: default_convert_path(),
            colors_gif_path: default_colors_gif_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to this file instead of stderr (truncated per run)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_album_name() -> String {
    "kindle".to_string()
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_allowed_mime_types() -> Vec<String> {
    vec!["image/jpeg".to_string()]
}

fn default_true() -> bool {
    true
}

// Resilience config defaults
fn default_max_retries() -> u32 {
    5
}

fn default_backoff_factor_secs() -> f64 {
    0.1
}

fn default_request_timeout_secs() -> u64 {
    60
}

// Auth config defaults
fn default_secrets_file() -> PathBuf {
    Settings::app_home().join("client_secret.json")
}

fn default_token_file() -> PathBuf {
    Settings::app_home().join(".gphotos.token")
}

fn default_scopes() -> Vec<String> {
    vec![
        "https://www.googleapis.com/auth/photoslibrary.readonly".to_string(),
        "https://www.googleapis.com/auth/photoslibrary.sharing".to_string(),
    ]
}

fn default_input_timeout_secs() -> u64 {
    5 * 60
}

fn default_api_base_url() -> String {
    "https://photoslibrary.googleapis.com".to_string()
}

fn default_history_file() -> PathBuf {
    Settings::app_home().join("data").join("images_seen.txt")
}

fn default_output_file() -> PathBuf {
    Settings::app_home().join("photo.jpg")
}

fn default_convert_path() -> PathBuf {
    PathBuf::from("/mnt/us/linkss/bin/convert")
}

fn default_colors_gif_path() -> PathBuf {
    PathBuf::from("/mnt/us/linkss/etc/kindle_colors.gif")
}
