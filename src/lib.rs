// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! kindle-gphotos - shared album photos for a Kindle screensaver.
//!
//! This crate exposes the runtime used by the `kindle-gphotos` CLI
//! (`src/main.rs`).
//!
//! Architecture highlights:
//! - `auth`: OAuth installed-app flow, token store and auto-refreshing session
//! - `photos`: Photos Library API client, wire types and download sizing
//! - `history`: persistent record of every photo seen in the album
//! - `selection`: `latest` (newest unseen) and `random` strategies
//! - `postprocess`: ImageMagick conversion for the e-ink screen
//! - `app`: one update run wiring the above together

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod http;
pub mod photos;
pub mod postprocess;
pub mod selection;
pub mod utils;

pub use error::{GphotoError, Result};
