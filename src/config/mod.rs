// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! Configuration module for kindle-gphotos
//!
//! Handles loading, validating, and saving user settings.

pub mod settings;

pub use settings::*;
