// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! CLI module for kindle-gphotos
//!
//! Handles command-line argument parsing.

pub mod args;

pub use args::*;
