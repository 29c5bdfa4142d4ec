// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! History of photos seen in the album
//!
//! Tracks every photo ever listed with first-seen and last-seen timestamps,
//! which is how "newly added to the album" is told apart from "taken
//! recently": the API only exposes creation time.

pub mod store;

pub use store::{HistoryStore, SeenEntry, SeenHistory};
