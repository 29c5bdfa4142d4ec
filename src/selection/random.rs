// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! Stateless random selection

use rand::seq::IndexedRandom;

use crate::error::{GphotoError, Result};
use crate::photos::MediaItem;
use crate::selection::{filter_allowed, PhotoSelector};

/// Picks any allow-listed photo uniformly at random
pub struct RandomPick {
    allowed_mime_types: Vec<String>,
}

impl RandomPick {
    pub fn new(allowed_mime_types: Vec<String>) -> Self {
        Self { allowed_mime_types }
    }
}

impl PhotoSelector for RandomPick {
    fn name(&self) -> &str {
        "random"
    }

    fn select(&self, candidates: &[MediaItem]) -> Result<Option<MediaItem>> {
        tracing::info!("Selecting image at random");
        let eligible = filter_allowed(candidates, &self.allowed_mime_types);
        let mut rng = rand::rng();
        let chosen = eligible.choose(&mut rng).ok_or_else(|| {
            GphotoError::EmptySelection(format!(
                "none of {} candidates has an allowed mime type ({})",
                candidates.len(),
                self.allowed_mime_types.join(", ")
            ))
        })?;
        Ok(Some((*chosen).clone()))
    }
}
