// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! Photo selection strategies
//!
//! Both strategies take the album listing (oldest first, as the API returns
//! it) and pick at most one photo to display.

pub mod latest;
pub mod random;

pub use latest::LatestUnseen;
pub use random::RandomPick;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::Result;
use crate::history::HistoryStore;
use crate::photos::MediaItem;

/// Picks the photo to display this run
pub trait PhotoSelector {
    /// Strategy name for logs
    fn name(&self) -> &str;

    /// `Ok(None)` means nothing needs to change.
    fn select(&self, candidates: &[MediaItem]) -> Result<Option<MediaItem>>;
}

/// Configured selection strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
    /// Newest photo not shown before
    #[default]
    Latest,
    /// Any photo, uniformly at random
    Random,
}

/// Create the selector for a strategy.
pub fn selector_for(
    strategy: SelectionStrategy,
    settings: &Settings,
) -> Box<dyn PhotoSelector> {
    let allowed = settings.selection.allowed_mime_types.clone();
    match strategy {
        SelectionStrategy::Latest => Box::new(LatestUnseen::new(
            HistoryStore::new(&settings.paths.history_file),
            allowed,
        )),
        SelectionStrategy::Random => Box::new(RandomPick::new(allowed)),
    }
}

/// Candidates whose mime type is allow-listed, order preserved
pub fn filter_allowed<'a>(candidates: &'a [MediaItem], allowed: &[String]) -> Vec<&'a MediaItem> {
    candidates
        .iter()
        .filter(|item| allowed.iter().any(|mime| mime == &item.mime_type))
        .collect()
}
