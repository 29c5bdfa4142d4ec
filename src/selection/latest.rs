// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! Newest-unseen selection backed by the history store

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::history::{HistoryStore, SeenEntry};
use crate::photos::MediaItem;
use crate::selection::{filter_allowed, PhotoSelector};

/// Selects the newest photo that no earlier run has seen
pub struct LatestUnseen {
    store: HistoryStore,
    allowed_mime_types: Vec<String>,
}

impl LatestUnseen {
    pub fn new(store: HistoryStore, allowed_mime_types: Vec<String>) -> Self {
        Self {
            store,
            allowed_mime_types,
        }
    }

    /// Select as of `now` and record every allow-listed candidate as seen.
    ///
    /// Candidates must be ordered oldest first: the last unseen one walked
    /// is the result. The history is rewritten even when nothing is new so
    /// `last_seen_at` stays current.
    pub fn select_at(
        &self,
        candidates: &[MediaItem],
        now: DateTime<Utc>,
    ) -> Result<Option<MediaItem>> {
        tracing::info!("Selecting latest image");
        let candidates = filter_allowed(candidates, &self.allowed_mime_types);
        let mut history = self.store.load()?;

        let mut selected = None;
        for item in candidates {
            if history.touch(&item.id, now) {
                tracing::debug!("We have already seen '{}' ({})", item.filename, item.id);
                continue;
            }
            tracing::info!("We didn't see this last time: '{}' ({})", item.filename, item.id);
            history.insert(SeenEntry::first_sighting(item, now));
            selected = Some(item);
        }

        self.store.save(&history)?;

        if selected.is_none() {
            tracing::info!("No new photo in the album");
        }
        Ok(selected.cloned())
    }
}

impl PhotoSelector for LatestUnseen {
    fn name(&self) -> &str {
        "latest"
    }

    fn select(&self, candidates: &[MediaItem]) -> Result<Option<MediaItem>> {
        self.select_at(candidates, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::test_support::photo;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn run_at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    fn selector(temp_dir: &TempDir) -> LatestUnseen {
        LatestUnseen::new(
            HistoryStore::new(temp_dir.path().join("data").join("images_seen.txt")),
            vec!["image/jpeg".to_string()],
        )
    }

    #[test]
    fn test_cold_start_creates_store() {
        let temp_dir = TempDir::new().unwrap();
        let selector = selector(&temp_dir);
        let x = photo("X", "image/jpeg", 1);

        let selected = selector.select_at(&[x.clone()], run_at(8)).unwrap();
        assert_eq!(selected, Some(x));

        let history = selector.store.load().unwrap();
        assert_eq!(history.len(), 1);
        let entry = history.get("X").unwrap();
        assert_eq!(entry.filename, "X.jpg");
        assert_eq!(entry.first_seen_at, run_at(8));
        assert_eq!(entry.last_seen_at, run_at(8));
    }

    #[test]
    fn test_newest_new_wins() {
        let temp_dir = TempDir::new().unwrap();
        let selector = selector(&temp_dir);
        let a = photo("A", "image/jpeg", 1);
        let b = photo("B", "image/jpeg", 2);
        let c = photo("C", "image/jpeg", 3);

        selector.select_at(&[a.clone()], run_at(1)).unwrap();

        let now = run_at(2);
        let selected = selector
            .select_at(&[a.clone(), b.clone(), c.clone()], now)
            .unwrap();
        assert_eq!(selected, Some(c));

        let history = selector.store.load().unwrap();
        assert_eq!(history.len(), 3);
        for id in ["B", "C"] {
            let entry = history.get(id).unwrap();
            assert_eq!(entry.first_seen_at, now);
            assert_eq!(entry.last_seen_at, now);
        }
        let a_entry = history.get("A").unwrap();
        assert_eq!(a_entry.first_seen_at, run_at(1));
        assert_eq!(a_entry.last_seen_at, now);
    }

    #[test]
    fn test_reencounter_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let selector = selector(&temp_dir);
        let candidates = vec![photo("A", "image/jpeg", 1), photo("B", "image/jpeg", 2)];

        let first = selector.select_at(&candidates, run_at(1)).unwrap();
        assert_eq!(first.map(|p| p.id), Some("B".to_string()));

        let later = run_at(1) + Duration::hours(3);
        let second = selector.select_at(&candidates, later).unwrap();
        assert!(second.is_none());

        let history = selector.store.load().unwrap();
        assert_eq!(history.len(), 2);
        for entry in history.entries() {
            assert_eq!(entry.first_seen_at, run_at(1));
            assert_eq!(entry.last_seen_at, later);
        }
    }

    #[test]
    fn test_disappeared_photo_keeps_its_row() {
        let temp_dir = TempDir::new().unwrap();
        let selector = selector(&temp_dir);

        selector
            .select_at(&[photo("gone", "image/jpeg", 1)], run_at(1))
            .unwrap();
        let selected = selector
            .select_at(&[photo("fresh", "image/jpeg", 2)], run_at(2))
            .unwrap();
        assert_eq!(selected.map(|p| p.id), Some("fresh".to_string()));

        let history = selector.store.load().unwrap();
        assert_eq!(history.len(), 2);
        let gone = history.get("gone").unwrap();
        assert_eq!(gone.last_seen_at, run_at(1));
    }

    #[test]
    fn test_filters_disallowed_mime_types() {
        let temp_dir = TempDir::new().unwrap();
        let selector = selector(&temp_dir);
        let jpeg = photo("jpeg", "image/jpeg", 1);
        let video = photo("video", "video/mp4", 2);

        let selected = selector
            .select_at(&[jpeg.clone(), video], run_at(1))
            .unwrap();
        assert_eq!(selected, Some(jpeg));

        let history = selector.store.load().unwrap();
        assert!(!history.contains("video"));
    }

    #[test]
    fn test_no_allowed_candidates_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let selector = selector(&temp_dir);

        let selected = selector
            .select_at(&[photo("clip", "video/mp4", 1)], run_at(1))
            .unwrap();
        assert!(selected.is_none());
    }

    #[test]
    fn test_preserves_created_at_and_filename_of_known_rows() {
        let temp_dir = TempDir::new().unwrap();
        let selector = selector(&temp_dir);
        let original = photo("A", "image/jpeg", 1);
        selector.select_at(&[original.clone()], run_at(1)).unwrap();

        let mut renamed = original.clone();
        renamed.filename = "renamed.jpg".to_string();
        selector.select_at(&[renamed], run_at(2)).unwrap();

        let history = selector.store.load().unwrap();
        let entry = history.get("A").unwrap();
        assert_eq!(entry.filename, "A.jpg");
        assert_eq!(entry.created_at, original.creation_time());
    }
}
