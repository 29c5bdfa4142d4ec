// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! Photos Library API wire types
//!
//! Only the fields the selection and download steps read are modelled.
//! The API encodes several integers as JSON strings, so those go through
//! [`lenient_u64`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A shared album as returned by `sharedAlbums.list`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    /// Albums without a title exist and are never matched
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub media_items_count: u64,
}

/// Response body of `sharedAlbums.list`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedAlbumsPage {
    #[serde(default)]
    pub shared_albums: Vec<Album>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// A photo record from `mediaItems.search`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub filename: String,
    pub mime_type: String,
    /// Download URL template; size parameters are appended
    pub base_url: String,
    pub media_metadata: MediaMetadata,
}

impl MediaItem {
    /// When the photo was taken
    pub fn creation_time(&self) -> DateTime<Utc> {
        self.media_metadata.creation_time
    }

    /// Portrait photos are taller than they are wide
    pub fn is_vertical(&self) -> bool {
        self.media_metadata.height > self.media_metadata.width
    }
}

/// Photo metadata block of a [`MediaItem`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    pub creation_time: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub width: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub height: u64,
}

/// Response body of `mediaItems.search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemsPage {
    #[serde(default)]
    pub media_items: Vec<MediaItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Request body of `mediaItems.search`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest<'a> {
    pub album_id: &'a str,
    pub page_size: u32,
}

fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        Number(u64),
        String(String),
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Number(n) => Ok(n),
        StringOrNumber::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
