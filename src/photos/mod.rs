// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! Google Photos Library API access

pub mod client;
pub mod models;
pub mod size;

pub use client::{pick_album, PhotosClient};
pub use models::{Album, MediaItem, MediaItemsPage, MediaMetadata, SharedAlbumsPage};
pub use size::{size_suffix, CropMode, DeviceType};
