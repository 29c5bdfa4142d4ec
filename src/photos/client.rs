// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! Photos Library REST client
//!
//! Only the first page of any listing is read.

use reqwest::Response;
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::auth::AuthorizedSession;
use crate::config::MAX_PAGE_SIZE;
use crate::error::{ApiError, GphotoError, Result};
use crate::photos::models::{Album, MediaItem, MediaItemsPage, SearchRequest, SharedAlbumsPage};
use crate::photos::size::{size_suffix, CropMode, DeviceType};
use crate::utils::{format_size, write_atomic};

/// Client for the endpoints a screensaver run needs
pub struct PhotosClient {
    session: AuthorizedSession,
    base_url: String,
}

impl PhotosClient {
    pub fn new(session: AuthorizedSession, base_url: impl Into<String>) -> Self {
        Self {
            session,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// First page of albums shared with the account
    pub async fn list_shared_albums(&mut self, page_size: u32) -> Result<Vec<Album>> {
        check_page_size(page_size)?;
        let url = format!("{}/v1/sharedAlbums", self.base_url);
        let response = self
            .session
            .get(&url, &[("pageSize", page_size.to_string())], "list shared albums")
            .await?;
        let page: SharedAlbumsPage = parse_json(response, "sharedAlbums.list").await?;
        if page.next_page_token.is_some() {
            tracing::debug!("More shared albums exist beyond the first page");
        }
        Ok(page.shared_albums)
    }

    /// First page of an album's media items, oldest first
    pub async fn search_media_items(
        &mut self,
        album_id: &str,
        page_size: u32,
    ) -> Result<Vec<MediaItem>> {
        check_page_size(page_size)?;
        let url = format!("{}/v1/mediaItems:search", self.base_url);
        let body = SearchRequest {
            album_id,
            page_size,
        };
        let response = self
            .session
            .post_json(&url, &body, "search media items")
            .await?;
        let page: MediaItemsPage = parse_json(response, "mediaItems.search").await?;
        tracing::debug!("Album {} listed {} media items", album_id, page.media_items.len());
        Ok(page.media_items)
    }

    /// Download `item` sized for `device` and write it to `path`.
    ///
    /// Returns the number of bytes written.
    pub async fn download(
        &self,
        item: &MediaItem,
        device: DeviceType,
        crop: CropMode,
        path: &Path,
    ) -> Result<u64> {
        let url = format!(
            "{}{}",
            item.base_url,
            size_suffix(device, crop, item.is_vertical())
        );
        tracing::info!("Downloading '{}' to {}", item.filename, path.display());

        let response = self.session.get_public(&url, "download photo").await?;
        let response = ensure_success(response).await?;
        let bytes = response.bytes().await?;
        write_atomic(path, &bytes, None)?;

        tracing::info!("Downloaded {}", format_size(bytes.len() as u64));
        Ok(bytes.len() as u64)
    }
}

/// First album whose title is exactly `title`
pub fn pick_album<'a>(albums: &'a [Album], title: &str) -> Result<&'a Album> {
    albums
        .iter()
        .find(|album| album.title.as_deref() == Some(title))
        .ok_or_else(|| GphotoError::AlbumNotFound(title.to_string()))
}

fn check_page_size(page_size: u32) -> Result<()> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(GphotoError::InvalidInput(format!(
            "page size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, page_size
        )));
    }
    Ok(())
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ApiError::ServerError {
        status: status.as_u16(),
        message,
    }
    .into())
}

async fn parse_json<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T> {
    let response = ensure_success(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", operation, e)).into())
}
