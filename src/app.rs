// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! One screensaver update, start to finish

use crate::auth::{CodeSource, SessionManager};
use crate::config::Settings;
use crate::error::{GphotoError, Result};
use crate::http::build_client;
use crate::photos::{pick_album, PhotosClient};
use crate::postprocess::Converter;
use crate::selection::{selector_for, PhotoSelector, SelectionStrategy};

/// What a run did to the screensaver image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No new photo; the current image stays
    Unchanged,
    /// A new photo was downloaded
    Updated {
        filename: String,
        /// Whether the e-ink conversion succeeded
        processed: bool,
    },
}

/// Authorize, then select and fetch one photo.
pub async fn run_once(
    settings: &Settings,
    strategy: SelectionStrategy,
    code_source: &dyn CodeSource,
) -> Result<RunOutcome> {
    settings.ensure_directories()?;

    let http = build_client(&settings.resilience)?;
    let manager = SessionManager::from_settings(settings, http)?;
    let session = manager.authorize(code_source).await?;

    let mut photos = PhotosClient::new(session, settings.api.base_url.clone());
    let selector = selector_for(strategy, settings);
    tracing::debug!("Using {} selection", selector.name());

    update_screensaver(&mut photos, selector.as_ref(), settings).await
}

/// Album lookup, selection, download and post-processing.
///
/// Album errors abort before the selector sees anything, so history is
/// only touched when the album was listed.
pub async fn update_screensaver(
    photos: &mut PhotosClient,
    selector: &dyn PhotoSelector,
    settings: &Settings,
) -> Result<RunOutcome> {
    let album_name = settings.album_name();
    let page_size = settings.album.page_size;

    let albums = photos.list_shared_albums(page_size).await?;
    let album = pick_album(&albums, &album_name)?;
    tracing::info!("Found album '{}' with {} items", album_name, album.media_items_count);
    if album.media_items_count == 0 {
        return Err(GphotoError::EmptyAlbum(album_name));
    }

    let items = photos.search_media_items(&album.id, page_size).await?;
    let Some(photo) = selector.select(&items)? else {
        tracing::info!("Photo is unchanged");
        return Ok(RunOutcome::Unchanged);
    };
    tracing::info!("Selected '{}' ({})", photo.filename, photo.id);

    let output = &settings.paths.output_file;
    photos
        .download(&photo, settings.display.device, settings.display.crop, output)
        .await?;

    let processed = if settings.postprocess.enabled {
        match Converter::from_config(&settings.postprocess)
            .convert(output, photo.is_vertical())
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("Unable to post-process the file: {}", e);
                false
            }
        }
    } else {
        tracing::debug!("Post-processing disabled");
        false
    };

    Ok(RunOutcome::Updated {
        filename: photo.filename,
        processed,
    })
}
