// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! Device size classes and the Photos download size suffix

use serde::{Deserialize, Serialize};

/// Target display size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceType {
    /// Generic 2048px long edge
    #[serde(rename = "2048")]
    Large2048,
    /// Kindle Paperwhite 2
    #[default]
    #[serde(rename = "PW2")]
    Pw2,
    /// Kindle Paperwhite 3
    #[serde(rename = "PW3")]
    Pw3,
}

impl DeviceType {
    /// (long, short) edge in pixels
    pub fn edges(self) -> (u32, u32) {
        match self {
            DeviceType::Large2048 => (2048, 1024),
            DeviceType::Pw2 => (1024, 758),
            DeviceType::Pw3 => (1448, 1072),
        }
    }
}

/// Server-side crop applied by the Photos image service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropMode {
    /// Plain center crop
    Regular,
    /// Content-aware crop
    #[default]
    Smart,
}

impl CropMode {
    fn flag(self) -> char {
        match self {
            CropMode::Regular => 'c',
            CropMode::Smart => 'p',
        }
    }
}

/// Build the `=w{W}-h{H}-{crop}` suffix appended to a media item's base URL.
///
/// Portrait photos get the short edge as width.
pub fn size_suffix(device: DeviceType, crop: CropMode, is_vertical: bool) -> String {
    let (long, short) = device.edges();
    let (width, height) = if is_vertical {
        (short, long)
    } else {
        (long, short)
    };
    format!("=w{}-h{}-{}", width, height, crop.flag())
}
