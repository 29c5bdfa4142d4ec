// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! E-ink post-processing through ImageMagick `convert`
//!
//! Requires the linkss screensaver hack on the device, which ships the
//! `convert` binary and the Kindle palette image.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::config::PostProcessConfig;
use crate::error::{GphotoError, Result};

/// Runs the external converter on a downloaded photo
#[derive(Debug, Clone)]
pub struct Converter {
    convert_path: PathBuf,
    colors_gif_path: PathBuf,
}

impl Converter {
    pub fn new(convert_path: impl Into<PathBuf>, colors_gif_path: impl Into<PathBuf>) -> Self {
        Self {
            convert_path: convert_path.into(),
            colors_gif_path: colors_gif_path.into(),
        }
    }

    pub fn from_config(config: &PostProcessConfig) -> Self {
        Self::new(&config.convert_path, &config.colors_gif_path)
    }

    /// Path of the PNG produced for `file`
    pub fn output_path(file: &Path) -> PathBuf {
        let mut name = file.as_os_str().to_os_string();
        name.push(".png");
        PathBuf::from(name)
    }

    /// Arguments passed to `convert`, in order
    pub fn command_args(&self, file: &Path, is_vertical: bool) -> Vec<OsString> {
        let rotation = if is_vertical { "0" } else { "270" };
        let mut args: Vec<OsString> = vec![file.into(), "-rotate".into(), rotation.into()];
        args.extend(
            [
                "-filter",
                "LanczosSharp",
                "-brightness-contrast",
                "3x15",
                "-gravity",
                "center",
                "+repage",
                "-colorspace",
                "Gray",
                "-dither",
                "FloydSteinberg",
                "-remap",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(self.colors_gif_path.clone().into());
        args.extend(
            [
                "-quality",
                "75",
                "-define",
                "png:color-type=0",
                "-define",
                "png:bit-depth=8",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(Self::output_path(file).into());
        args
    }

    /// Convert `file` to a grayscale PNG next to it.
    ///
    /// Landscape photos are rotated to fill the portrait screen.
    pub async fn convert(&self, file: &Path, is_vertical: bool) -> Result<PathBuf> {
        tracing::info!("Attempting to post-process '{}'", file.display());

        let output = Command::new(&self.convert_path)
            .args(self.command_args(file, is_vertical))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                GphotoError::PostProcess(format!(
                    "failed to start {}: {}",
                    self.convert_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GphotoError::PostProcess(format!(
                "{} exited with {}: {}",
                self.convert_path.display(),
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        let png = Self::output_path(file);
        tracing::info!("Post-processing complete: {}", png.display());
        Ok(png)
    }
}
