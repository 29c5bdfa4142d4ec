// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

use std::path::{Path, PathBuf};

use crate::error::{GphotoError, Result};

use super::Settings;

impl Settings {
    /// Get the default settings file path.
    pub fn default_path() -> PathBuf {
        Self::app_home().join("settings.json")
    }

    /// Load settings from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load settings from a specific path.
    ///
    /// A missing file yields defaults; an unreadable or malformed one is a
    /// configuration error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            GphotoError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let settings: Settings = serde_json::from_str(&content).map_err(|e| {
            GphotoError::Config(format!("malformed settings {}: {}", path.display(), e))
        })?;
        Ok(settings)
    }

    /// Save settings to a specific path, fully overwriting.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the application home directory (~/.kindle-gphotos or $KINDLE_GPHOTOS_HOME).
    pub fn app_home() -> PathBuf {
        if let Ok(home) = std::env::var("KINDLE_GPHOTOS_HOME") {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".kindle-gphotos")
    }

    /// Ensure the directories that hold run state exist.
    pub fn ensure_directories(&self) -> Result<()> {
        let files = [
            &self.paths.history_file,
            &self.paths.output_file,
            &self.auth.token_file,
        ];

        for file in files {
            if let Some(dir) = file.parent() {
                if !dir.as_os_str().is_empty() && !dir.exists() {
                    std::fs::create_dir_all(dir)?;
                }
            }
        }

        Ok(())
    }
}
