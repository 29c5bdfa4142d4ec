// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! History store implementation
//!
//! One photo per line, `filename|created_at|first_seen_at|last_seen_at|identifier`,
//! timestamps in RFC 3339. The delimiter is not escaped, so a filename
//! containing `|` makes its line unreadable (it is skipped on load).

use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::photos::MediaItem;
use crate::utils::write_atomic;

const FIELD_SEPARATOR: char = '|';
const FIELD_COUNT: usize = 5;

/// A photo observed in the album on some earlier run
#[derive(Debug, Clone, PartialEq)]
pub struct SeenEntry {
    pub filename: String,
    pub created_at: DateTime<Utc>,
    /// When this photo first appeared; never changes after creation
    pub first_seen_at: DateTime<Utc>,
    /// Most recent run that still listed this photo
    pub last_seen_at: DateTime<Utc>,
    pub identifier: String,
}

impl SeenEntry {
    /// First sighting of `item` at `now`
    pub fn first_sighting(item: &MediaItem, now: DateTime<Utc>) -> Self {
        Self {
            filename: item.filename.clone(),
            created_at: item.creation_time(),
            first_seen_at: now,
            last_seen_at: now,
            identifier: item.id.clone(),
        }
    }

    /// Serialize to one history line (without newline)
    pub fn to_line(&self) -> String {
        [
            self.filename.as_str(),
            &format_timestamp(self.created_at),
            &format_timestamp(self.first_seen_at),
            &format_timestamp(self.last_seen_at),
            self.identifier.as_str(),
        ]
        .join("|")
    }

    /// Parse one history line
    pub fn parse_line(line: &str) -> std::result::Result<Self, String> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Err(format!(
                "expected {} fields, found {}",
                FIELD_COUNT,
                fields.len()
            ));
        }

        let identifier = fields[4].trim();
        if identifier.is_empty() {
            return Err("empty identifier".to_string());
        }

        Ok(Self {
            filename: fields[0].to_string(),
            created_at: parse_timestamp(fields[1])?,
            first_seen_at: parse_timestamp(fields[2])?,
            last_seen_at: parse_timestamp(fields[3])?,
            identifier: identifier.to_string(),
        })
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(field: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(field.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| format!("bad timestamp {:?}: {}", field, e))
}

/// In-memory view of the history, keyed by identifier, in file order
#[derive(Debug, Clone, Default)]
pub struct SeenHistory {
    entries: Vec<SeenEntry>,
    index: HashMap<String, usize>,
}

impl SeenHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct photos ever seen
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    pub fn get(&self, identifier: &str) -> Option<&SeenEntry> {
        self.index.get(identifier).map(|&i| &self.entries[i])
    }

    /// Add an entry unless its identifier is already present.
    ///
    /// Returns whether the entry was added.
    pub fn insert(&mut self, entry: SeenEntry) -> bool {
        if self.index.contains_key(&entry.identifier) {
            return false;
        }
        self.index
            .insert(entry.identifier.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Update `last_seen_at` of a known photo.
    ///
    /// Returns false for unknown identifiers.
    pub fn touch(&mut self, identifier: &str, now: DateTime<Utc>) -> bool {
        match self.index.get(identifier) {
            Some(&i) => {
                self.entries[i].last_seen_at = now;
                true
            }
            None => false,
        }
    }

    /// All entries in file order
    pub fn entries(&self) -> &[SeenEntry] {
        &self.entries
    }

    /// Most recently discovered photos first
    pub fn list_recent(&self, limit: usize) -> Vec<&SeenEntry> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.first_seen_at.cmp(&a.first_seen_at));
        sorted.into_iter().take(limit).collect()
    }
}

/// History store backed by a line-oriented text file
#[derive(Debug, Clone)]
pub struct HistoryStore {
    /// Path to the history file
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the history; a missing file is an empty history.
    pub fn load(&self) -> Result<SeenHistory> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("{} does not exist yet; starting with empty history", self.path.display());
                return Ok(SeenHistory::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut history = SeenHistory::new();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match SeenEntry::parse_line(line) {
                Ok(entry) => {
                    if !history.insert(entry) {
                        tracing::warn!(
                            "{}:{}: duplicate identifier, keeping the first row",
                            self.path.display(),
                            number + 1
                        );
                    }
                }
                Err(reason) => {
                    tracing::warn!(
                        "{}:{}: skipping unreadable line: {}",
                        self.path.display(),
                        number + 1,
                        reason
                    );
                }
            }
        }

        Ok(history)
    }

    /// Replace the file with `history` atomically
    pub fn save(&self, history: &SeenHistory) -> Result<()> {
        let mut content = String::new();
        for entry in history.entries() {
            content.push_str(&entry.to_line());
            content.push('\n');
        }
        write_atomic(&self.path, content.as_bytes(), None)
    }
}
