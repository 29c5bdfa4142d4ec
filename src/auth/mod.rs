// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The kindle-gphotos contributors

//! OAuth session lifecycle for the Photos Library API
//!
//! Loads the saved credential, refreshes it when it expires, persists every
//! new token with owner-only permissions, and falls back to a one-time
//! interactive grant on the first run.

pub mod code_source;
pub mod credential;
pub mod manager;
pub mod secrets;
pub mod session;

pub use code_source::{CodeSource, ConsoleCodeSource, PresetCodeSource};
pub use credential::{Credential, CredentialStore};
pub use manager::SessionManager;
pub use secrets::ClientSecrets;
pub use session::AuthorizedSession;
