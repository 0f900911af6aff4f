// Biblio - Library Catalog Core
// Copyright (C) 2026 Biblio contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Application configuration
//!
//! Where the database file and the media directory live, persisted as JSON
//! next to them. Collaborators embedding the core (web frontend, CLI) load
//! this once per process.

use crate::error::{CatalogError, Result};
use crate::storage::Database;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Root directory for stored media (covers)
    pub media_dir: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let database_path = Database::get_default_path();
        let media_dir = database_path
            .parent()
            .map(|p| p.join("media"))
            .unwrap_or_else(|| PathBuf::from("media"));

        Self {
            database_path,
            media_dir,
        }
    }
}

impl CatalogConfig {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CatalogError::FileIo(format!(
                "Failed to read config {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let config = serde_json::from_str(&data)?;
        Ok(config)
    }

    /// Save configuration as JSON, creating parent directories as needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), data).map_err(|e| {
            CatalogError::FileIo(format!(
                "Failed to write config {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(())
    }
}
