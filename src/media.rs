// Biblio - Library Catalog Core
// Copyright (C) 2026 Biblio contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Cover storage
//!
//! The media collaborator's storage half: takes a cover payload, writes it
//! under the media directory, and hands back the opaque reference string
//! that goes into `books.cover_path`. The payload bytes are never
//! interpreted; whatever the upload form accepted is what gets stored.

use crate::error::{CatalogError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Subdirectory for book covers, also the reference prefix
const COVERS_DIR: &str = "covers";

/// Longest extension carried over from the uploaded filename
const MAX_EXT_LEN: usize = 8;

/// Stores cover files under a media directory
#[derive(Debug, Clone)]
pub struct CoverStore {
    media_dir: PathBuf,
}

impl CoverStore {
    /// Create a cover store rooted at `media_dir`
    pub fn new<P: Into<PathBuf>>(media_dir: P) -> Self {
        Self {
            media_dir: media_dir.into(),
        }
    }

    /// Get the media directory root
    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Store a cover payload, returning its reference path
    ///
    /// The reference is `covers/<uuid>.<ext>` with the extension taken from
    /// `original_filename` (sanitized, lowercased). Identical payloads get
    /// distinct references; nothing is deduplicated.
    pub async fn store(&self, payload: &[u8], original_filename: &str) -> Result<String> {
        let dir = self.media_dir.join(COVERS_DIR);
        fs::create_dir_all(&dir).await.map_err(|e| {
            CatalogError::FileIo(format!(
                "Failed to create covers directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let filename = match sanitized_extension(original_filename) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let target = dir.join(&filename);

        fs::write(&target, payload).await.map_err(|e| {
            CatalogError::FileIo(format!("Failed to write cover {}: {}", target.display(), e))
        })?;

        Ok(format!("{COVERS_DIR}/{filename}"))
    }

    /// Remove a stored cover by its reference path
    ///
    /// An already-missing file is not an error: the reference may point at a
    /// cover a previous edit replaced.
    pub async fn remove(&self, reference: &str) -> Result<()> {
        // A reference is a relative path we produced; refuse anything else.
        let path = Path::new(reference);
        if path.is_absolute()
            || path
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(CatalogError::invalid_input(format!(
                "not a cover reference: {reference}"
            )));
        }

        let target = self.media_dir.join(path);
        match fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CatalogError::FileIo(format!(
                "Failed to remove cover {}: {}",
                target.display(),
                e
            ))),
        }
    }
}

/// Extract a safe lowercase extension from an uploaded filename
fn sanitized_extension(original_filename: &str) -> Option<String> {
    let ext = Path::new(original_filename).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > MAX_EXT_LEN {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_remove_cover() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = CoverStore::new(dir.path());

        let reference = store
            .store(b"jpeg bytes", "master.JPG")
            .await
            .expect("Failed to store cover");

        assert!(reference.starts_with("covers/"));
        assert!(reference.ends_with(".jpg"));
        assert!(dir.path().join(&reference).exists());

        store.remove(&reference).await.expect("Failed to remove cover");
        assert!(!dir.path().join(&reference).exists());

        // Removing again is fine
        store.remove(&reference).await.expect("Second remove failed");
    }

    #[tokio::test]
    async fn test_identical_payloads_get_distinct_references() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = CoverStore::new(dir.path());

        let a = store.store(b"same", "cover.png").await.unwrap();
        let b = store.store(b"same", "cover.png").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_weird_filenames_lose_their_extension() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = CoverStore::new(dir.path());

        let reference = store.store(b"data", "noext").await.unwrap();
        assert!(!reference.contains('.'));

        let reference = store.store(b"data", "evil.j%g").await.unwrap();
        assert!(!reference.contains('.'));
    }

    #[tokio::test]
    async fn test_remove_rejects_traversal() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = CoverStore::new(dir.path());

        let err = store.remove("../outside.txt").await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidInput(_)));
    }
}
