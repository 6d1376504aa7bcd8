//! Local filesystem storage for uploaded poster images.
//!
//! Files live under the configured media root and are served back by the
//! `ServeDir` mounted at the media URL prefix (see [`crate::router`]).

use std::path::{Path, PathBuf};

use reel_core::poster::poster_path;

use crate::error::{AppError, AppResult};
use crate::payload::PosterImage;

#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    url_prefix: String,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a validated poster to a fresh path and return that path,
    /// relative to the media root.
    pub async fn store_poster(&self, image: &PosterImage) -> AppResult<String> {
        let relative = poster_path(image.format);
        let path = self.root.join(&relative);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?;
        }
        tokio::fs::write(&path, &image.bytes)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        tracing::debug!(path = %path.display(), bytes = image.bytes.len(), "Stored poster");
        Ok(relative)
    }

    /// Remove a poster written for a request whose store write failed.
    ///
    /// Failures are logged and swallowed; the caller is already reporting
    /// the original error.
    pub async fn discard(&self, relative: &str) {
        let path = self.root.join(relative);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Discarded poster"),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to discard poster")
            }
        }
    }

    /// Public URL for a stored relative path.
    pub fn url_for(&self, relative: &str) -> String {
        format!("{}/{relative}", self.url_prefix)
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Bytes;
    use reel_core::poster::PosterFormat;

    use super::*;

    #[test]
    fn url_for_joins_prefix() {
        let media = MediaStorage::new("media", "/media");
        assert_eq!(media.url_for("posters/a.png"), "/media/posters/a.png");
    }

    #[tokio::test]
    async fn store_poster_writes_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStorage::new(dir.path(), "/media");
        let image = PosterImage {
            bytes: Bytes::from_static(b"poster-bytes"),
            format: PosterFormat::Png,
        };

        let relative = media.store_poster(&image).await.unwrap();
        assert!(relative.starts_with("posters/"));
        assert!(relative.ends_with(".png"));

        let written = tokio::fs::read(dir.path().join(&relative)).await.unwrap();
        assert_eq!(written, b"poster-bytes");
    }

    #[tokio::test]
    async fn discard_removes_stored_poster() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStorage::new(dir.path(), "/media");
        let image = PosterImage {
            bytes: Bytes::from_static(b"poster-bytes"),
            format: PosterFormat::Jpeg,
        };

        let relative = media.store_poster(&image).await.unwrap();
        media.discard(&relative).await;
        assert!(!dir.path().join(&relative).exists());

        // A second discard only logs.
        media.discard(&relative).await;
    }
}
