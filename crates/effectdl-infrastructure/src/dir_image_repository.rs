//! File system-based image repository.
//!
//! Stores each effect image as `<id>.jpg` under a single directory,
//! mirroring the `images/<id>.jpg` layout the original service used.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use effectdl_core::error::{DlError, Result};
use effectdl_core::{EffectImage, EffectImageRepository};

use crate::paths::DlPaths;

const IMAGE_EXT: &str = "jpg";

/// Directory-backed [`EffectImageRepository`].
///
/// Each id maps to an independent file, so concurrent upserts for
/// different ids cannot corrupt each other. Same-id upserts are
/// last-write-wins: the payload is written to a temp file and renamed
/// over the destination, so readers never observe a partial blob.
pub struct DirImageRepository {
    dir: PathBuf,
}

impl DirImageRepository {
    /// Opens the repository at `dir`, creating the directory if needed.
    ///
    /// This is the explicit initialization step; it must complete before
    /// the repository is used.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await.map_err(|e| {
            DlError::storage(format!(
                "Failed to create image directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    /// Opens the repository at the platform default location.
    pub async fn default_location() -> Result<Self> {
        let dir = DlPaths::image_dir().map_err(|e| DlError::storage(e.to_string()))?;
        Self::open(dir).await
    }

    /// Returns the backing directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn image_path(&self, effect_id: &str) -> Result<PathBuf> {
        Self::validate_id(effect_id)?;
        Ok(self.dir.join(format!("{effect_id}.{IMAGE_EXT}")))
    }

    /// Effect ids double as file names; upstream ids are numeric, so
    /// anything outside `[A-Za-z0-9_-]` is rejected rather than escaped.
    fn validate_id(effect_id: &str) -> Result<()> {
        let valid = !effect_id.is_empty()
            && effect_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
        if valid {
            Ok(())
        } else {
            Err(DlError::storage(format!(
                "Invalid effect id for storage: '{effect_id}'"
            )))
        }
    }
}

#[async_trait]
impl EffectImageRepository for DirImageRepository {
    async fn upsert(&self, image: &EffectImage) -> Result<()> {
        let dest = self.image_path(&image.id)?;
        let tmp = dest.with_extension(format!("{IMAGE_EXT}.tmp"));

        fs::write(&tmp, &image.bytes).await.map_err(|e| {
            DlError::storage(format!("Failed to write '{}': {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &dest).await.map_err(|e| {
            DlError::storage(format!("Failed to rename into '{}': {}", dest.display(), e))
        })?;

        tracing::debug!("[DirImageRepository] Stored image for effect {}", image.id);
        Ok(())
    }

    async fn get(&self, effect_id: &str) -> Result<Option<EffectImage>> {
        let path = self.image_path(effect_id)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(EffectImage::new(effect_id, bytes))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DlError::storage(format!(
                "Failed to read '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    async fn get_all(&self) -> Result<Vec<EffectImage>> {
        let mut entries = fs::read_dir(&self.dir).await.map_err(|e| {
            DlError::storage(format!("Failed to list '{}': {}", self.dir.display(), e))
        })?;

        let mut images = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DlError::storage(format!("Failed to read directory entry: {e}")))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(IMAGE_EXT) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let bytes = fs::read(&path).await.map_err(|e| {
                DlError::storage(format!("Failed to read '{}': {}", path.display(), e))
            })?;
            images.push(EffectImage::new(id, bytes));
        }

        // Stable output order for consumers; read_dir order is platform-defined.
        images.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(images)
    }

    async fn delete(&self, effect_id: &str) -> Result<()> {
        let path = self.image_path(effect_id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DlError::storage(format!(
                "Failed to delete '{}': {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_repository() -> (DirImageRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let repo = DirImageRepository::open(temp_dir.path()).await.unwrap();
        (repo, temp_dir)
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let (repo, _dir) = create_test_repository().await;
        assert!(repo.get("42").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let (repo, _dir) = create_test_repository().await;
        repo.upsert(&EffectImage::new("1", vec![0xFF, 0xD8, 0xFF]))
            .await
            .unwrap();

        let image = repo.get("1").await.unwrap().expect("Should find image");
        assert_eq!(image.bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_last_write_wins() {
        let (repo, _dir) = create_test_repository().await;
        repo.upsert(&EffectImage::new("1", vec![1])).await.unwrap();
        repo.upsert(&EffectImage::new("1", vec![2, 2])).await.unwrap();

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].bytes, vec![2, 2]);
    }

    #[tokio::test]
    async fn test_get_all_enumerates_every_entry() {
        let (repo, _dir) = create_test_repository().await;
        repo.upsert(&EffectImage::new("2", vec![2])).await.unwrap();
        repo.upsert(&EffectImage::new("1", vec![1])).await.unwrap();

        let ids: Vec<_> = repo.get_all().await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let (repo, _dir) = create_test_repository().await;
        repo.delete("99").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_removes_entry() {
        let (repo, _dir) = create_test_repository().await;
        repo.upsert(&EffectImage::new("1", vec![1])).await.unwrap();
        repo.delete("1").await.unwrap();
        assert!(repo.get("1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let repo = DirImageRepository::open(temp_dir.path()).await.unwrap();
            repo.upsert(&EffectImage::new("1", vec![9])).await.unwrap();
        }

        let reopened = DirImageRepository::open(temp_dir.path()).await.unwrap();
        let image = reopened.get("1").await.unwrap().expect("Should persist");
        assert_eq!(image.bytes, vec![9]);
    }

    #[tokio::test]
    async fn test_rejects_path_traversal_id() {
        let (repo, _dir) = create_test_repository().await;
        let err = repo.get("../evil").await.unwrap_err();
        assert!(err.is_storage());
    }
}
