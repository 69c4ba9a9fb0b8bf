//! Implements PosterStorePort on the local filesystem.
//!
//! Files land under `root/<path>` and are served by the HTTP adapter at `<public_base>/<path>`.

use crate::domain::DomainError;
use crate::ports::PosterStorePort;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Filesystem poster store.
pub struct FsPosterStore {
    root: PathBuf,
    public_base: String,
}

impl FsPosterStore {
    /// `public_base` is the URL prefix the `root` directory is served under
    /// (e.g. "http://localhost:3000/media").
    pub fn new(root: impl AsRef<Path>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            public_base: public_base.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative storage path under `root`. Rejects absolute paths and `..`.
    fn resolve(&self, path: &str) -> Result<PathBuf, DomainError> {
        let rel = Path::new(path);
        let safe = !path.is_empty()
            && rel
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(DomainError::Storage(format!("invalid storage path: {}", path)));
        }
        Ok(self.root.join(rel))
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base.trim_end_matches('/'), path)
    }
}

#[async_trait::async_trait]
impl PosterStorePort for FsPosterStore {
    async fn upload(&self, path: &str, bytes: &[u8]) -> Result<String, DomainError> {
        let dest = self.resolve(path)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Storage(format!("create dir: {}", e)))?;
        }
        let mut f = fs::File::create(&dest)
            .await
            .map_err(|e| DomainError::Storage(format!("create file: {}", e)))?;
        f.write_all(bytes)
            .await
            .map_err(|e| DomainError::Storage(format!("write file: {}", e)))?;
        f.flush()
            .await
            .map_err(|e| DomainError::Storage(format!("flush file: {}", e)))?;

        info!(path = %dest.display(), size = bytes.len(), "poster stored");
        Ok(self.public_url(path))
    }

    async fn remove(&self, path: &str) -> Result<(), DomainError> {
        let target = self.resolve(path)?;
        match fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %target.display(), "poster already gone");
                Ok(())
            }
            Err(e) => Err(DomainError::Storage(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsPosterStore::new(dir.path(), "http://localhost:3000/media/");

        let url = store
            .upload("asimovies/1_alien.jpg", b"jpeg-bytes")
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:3000/media/asimovies/1_alien.jpg");

        let on_disk = dir.path().join("asimovies/1_alien.jpg");
        assert_eq!(std::fs::read(&on_disk).unwrap(), b"jpeg-bytes");

        store.remove("asimovies/1_alien.jpg").await.unwrap();
        assert!(!on_disk.exists());
        // Second remove is a no-op.
        store.remove("asimovies/1_alien.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsPosterStore::new(dir.path(), "http://x");
        assert!(store.upload("../evil.jpg", b"x").await.is_err());
        assert!(store.upload("/etc/evil.jpg", b"x").await.is_err());
        assert!(store.upload("", b"x").await.is_err());
    }
}
