//! Filesystem-backed object store.
//!
//! Objects live at `{root}/{key}`. Writes go to a temporary file first and are
//! renamed into place, so a reader never sees a partial object.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use backoffice_core::settings::LogoUpload;
use backoffice_core::storage::{object_key, ObjectStore, ObjectStoreError};
use tokio::fs::{create_dir_all, remove_file, rename, File};
use tokio::io::AsyncWriteExt;

use crate::config::StorageError;

#[derive(Debug)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn new(root: PathBuf) -> Result<Self, StorageError> {
        create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `key` to a path strictly inside the root.
    fn object_path(&self, key: &str) -> Result<PathBuf, ObjectStoreError> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(ObjectStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

fn backend_error(err: std::io::Error) -> ObjectStoreError {
    ObjectStoreError::Backend(err.to_string())
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn upload(&self, file: &LogoUpload, prefix: &str) -> Result<String, ObjectStoreError> {
        let key = object_key(prefix, &file.file_name);
        let path = self.object_path(&key)?;
        let dir = path
            .parent()
            .ok_or_else(|| ObjectStoreError::InvalidKey(key.clone()))?;
        create_dir_all(dir).await.map_err(backend_error)?;

        let tmp_path = dir.join(format!(".tmp-{}", uuid::Uuid::new_v4()));
        let written = async {
            let mut out = File::create(&tmp_path).await?;
            out.write_all(&file.bytes).await?;
            out.sync_all().await?;
            rename(&tmp_path, &path).await
        }
        .await;

        if let Err(err) = written {
            let _ = remove_file(&tmp_path).await;
            return Err(backend_error(err));
        }

        tracing::debug!(%key, bytes = file.bytes.len(), "Object written");
        Ok(key)
    }

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        let path = self.object_path(key)?;
        remove_file(&path).await.map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => ObjectStoreError::NotFound(key.to_string()),
            _ => backend_error(err),
        })
    }
}
