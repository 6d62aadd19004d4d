//! Object store backends for uploaded assets.
//!
//! Two implementations of [`backoffice_core::storage::ObjectStore`]:
//! [`LocalObjectStore`] writes under a directory on disk, [`S3ObjectStore`]
//! talks to S3 or any S3-compatible service.

use std::sync::Arc;

use backoffice_core::storage::ObjectStore;

pub mod config;
pub mod local;
pub mod s3;

pub use config::{StorageBackend, StorageConfig, StorageError};
pub use local::LocalObjectStore;
pub use s3::S3ObjectStore;

/// Construct the backend selected by `config`.
pub async fn build_object_store(
    config: &StorageConfig,
) -> Result<Arc<dyn ObjectStore>, StorageError> {
    match &config.backend {
        StorageBackend::Local { root } => {
            let store = LocalObjectStore::new(root.clone()).await?;
            tracing::info!(root = %root.display(), "Using local object store");
            Ok(Arc::new(store))
        }
        StorageBackend::S3 {
            bucket,
            region,
            endpoint,
        } => {
            let store = S3ObjectStore::connect(bucket, region, endpoint.as_deref()).await;
            tracing::info!(%bucket, %region, endpoint = ?endpoint, "Using S3 object store");
            Ok(Arc::new(store))
        }
    }
}
