//! Object storage seam.
//!
//! Binary assets (currently only the settings logo) live outside the
//! relational store. Backends implement [`ObjectStore`]; workflows treat every
//! object-store call as a side effect that cannot join a database
//! transaction.

use async_trait::async_trait;

use crate::settings::LogoUpload;

/// Key prefix for miscellaneous uploads such as the organisation logo.
pub const LOGO_PREFIX: &str = "misc";

/// Longest file extension preserved when building an object key.
const MAX_EXTENSION_LEN: usize = 10;

/// Errors raised by object-store backends.
#[derive(Debug, thiserror::Error)]
pub enum ObjectStoreError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Object store backend error: {0}")]
    Backend(String),
}

/// A blob store addressed by string keys.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `file` under `prefix` and return the key it was written to.
    async fn upload(&self, file: &LogoUpload, prefix: &str) -> Result<String, ObjectStoreError>;

    /// Delete the object stored under `key`.
    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError>;
}

/// Build a fresh, collision-free key `"{prefix}/{uuid}.{ext}"`.
///
/// The extension is taken from `file_name` when it is short and
/// alphanumeric; otherwise the key has no extension.
pub fn object_key(prefix: &str, file_name: &str) -> String {
    let id = uuid::Uuid::new_v4();
    let prefix = prefix.trim_matches('/');
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        });

    match ext {
        Some(ext) => format!("{prefix}/{id}.{ext}"),
        None => format!("{prefix}/{id}"),
    }
}

/// Delete an object without letting a failure escape the caller.
///
/// The outcome is logged and returned so callers can discard it explicitly.
pub async fn release_object(
    objects: &dyn ObjectStore,
    key: &str,
    reason: &'static str,
) -> Result<(), ObjectStoreError> {
    let result = objects.delete(key).await;
    match &result {
        Ok(()) => tracing::debug!(key, reason, "Object released"),
        Err(e) => tracing::warn!(key, reason, error = %e, "Failed to release object"),
    }
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
