//! Object store configuration loaded from environment variables.
//!
//! | Variable             | Default     | Description                              |
//! |----------------------|-------------|------------------------------------------|
//! | `STORAGE_BACKEND`    | `local`     | `local` or `s3`                          |
//! | `STORAGE_LOCAL_ROOT` | `./uploads` | Root directory for the local backend     |
//! | `S3_BUCKET`          | (required)  | Bucket name for the S3 backend           |
//! | `S3_REGION`          | `us-east-1` | Region for the S3 backend                |
//! | `S3_ENDPOINT`        | (none)      | Endpoint override for S3-compatible APIs |

use std::path::PathBuf;

/// Errors raised while configuring or initialising a backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Unknown storage backend '{0}' (expected 'local' or 's3')")]
    UnknownBackend(String),

    #[error("{0} must be set for the S3 storage backend")]
    MissingSetting(&'static str),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which backend to use and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Local {
        root: PathBuf,
    },
    S3 {
        bucket: String,
        region: String,
        endpoint: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

impl StorageConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, StorageError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StorageError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let backend = match var("STORAGE_BACKEND").as_deref().unwrap_or("local") {
            "local" => StorageBackend::Local {
                root: PathBuf::from(var("STORAGE_LOCAL_ROOT").unwrap_or_else(|| "./uploads".into())),
            },
            "s3" => StorageBackend::S3 {
                bucket: var("S3_BUCKET").ok_or(StorageError::MissingSetting("S3_BUCKET"))?,
                region: var("S3_REGION").unwrap_or_else(|| "us-east-1".into()),
                endpoint: var("S3_ENDPOINT"),
            },
            other => return Err(StorageError::UnknownBackend(other.to_string())),
        };

        Ok(Self { backend })
    }
}
