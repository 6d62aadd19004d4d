//! S3 (and S3-compatible) object store.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use backoffice_core::settings::LogoUpload;
use backoffice_core::storage::{object_key, ObjectStore, ObjectStoreError};

/// Object store writing to a single bucket.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build a client from the default AWS credential chain.
    ///
    /// With an `endpoint` override (MinIO, LocalStack, ...) path-style
    /// addressing is forced.
    pub async fn connect(bucket: &str, region: &str, endpoint: Option<&str>) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::with_client(Client::from_conf(builder.build()), bucket)
    }

    pub fn with_client(client: Client, bucket: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(&self, file: &LogoUpload, prefix: &str) -> Result<String, ObjectStoreError> {
        let key = object_key(prefix, &file.file_name);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .set_content_type(file.content_type.clone())
            .body(ByteStream::from(file.bytes.clone()))
            .send()
            .await
            .map_err(|e| ObjectStoreError::Backend(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(bucket = %self.bucket, %key, bytes = file.bytes.len(), "Object uploaded");
        Ok(key)
    }

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        if key.is_empty() {
            return Err(ObjectStoreError::InvalidKey(key.to_string()));
        }

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| ObjectStoreError::Backend(DisplayErrorContext(&e).to_string()))
    }
}
