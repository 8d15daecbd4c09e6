//! Object storage backend abstraction (R2/S3/MinIO, local filesystem, memory).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{
    Attribute, Attributes, ClientOptions, ObjectStore, PutOptions, PutPayload,
};

use crate::archive_store::ArchiveStore;
use crate::error::{Result, StoreError};

/// Default timeout applied to every remote request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the object storage backend.
#[derive(Debug, Clone, Default)]
pub enum ObjectStoreConfig {
    /// In-memory storage (for development and tests)
    #[default]
    Memory,

    /// Local filesystem storage
    Local {
        /// Path to the storage directory
        path: PathBuf,
    },

    /// Cloudflare R2, or any other S3-compatible store when `endpoint` is set
    R2 {
        /// R2 account id, used to derive the endpoint
        account_id: Option<String>,
        /// Explicit endpoint URL (e.g., "http://localhost:9000" for MinIO)
        endpoint: Option<String>,
        /// Access key ID
        access_key: String,
        /// Secret access key
        secret_key: String,
        /// Bucket name
        bucket: String,
        /// Per-request timeout
        timeout: Duration,
    },
}

impl ObjectStoreConfig {
    /// Label reported by the service info endpoint.
    pub fn backend_label(&self) -> &'static str {
        match self {
            ObjectStoreConfig::Memory => "memory",
            ObjectStoreConfig::Local { .. } => "local",
            ObjectStoreConfig::R2 { endpoint: None, .. } => "cloudflare-r2",
            ObjectStoreConfig::R2 { endpoint: Some(_), .. } => "s3",
        }
    }
}

/// Endpoint of an R2 account's S3-compatible API.
pub fn r2_endpoint(account_id: &str) -> String {
    format!("https://{}.r2.cloudflarestorage.com", account_id)
}

/// [`ArchiveStore`] backed by any `object_store` implementation.
#[derive(Debug, Clone)]
pub struct Storage {
    inner: Arc<dyn ObjectStore>,
    backend: &'static str,
    // LocalFileSystem rejects puts that carry attributes
    store_attributes: bool,
}

impl Storage {
    /// Create a new storage backend from configuration.
    pub async fn new(config: ObjectStoreConfig) -> Result<Self> {
        let backend = config.backend_label();

        let (inner, store_attributes): (Arc<dyn ObjectStore>, bool) = match &config {
            ObjectStoreConfig::Memory => (Arc::new(InMemory::new()), true),

            ObjectStoreConfig::Local { path } => {
                // Ensure directory exists
                tokio::fs::create_dir_all(path).await?;
                let store = LocalFileSystem::new_with_prefix(path)
                    .map_err(|e| StoreError::InvalidConfig(e.to_string()))?;
                (Arc::new(store), false)
            }

            ObjectStoreConfig::R2 {
                account_id,
                endpoint,
                access_key,
                secret_key,
                bucket,
                timeout,
            } => {
                let endpoint = match (endpoint, account_id) {
                    (Some(endpoint), _) => endpoint.clone(),
                    (None, Some(account_id)) => r2_endpoint(account_id),
                    (None, None) => {
                        return Err(StoreError::InvalidConfig(
                            "either an account id or an endpoint is required".into(),
                        ))
                    }
                };

                let client_options = ClientOptions::new()
                    .with_timeout(*timeout)
                    .with_connect_timeout(*timeout);

                let store = AmazonS3Builder::new()
                    .with_endpoint(&endpoint)
                    .with_access_key_id(access_key)
                    .with_secret_access_key(secret_key)
                    .with_bucket_name(bucket)
                    // R2 ignores the region but the signer needs one
                    .with_region("auto")
                    .with_allow_http(endpoint.starts_with("http://"))
                    .with_client_options(client_options)
                    .build()
                    .map_err(|e| StoreError::InvalidConfig(e.to_string()))?;

                tracing::info!(%endpoint, %bucket, "Configured S3-compatible archive store");
                (Arc::new(store), true)
            }
        };

        Ok(Self {
            inner,
            backend,
            store_attributes,
        })
    }

    /// Wrap an existing `object_store` implementation.
    pub fn from_store(inner: Arc<dyn ObjectStore>, backend: &'static str) -> Self {
        Self {
            inner,
            backend,
            store_attributes: true,
        }
    }

    /// Create an in-memory storage backend.
    pub fn memory() -> Self {
        Self::from_store(Arc::new(InMemory::new()), "memory")
    }

    fn object_path(key: &str) -> ObjectPath {
        ObjectPath::from(key)
    }
}

#[async_trait]
impl ArchiveStore for Storage {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<()> {
        let path = Self::object_path(key);
        let size = data.len();

        let mut opts = PutOptions::default();
        if self.store_attributes {
            let mut attributes = Attributes::new();
            attributes.insert(Attribute::ContentType, content_type.to_string().into());
            opts.attributes = attributes;
        }

        self.inner
            .put_opts(&path, PutPayload::from(data), opts)
            .await?;
        tracing::debug!(%path, size, content_type, "put object");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        let path = Self::object_path(key);
        let result = self.inner.get(&path).await?;
        let bytes = result.bytes().await?;
        tracing::debug!(%path, size = bytes.len(), "get object");
        Ok(bytes)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let path = Self::object_path(key);
        match self.inner.head(&path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn backend(&self) -> &str {
        self.backend
    }
}
