//! Object storage adapter for mixtape archives
//!
//! This crate exposes the three operations the gateway needs from an
//! S3-compatible object store (`put`, `get`, `exists`) behind the
//! [`ArchiveStore`] trait, with a [`Storage`] implementation built on the
//! `object_store` crate.
//!
//! # Features
//!
//! - Cloudflare R2 out of the box, any S3-compatible endpoint (MinIO, AWS) by override
//! - Local filesystem and in-memory backends for development and tests
//! - Absent objects are reported as [`StoreError::NotFound`], never folded into other failures
//!
//! # Example
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use mixtape_object_store::{ArchiveStore, ObjectStoreConfig, Storage};
//!
//! # async fn example() -> Result<(), mixtape_object_store::StoreError> {
//! let store = Storage::new(ObjectStoreConfig::Memory).await?;
//! store.put("abc.mixblues", Bytes::from("PK"), "application/zip").await?;
//! assert!(store.exists("abc.mixblues").await?);
//! # Ok(())
//! # }
//! ```

mod archive_store;
mod error;
mod storage;

pub use archive_store::ArchiveStore;
pub use error::{Result, StoreError};
pub use storage::{r2_endpoint, ObjectStoreConfig, Storage, DEFAULT_REQUEST_TIMEOUT};
