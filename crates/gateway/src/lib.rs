//! Mixtape Gateway - upload mixtape archives and serve them back by id
//!
//! Archives are stored in an S3-compatible object store under a random,
//! URL-safe identifier. The gateway owns identifier generation, storage key
//! naming and request validation; persistence is delegated to an
//! [`object_store::ArchiveStore`].

pub mod archive;
pub mod config;
pub mod http_server;
pub mod state;

pub use archive::ArchiveId;
pub use config::{Args, Config, ConfigError};
pub use state::GatewayState;
