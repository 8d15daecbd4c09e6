use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use object_store::ObjectStoreConfig;
use url::Url;

pub const DEFAULT_BUCKET_NAME: &str = "moodybeats-mixtapes";

/// Mixtape Gateway - upload and serve mixtape archives from R2/S3
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Port to listen on for HTTP requests
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Public base URL used to build retrieval links (defaults to http://localhost:<port>)
    #[arg(long, env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Where archives are stored
    #[arg(long, env = "STORAGE_BACKEND", value_enum, default_value_t = StorageBackend::R2)]
    pub storage_backend: StorageBackend,

    /// Cloudflare account id, used to derive the R2 endpoint
    #[arg(long, env = "R2_ACCOUNT_ID")]
    pub r2_account_id: Option<String>,

    /// Access key id for the bucket
    #[arg(long, env = "R2_ACCESS_KEY_ID", hide_env_values = true)]
    pub r2_access_key_id: Option<String>,

    /// Secret access key for the bucket
    #[arg(long, env = "R2_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub r2_secret_access_key: Option<String>,

    /// Bucket archives are written to
    #[arg(long, env = "R2_BUCKET_NAME", default_value = DEFAULT_BUCKET_NAME)]
    pub r2_bucket_name: String,

    /// S3-compatible endpoint overriding the one derived from the account id
    #[arg(long, env = "R2_ENDPOINT")]
    pub r2_endpoint: Option<String>,

    /// Directory used by the local storage backend
    #[arg(long, env = "STORAGE_PATH", default_value = "./mixtapes")]
    pub storage_path: PathBuf,

    /// Timeout in seconds for each object store request
    #[arg(long, env = "STORAGE_TIMEOUT_SECS", default_value = "30")]
    pub storage_timeout_secs: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Parsed log level, falling back to `INFO` on unknown names.
    pub fn log_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    /// Cloudflare R2 or another S3-compatible store
    R2,
    /// Process memory, lost on restart
    Memory,
    /// A local directory
    Local,
}

#[derive(Debug, Clone)]
pub struct Config {
    // Listen address
    pub listen_addr: SocketAddr,
    // Public base for retrieval links
    pub base_url: Url,
    // Archive storage backend
    pub store: ObjectStoreConfig,
    // log level for http tracing
    pub log_level: tracing::Level,
}

impl Config {
    /// Validate parsed arguments into a runnable configuration.
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let listen_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, args.port));

        let base_url = match &args.base_url {
            Some(base_url) => Url::parse(base_url)?,
            None => Url::parse(&format!("http://localhost:{}", args.port))?,
        };

        let log_level = args.log_level();

        let store = match args.storage_backend {
            StorageBackend::Memory => ObjectStoreConfig::Memory,
            StorageBackend::Local => ObjectStoreConfig::Local {
                path: args.storage_path,
            },
            StorageBackend::R2 => {
                let account_id = non_empty(args.r2_account_id);
                let endpoint = non_empty(args.r2_endpoint);
                let access_key = non_empty(args.r2_access_key_id);
                let secret_key = non_empty(args.r2_secret_access_key);

                let mut missing = Vec::new();
                if account_id.is_none() && endpoint.is_none() {
                    missing.push("R2_ACCOUNT_ID");
                }
                if access_key.is_none() {
                    missing.push("R2_ACCESS_KEY_ID");
                }
                if secret_key.is_none() {
                    missing.push("R2_SECRET_ACCESS_KEY");
                }

                match (access_key, secret_key) {
                    (Some(access_key), Some(secret_key)) if missing.is_empty() => {
                        ObjectStoreConfig::R2 {
                            account_id,
                            endpoint,
                            access_key,
                            secret_key,
                            bucket: args.r2_bucket_name,
                            timeout: Duration::from_secs(args.storage_timeout_secs),
                        }
                    }
                    _ => return Err(ConfigError::MissingStoreSettings(missing)),
                }
            }
        };

        Ok(Self {
            listen_addr,
            base_url,
            store,
            log_level,
        })
    }

    /// Bucket name, if the backend has one.
    pub fn bucket(&self) -> Option<&str> {
        match &self.store {
            ObjectStoreConfig::R2 { bucket, .. } => Some(bucket.as_str()),
            _ => None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required R2 configuration: {}", .0.join(", "))]
    MissingStoreSettings(Vec<&'static str>),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}
