use std::sync::Arc;

use object_store::{ArchiveStore, ObjectStoreConfig, Storage, StoreError};
use url::Url;

use crate::archive::ArchiveId;

/// Shared, read-only state handed to every request handler.
#[derive(Clone)]
pub struct GatewayState {
    store: Arc<dyn ArchiveStore>,
    base_url: Url,
}

impl GatewayState {
    pub fn new(store: Arc<dyn ArchiveStore>, base_url: Url) -> Self {
        Self { store, base_url }
    }

    /// Connect the configured object store backend.
    pub async fn from_config(
        store_config: ObjectStoreConfig,
        base_url: Url,
    ) -> Result<Self, StoreError> {
        let store = Storage::new(store_config).await?;
        Ok(Self::new(Arc::new(store), base_url))
    }

    pub fn store(&self) -> &dyn ArchiveStore {
        self.store.as_ref()
    }

    /// Public link an archive can be downloaded from.
    pub fn retrieval_url(&self, id: &ArchiveId) -> String {
        format!(
            "{}/t/{}",
            self.base_url.as_str().trim_end_matches('/'),
            id
        )
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("backend", &self.store.backend())
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}
