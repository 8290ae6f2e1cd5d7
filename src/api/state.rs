//! Shared API state.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::fetch::{DataProvider, ProviderError};
use crate::models::CourseCatalog;
use crate::store::{EventKey, RecordStore};

/// Shared state: the dataset provider and one immutable record store per
/// loaded event. Stores are built on first access and reused; they are never
/// mutated, so switching events simply means resolving a different key.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn DataProvider>,
    pub catalog: Arc<CourseCatalog>,
    stores: Arc<RwLock<HashMap<EventKey, Arc<RecordStore>>>>,
}

impl AppState {
    pub fn new(provider: Arc<dyn DataProvider>, catalog: CourseCatalog) -> Self {
        Self {
            provider,
            catalog: Arc::new(catalog),
            stores: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The record store for an event, loading it on first access.
    pub async fn store_for(&self, key: EventKey) -> Result<Arc<RecordStore>, ProviderError> {
        if let Some(store) = self.stores.read().await.get(&key) {
            return Ok(store.clone());
        }

        debug!(event = %key, "loading record store");
        let store = Arc::new(RecordStore::load(self.provider.as_ref(), &self.catalog, key.clone()).await?);

        let mut stores = self.stores.write().await;
        let entry = stores.entry(key).or_insert(store);
        Ok(entry.clone())
    }
}
