//! Fleet aggregation service
//!
//! Each cache miss rescans the whole hangar table. Every upload drops these
//! entries.

use super::cache_aside::CacheAside;
use forge_core::keys::{owners_key, FLEET_AGGREGATE_KEY, FLEET_MODELS_KEY};
use forge_core::ports::{InventoryStore, RecordStore};
use forge_core::{FleetAggregate, Result, ShipOwner};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Clone)]
pub struct FleetService {
    store: Arc<dyn RecordStore>,
    cache: CacheAside,
}

impl FleetService {
    pub fn new(store: Arc<dyn RecordStore>, cache: CacheAside) -> Self {
        Self { store, cache }
    }

    /// Totals per model across every hangar
    pub async fn aggregate(&self) -> Result<FleetAggregate> {
        self.cache
            .cached(FLEET_AGGREGATE_KEY, || self.store.aggregate_fleet())
            .await
    }

    /// Every model key present in at least one hangar
    pub async fn models(&self) -> Result<BTreeSet<String>> {
        self.cache
            .cached(FLEET_MODELS_KEY, || self.store.list_distinct_models())
            .await
    }

    /// Owners of a model, earliest pledge first
    pub async fn owners(&self, model_key: &str) -> Result<Vec<ShipOwner>> {
        self.cache
            .cached(&owners_key(model_key), || self.store.find_owners(model_key))
            .await
    }
}
