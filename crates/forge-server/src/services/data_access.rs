//! Data access facade
//!
//! The single entry point for front ends. Reads go through the cache,
//! writes go to the store first and then drop whatever cache entries they
//! may have changed. A write that committed is reported as a success even
//! if the cache could not be cleared.

use super::cache_aside::CacheAside;
use super::fleet::FleetService;
use crate::storage::Backends;
use forge_core::keys::{inventory_key, profile_key};
use forge_core::ports::{CacheStore, InventoryStore, ProfileStore, RecordStore};
use forge_core::upload::parse_hangar_export;
use forge_core::{
    model_key, FleetAggregate, ForgeError, InventoryRecord, InventorySummary, Peripherals,
    ProfileRecord, Result, ShipOwner, SystemSpecs, UserId, WriteEvent,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct DataAccess {
    store: Arc<dyn RecordStore>,
    cache: CacheAside,
    fleet: FleetService,
}

impl DataAccess {
    pub fn new(store: Arc<dyn RecordStore>, cache: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        let cache = CacheAside::new(cache, ttl);
        let fleet = FleetService::new(store.clone(), cache.clone());
        Self {
            store,
            cache,
            fleet,
        }
    }

    pub fn from_backends(backends: &Backends, ttl: Duration) -> Self {
        Self::new(backends.store.clone(), backends.cache.clone(), ttl)
    }

    pub async fn get_profile(&self, user_id: UserId) -> Result<Option<ProfileRecord>> {
        self.cache
            .cached(&profile_key(user_id), || self.store.get_profile(user_id))
            .await
    }

    /// Save required specs, merging any peripherals supplied alongside
    pub async fn save_profile(
        &self,
        user_id: UserId,
        specs: &SystemSpecs,
        peripherals: Option<&Peripherals>,
    ) -> Result<()> {
        let blank = specs.blank_fields();
        if !blank.is_empty() {
            return Err(ForgeError::Validation(format!(
                "required fields are blank: {}",
                blank.join(", ")
            )));
        }

        self.store.upsert_profile(user_id, specs, peripherals).await?;
        info!("Saved system profile for {}", user_id);

        self.cache.invalidate(&WriteEvent::ProfileSaved(user_id)).await;
        Ok(())
    }

    /// Merge peripherals into an existing profile; `false` if the member has none yet
    pub async fn save_peripherals(&self, user_id: UserId, peripherals: &Peripherals) -> Result<bool> {
        let updated = self.store.update_peripherals(user_id, peripherals).await?;
        if updated {
            info!("Updated peripherals for {}", user_id);
            self.cache.invalidate(&WriteEvent::ProfileSaved(user_id)).await;
        }
        Ok(updated)
    }

    pub async fn get_inventory(&self, owner_id: UserId) -> Result<Vec<InventoryRecord>> {
        self.cache
            .cached(&inventory_key(owner_id), || self.store.get_inventory(owner_id))
            .await
    }

    /// Ship counts per model, derived from the cached inventory
    pub async fn get_inventory_summary(&self, owner_id: UserId) -> Result<InventorySummary> {
        let ships = self.get_inventory(owner_id).await?;
        Ok(InventorySummary::from_ships(&ships))
    }

    /// Replace the owner's hangar with the contents of an export document.
    ///
    /// Returns the number of ships stored.
    pub async fn save_inventory(&self, owner_id: UserId, document: impl AsRef<[u8]>) -> Result<usize> {
        let ships = parse_hangar_export(document.as_ref())?;

        let mut models: BTreeSet<String> = self.store.replace_inventory(owner_id, &ships).await?;
        info!("Saved hangar for {} ({} ships)", owner_id, ships.len());

        models.extend(ships.iter().map(InventoryRecord::model_key));
        self.cache
            .invalidate(&WriteEvent::InventoryReplaced { owner_id, models })
            .await;

        Ok(ships.len())
    }

    pub async fn get_fleet_aggregate(&self) -> Result<FleetAggregate> {
        self.fleet.aggregate().await
    }

    pub async fn get_distinct_models(&self) -> Result<BTreeSet<String>> {
        self.fleet.models().await
    }

    pub async fn get_owners(&self, model_key: &str) -> Result<Vec<ShipOwner>> {
        self.fleet.owners(model_key).await
    }

    /// Owners looked up by manufacturer and model name separately
    pub async fn get_owners_of(&self, manufacturer_name: &str, name: &str) -> Result<Vec<ShipOwner>> {
        self.get_owners(&model_key(manufacturer_name, name)).await
    }

    /// Connectivity of the store; the cache is reported separately since it is optional
    pub async fn health(&self) -> (Result<()>, bool) {
        (self.store.ping().await, self.cache.ping().await)
    }
}
