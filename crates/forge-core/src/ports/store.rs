//! Storage traits for persistence

use crate::Result;
use async_trait::async_trait;
use forge_types::{
    FleetAggregate, InventoryRecord, Peripherals, ProfileRecord, ShipOwner, SystemSpecs, UserId,
};
use std::collections::BTreeSet;

/// Profile store
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert or overwrite the required fields, merging supplied peripherals
    async fn upsert_profile(
        &self,
        user_id: UserId,
        specs: &SystemSpecs,
        peripherals: Option<&Peripherals>,
    ) -> Result<()>;

    /// Merge peripherals into an existing profile; `false` if there is none
    async fn update_peripherals(&self, user_id: UserId, peripherals: &Peripherals) -> Result<bool>;

    async fn get_profile(&self, user_id: UserId) -> Result<Option<ProfileRecord>>;
}

/// Inventory store, including the fleet-wide scans
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Atomically swap the owner's ships for `ships`.
    ///
    /// Returns the model keys the owner held before the swap.
    async fn replace_inventory(
        &self,
        owner_id: UserId,
        ships: &[InventoryRecord],
    ) -> Result<BTreeSet<String>>;

    async fn get_inventory(&self, owner_id: UserId) -> Result<Vec<InventoryRecord>>;
    async fn aggregate_fleet(&self) -> Result<FleetAggregate>;
    async fn list_distinct_models(&self) -> Result<BTreeSet<String>>;
    async fn find_owners(&self, model_key: &str) -> Result<Vec<ShipOwner>>;
}

/// Full record store as seen by the data access layer
#[async_trait]
pub trait RecordStore: ProfileStore + InventoryStore {
    async fn ping(&self) -> Result<()>;
    async fn close(&self);
}
