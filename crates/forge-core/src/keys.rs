//! Cache key scheme and write invalidation policy

use forge_types::UserId;
use std::collections::BTreeSet;

pub const FLEET_AGGREGATE_KEY: &str = "fleet:aggregate";
pub const FLEET_MODELS_KEY: &str = "fleet:models";

pub fn profile_key(user_id: UserId) -> String {
    format!("system_info:{}", user_id)
}

pub fn inventory_key(owner_id: UserId) -> String {
    format!("hangar:{}", owner_id)
}

pub fn owners_key(model_key: &str) -> String {
    format!("fleet:owners:{}", model_key)
}

/// A committed write, described by what it may have changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteEvent {
    ProfileSaved(UserId),
    InventoryReplaced {
        owner_id: UserId,
        /// Models held before or after the swap
        models: BTreeSet<String>,
    },
}

impl WriteEvent {
    /// Every cache key whose content the write could have changed
    pub fn affected_keys(&self) -> Vec<String> {
        match self {
            WriteEvent::ProfileSaved(user_id) => vec![profile_key(*user_id)],
            WriteEvent::InventoryReplaced { owner_id, models } => {
                let mut keys = vec![
                    inventory_key(*owner_id),
                    FLEET_AGGREGATE_KEY.to_string(),
                    FLEET_MODELS_KEY.to_string(),
                ];
                keys.extend(models.iter().map(|model| owners_key(model)));
                keys
            }
        }
    }
}
