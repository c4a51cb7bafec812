//! Fleet-wide aggregate types

use crate::ship::InventoryRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Totals for one model across every hangar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub count: u64,
    pub lifetime_insured_count: u64,
    pub warbond_count: u64,
    /// Distinct custom names, sorted
    pub custom_names: BTreeSet<String>,
}

impl AggregateStats {
    /// Fold one ship into the totals
    pub fn record(&mut self, ship: &InventoryRecord) {
        self.count += 1;
        if ship.lti {
            self.lifetime_insured_count += 1;
        }
        if ship.warbond {
            self.warbond_count += 1;
        }
        if ship.has_custom_name() {
            self.custom_names.insert(ship.ship_name.trim().to_string());
        }
    }

    /// Custom names joined for display
    pub fn custom_names_display(&self) -> String {
        self.custom_names
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Model key -> totals, ordered by model key
pub type FleetAggregate = BTreeMap<String, AggregateStats>;

/// Per-member ship counts by model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub models: BTreeMap<String, u64>,
    pub total: u64,
}

impl InventorySummary {
    pub fn from_ships(ships: &[InventoryRecord]) -> Self {
        let mut summary = Self::default();
        for ship in ships {
            *summary.models.entry(ship.model_key()).or_insert(0) += 1;
            summary.total += 1;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avenger(lti: bool, warbond: bool, ship_name: &str) -> InventoryRecord {
        InventoryRecord {
            ship_code: "AEGS_Avenger".to_string(),
            name: "Avenger".to_string(),
            manufacturer_code: "AEGS".to_string(),
            manufacturer_name: "Aegis".to_string(),
            ship_name: ship_name.to_string(),
            lti,
            warbond,
            entity_type: "ship".to_string(),
            pledge_id: "7".to_string(),
            pledge_name: "Avenger Starter".to_string(),
            pledge_date: "May 01, 2020".to_string(),
            pledge_cost: "$50.00 USD".to_string(),
        }
    }

    #[test]
    fn test_record_counts_flags_and_names() {
        let mut stats = AggregateStats::default();
        stats.record(&avenger(true, false, "Avenger"));
        stats.record(&avenger(false, true, "Zulu"));
        stats.record(&avenger(false, false, "Alpha"));
        stats.record(&avenger(false, false, "Zulu"));

        assert_eq!(stats.count, 4);
        assert_eq!(stats.lifetime_insured_count, 1);
        assert_eq!(stats.warbond_count, 1);
        assert_eq!(stats.custom_names_display(), "Alpha, Zulu");
    }

    #[test]
    fn test_summary_counts_models() {
        let mut titan = avenger(false, false, "Titan");
        titan.name = "Avenger Titan".to_string();
        let ships = vec![avenger(false, false, "Avenger"), titan, avenger(true, false, "x")];

        let summary = InventorySummary::from_ships(&ships);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.models["Aegis Avenger"], 2);
        assert_eq!(summary.models["Aegis Avenger Titan"], 1);
    }
}
