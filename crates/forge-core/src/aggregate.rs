//! Fleet aggregation fold
//!
//! Aggregates are rebuilt from a full scan every time; nothing here is
//! maintained incrementally.

use forge_types::{AggregateStats, FleetAggregate, InventoryRecord};

/// Group ships by model key and total them
pub fn summarize<'a, I>(ships: I) -> FleetAggregate
where
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    let mut fleet = FleetAggregate::new();
    for ship in ships {
        fleet
            .entry(ship.model_key())
            .or_insert_with(AggregateStats::default)
            .record(ship);
    }
    fleet
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship(manufacturer: &str, name: &str, lti: bool, warbond: bool) -> InventoryRecord {
        InventoryRecord {
            ship_code: format!("{}_{}", manufacturer, name),
            name: name.to_string(),
            manufacturer_code: manufacturer.to_string(),
            manufacturer_name: manufacturer.to_string(),
            ship_name: name.to_string(),
            lti,
            warbond,
            entity_type: "ship".to_string(),
            pledge_id: "1".to_string(),
            pledge_name: "Package".to_string(),
            pledge_date: "January 01, 2020".to_string(),
            pledge_cost: "$45.00 USD".to_string(),
        }
    }

    #[test]
    fn test_two_owners_one_model() {
        // Owner A: two Avengers, one with LTI. Owner B: one warbond Avenger.
        let ships = vec![
            ship("Aegis", "Avenger", true, false),
            ship("Aegis", "Avenger", false, false),
            ship("Aegis", "Avenger", false, true),
            ship("RSI", "Aurora MR", false, false),
        ];

        let fleet = summarize(&ships);
        let avenger = &fleet["Aegis Avenger"];
        assert_eq!(avenger.count, 3);
        assert_eq!(avenger.lifetime_insured_count, 1);
        assert_eq!(avenger.warbond_count, 1);
        assert!(avenger.custom_names.is_empty());
        assert_eq!(fleet["RSI Aurora MR"].count, 1);
        assert_eq!(
            fleet.keys().collect::<Vec<_>>(),
            vec!["Aegis Avenger", "RSI Aurora MR"]
        );
    }

    #[test]
    fn test_empty_scan() {
        let none: Vec<InventoryRecord> = Vec::new();
        assert!(summarize(&none).is_empty());
    }
}
