//! Hangar export parsing
//!
//! An upload is a JSON array of ships as produced by the hangar export
//! addon, pasted as text or attached as a file. The whole document is
//! validated before anything reaches the store.

use crate::error::{ForgeError, Result};
use forge_types::InventoryRecord;
use serde::Deserialize;
use tracing::debug;

/// One ship as it appears in the export
#[derive(Debug, Deserialize)]
struct ExportedShip {
    ship_code: String,
    name: String,
    manufacturer_code: String,
    manufacturer_name: String,
    lti: bool,
    warbond: bool,
    entity_type: String,
    pledge_id: String,
    pledge_name: String,
    pledge_date: String,
    pledge_cost: String,
    #[serde(default)]
    ship_name: Option<String>,
}

impl From<ExportedShip> for InventoryRecord {
    fn from(s: ExportedShip) -> Self {
        let ship_name = s
            .ship_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| s.name.clone());

        InventoryRecord {
            ship_code: s.ship_code,
            name: s.name,
            manufacturer_code: s.manufacturer_code,
            manufacturer_name: s.manufacturer_name,
            ship_name,
            lti: s.lti,
            warbond: s.warbond,
            entity_type: s.entity_type,
            pledge_id: s.pledge_id,
            pledge_name: s.pledge_name,
            pledge_date: s.pledge_date,
            pledge_cost: s.pledge_cost,
        }
    }
}

/// Parse a hangar export into inventory records, rejecting it whole on any defect
pub fn parse_hangar_export(document: &[u8]) -> Result<Vec<InventoryRecord>> {
    let items: Vec<serde_json::Value> = serde_json::from_slice(document)
        .map_err(|e| ForgeError::Validation(format!("hangar export is not a JSON array: {}", e)))?;

    let mut ships = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let exported: ExportedShip = serde_json::from_value(item)
            .map_err(|e| ForgeError::Validation(format!("ship #{}: {}", index + 1, e)))?;
        let ship = InventoryRecord::from(exported);

        let blank = ship.blank_fields();
        if !blank.is_empty() {
            return Err(ForgeError::Validation(format!(
                "ship #{}: blank {}",
                index + 1,
                blank.join(", ")
            )));
        }
        ships.push(ship);
    }

    debug!("Parsed hangar export with {} ships", ships.len());
    Ok(ships)
}
