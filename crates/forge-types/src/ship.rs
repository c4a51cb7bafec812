//! Hangar inventory types

use crate::UserId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Date formats accepted when ordering pledges chronologically
const PLEDGE_DATE_FORMATS: &[&str] = &["%B %d, %Y", "%b %d, %Y", "%Y-%m-%d"];

/// One owned ship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub ship_code: String,
    pub name: String,
    pub manufacturer_code: String,
    pub manufacturer_name: String,
    /// Custom name, the model display name when none was assigned
    pub ship_name: String,
    pub lti: bool,
    pub warbond: bool,
    pub entity_type: String,
    pub pledge_id: String,
    pub pledge_name: String,
    pub pledge_date: String,
    pub pledge_cost: String,
}

impl InventoryRecord {
    /// Fleet-wide model key: manufacturer name, a space, model name
    pub fn model_key(&self) -> String {
        model_key(&self.manufacturer_name, &self.name)
    }

    /// Whether the ship carries a name other than its model name
    pub fn has_custom_name(&self) -> bool {
        let custom = self.ship_name.trim();
        !custom.is_empty() && custom != self.name
    }

    /// Names of required fields that are blank
    pub fn blank_fields(&self) -> Vec<&'static str> {
        [
            ("ship_code", &self.ship_code),
            ("name", &self.name),
            ("manufacturer_name", &self.manufacturer_name),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Store order: manufacturer name, then model name
    pub fn display_order(a: &Self, b: &Self) -> Ordering {
        a.manufacturer_name
            .cmp(&b.manufacturer_name)
            .then_with(|| a.name.cmp(&b.name))
    }
}

pub fn model_key(manufacturer_name: &str, name: &str) -> String {
    format!("{} {}", manufacturer_name, name)
}

/// A ship together with the member owning it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipOwner {
    pub owner_id: UserId,
    pub ship: InventoryRecord,
}

/// Parse a pledge date in any of the formats the hangar export produces
pub fn parse_pledge_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    PLEDGE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Chronological pledge order; unparseable dates go last, compared as text
pub fn compare_pledge_dates(a: &str, b: &str) -> Ordering {
    match (parse_pledge_date(a), parse_pledge_date(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship(manufacturer: &str, name: &str) -> InventoryRecord {
        InventoryRecord {
            ship_code: format!("{}_{}", manufacturer, name),
            name: name.to_string(),
            manufacturer_code: manufacturer.to_uppercase(),
            manufacturer_name: manufacturer.to_string(),
            ship_name: name.to_string(),
            lti: false,
            warbond: false,
            entity_type: "ship".to_string(),
            pledge_id: "1".to_string(),
            pledge_name: "Standalone Ships".to_string(),
            pledge_date: "November 23, 2019".to_string(),
            pledge_cost: "$60.00 USD".to_string(),
        }
    }

    #[test]
    fn test_model_key() {
        assert_eq!(ship("Aegis", "Avenger").model_key(), "Aegis Avenger");
    }

    #[test]
    fn test_custom_name() {
        let mut s = ship("Aegis", "Avenger");
        assert!(!s.has_custom_name());
        s.ship_name = "Night Owl".to_string();
        assert!(s.has_custom_name());
        s.ship_name = "  ".to_string();
        assert!(!s.has_custom_name());
    }

    #[test]
    fn test_blank_fields() {
        let mut s = ship("Aegis", "Avenger");
        assert!(s.blank_fields().is_empty());
        s.ship_code = String::new();
        assert_eq!(s.blank_fields(), vec!["ship_code"]);
    }

    #[test]
    fn test_pledge_date_order() {
        assert_eq!(
            parse_pledge_date("November 23, 2019"),
            NaiveDate::from_ymd_opt(2019, 11, 23)
        );
        assert_eq!(
            parse_pledge_date("2021-02-01"),
            NaiveDate::from_ymd_opt(2021, 2, 1)
        );
        assert_eq!(
            compare_pledge_dates("December 01, 2018", "January 05, 2019"),
            Ordering::Less
        );
        assert_eq!(
            parse_pledge_date("May 1, 2020"),
            NaiveDate::from_ymd_opt(2020, 5, 1)
        );
        // Text order alone would put "Awaiting" first
        assert_eq!(
            compare_pledge_dates("Awaiting", "May 1, 2020"),
            Ordering::Greater
        );
        assert_eq!(compare_pledge_dates("a", "b"), Ordering::Less);
    }
}
