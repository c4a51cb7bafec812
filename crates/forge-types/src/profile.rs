//! System profile types

use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Required hardware fields of a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSpecs {
    pub os: String,
    pub cpu: String,
    pub gpu: String,
    pub memory: String,
    pub storage: String,
}

impl SystemSpecs {
    /// Names of required fields that are blank
    pub fn blank_fields(&self) -> Vec<&'static str> {
        [
            ("os", &self.os),
            ("cpu", &self.cpu),
            ("gpu", &self.gpu),
            ("memory", &self.memory),
            ("storage", &self.storage),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Optional input/output devices.
///
/// `None` leaves the stored value untouched, a blank string clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peripherals {
    #[serde(default)]
    pub keyboard: Option<String>,
    #[serde(default)]
    pub mouse: Option<String>,
    #[serde(default)]
    pub other_controllers: Option<String>,
    #[serde(default)]
    pub audio_config: Option<String>,
}

impl Peripherals {
    pub fn is_empty(&self) -> bool {
        self.keyboard.is_none()
            && self.mouse.is_none()
            && self.other_controllers.is_none()
            && self.audio_config.is_none()
    }
}

/// A member's stored system profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub user_id: UserId,
    #[serde(flatten)]
    pub specs: SystemSpecs,
    pub keyboard: Option<String>,
    pub mouse: Option<String>,
    pub other_controllers: Option<String>,
    pub audio_config: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    /// Whether any peripheral field is set
    pub fn has_peripherals(&self) -> bool {
        self.keyboard.is_some()
            || self.mouse.is_some()
            || self.other_controllers.is_some()
            || self.audio_config.is_some()
    }
}
