//! Area registry entries

use serde::{Deserialize, Serialize};

/// A registered area (room, zone)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaEntry {
    /// Area ID
    #[serde(alias = "id")]
    pub area_id: String,

    /// Area name (e.g., "Living Room")
    pub name: String,

    /// Area icon (e.g., "mdi:sofa")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Floor this area belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_id: Option<String>,

    /// Preferred temperature sensor for the area badge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_entity_id: Option<String>,

    /// Preferred humidity sensor for the area badge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_entity_id: Option<String>,
}

impl AreaEntry {
    pub fn new(area_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            area_id: area_id.into(),
            name: name.into(),
            icon: None,
            floor_id: None,
            temperature_entity_id: None,
            humidity_entity_id: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_temperature_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.temperature_entity_id = Some(entity_id.into());
        self
    }

    pub fn with_humidity_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.humidity_entity_id = Some(entity_id.into());
        self
    }
}
