//! Device registry entries

use serde::{Deserialize, Serialize};

/// A registered device
///
/// Entities without their own `area_id` inherit the device's area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEntry {
    /// Device ID
    pub id: String,

    /// Area the device is placed in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_id: Option<String>,

    /// Manufacturer name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    /// Model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Device name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DeviceEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            area_id: None,
            manufacturer: None,
            model: None,
            name: None,
        }
    }

    pub fn with_area(mut self, area_id: impl Into<String>) -> Self {
        self.area_id = Some(area_id.into());
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Case-insensitive substring match on manufacturer or model
    pub fn is_made_by(&self, vendor: &str) -> bool {
        let vendor = vendor.to_lowercase();
        [&self.manufacturer, &self.model]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&vendor))
    }
}
