//! Entity registry entries
//!
//! The subset of the host's entity registry the dashboard needs to decide
//! visibility: placement (area, device), labels and the hide/disable flags.

use std::collections::HashSet;
use std::fmt;

use ha_core::EntityId;
use serde::{Deserialize, Serialize};

/// Reason an entity was disabled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DisabledBy {
    ConfigEntry,
    Device,
    Hass,
    Integration,
    User,
    /// A reason this version does not know; still counts as disabled
    Other(String),
}

impl From<String> for DisabledBy {
    fn from(value: String) -> Self {
        match value.as_str() {
            "config_entry" => Self::ConfigEntry,
            "device" => Self::Device,
            "hass" => Self::Hass,
            "integration" => Self::Integration,
            "user" => Self::User,
            _ => Self::Other(value),
        }
    }
}

impl From<DisabledBy> for String {
    fn from(value: DisabledBy) -> Self {
        match value {
            DisabledBy::ConfigEntry => "config_entry".into(),
            DisabledBy::Device => "device".into(),
            DisabledBy::Hass => "hass".into(),
            DisabledBy::Integration => "integration".into(),
            DisabledBy::User => "user".into(),
            DisabledBy::Other(other) => other,
        }
    }
}

/// Reason an entity was hidden automatically or by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HiddenBy {
    Integration,
    User,
    Other(String),
}

impl From<String> for HiddenBy {
    fn from(value: String) -> Self {
        match value.as_str() {
            "integration" => Self::Integration,
            "user" => Self::User,
            _ => Self::Other(value),
        }
    }
}

impl From<HiddenBy> for String {
    fn from(value: HiddenBy) -> Self {
        match value {
            HiddenBy::Integration => "integration".into(),
            HiddenBy::User => "user".into(),
            HiddenBy::Other(other) => other,
        }
    }
}

/// Entity category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityCategory {
    /// Configuration entity
    Config,
    /// Diagnostic entity
    Diagnostic,
    Other(String),
}

impl EntityCategory {
    /// Config and diagnostic entities are not shown on dashboards
    pub fn is_auxiliary(&self) -> bool {
        matches!(self, Self::Config | Self::Diagnostic)
    }

    /// Same test for a raw category string as found in state attributes
    pub fn is_auxiliary_str(value: &str) -> bool {
        value == "config" || value == "diagnostic"
    }
}

impl From<String> for EntityCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "config" => Self::Config,
            "diagnostic" => Self::Diagnostic,
            _ => Self::Other(value),
        }
    }
}

impl From<EntityCategory> for String {
    fn from(value: EntityCategory) -> Self {
        match value {
            EntityCategory::Config => "config".into(),
            EntityCategory::Diagnostic => "diagnostic".into(),
            EntityCategory::Other(other) => other,
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from(self.clone()))
    }
}

/// A registered entity as seen by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityEntry {
    /// Full entity ID (domain.object_id)
    pub entity_id: EntityId,

    /// Directly assigned area; takes precedence over the device's area
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_id: Option<String>,

    /// Parent device ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    /// Label IDs
    #[serde(default, skip_serializing_if = "HashSet::is_empty")]
    pub labels: HashSet<String>,

    /// Explicit "visible = false" set from the UI
    #[serde(default)]
    pub hidden: bool,

    /// Hidden reason (automatic, usually integration-driven)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_by: Option<HiddenBy>,

    /// Disable reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_by: Option<DisabledBy>,

    /// Entity category (config, diagnostic, or none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_category: Option<EntityCategory>,

    /// User-set name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Integration that provides this entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl EntityEntry {
    /// Create an entry with no placement and no flags
    pub fn new(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            area_id: None,
            device_id: None,
            labels: HashSet::new(),
            hidden: false,
            hidden_by: None,
            disabled_by: None,
            entity_category: None,
            name: None,
            platform: None,
        }
    }

    pub fn with_area(mut self, area_id: impl Into<String>) -> Self {
        self.area_id = Some(area_id.into());
        self
    }

    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_hidden_by(mut self, hidden_by: HiddenBy) -> Self {
        self.hidden_by = Some(hidden_by);
        self
    }

    pub fn with_disabled_by(mut self, disabled_by: DisabledBy) -> Self {
        self.disabled_by = Some(disabled_by);
        self
    }

    pub fn with_category(mut self, category: EntityCategory) -> Self {
        self.entity_category = Some(category);
        self
    }

    /// Get the domain from entity_id
    pub fn domain(&self) -> &str {
        self.entity_id.domain()
    }

    /// Check if entity is disabled
    pub fn is_disabled(&self) -> bool {
        self.disabled_by.is_some()
    }

    /// Check if entity was hidden automatically
    pub fn is_hidden_by(&self) -> bool {
        self.hidden_by.is_some()
    }

    /// Check whether the entity carries `label`
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// Config or diagnostic category
    pub fn is_auxiliary(&self) -> bool {
        self.entity_category
            .as_ref()
            .is_some_and(EntityCategory::is_auxiliary)
    }
}
