//! Dashboard strategy configuration
//!
//! Mirrors the options object the host stores for the generated dashboard:
//! global toggles, area visibility and ordering, and per-area per-group
//! hidden/order lists.

use std::collections::HashSet;
use std::path::Path;

use ha_core::EntityId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigResult};

/// Area visibility and ordering on the overview
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreasDisplay {
    /// Area IDs left off the dashboard
    #[serde(default)]
    pub hidden: Vec<String>,

    /// Area IDs in display order; unlisted areas follow alphabetically
    #[serde(default)]
    pub order: Vec<String>,
}

impl AreasDisplay {
    pub fn is_hidden(&self, area_id: &str) -> bool {
        self.hidden.iter().any(|id| id == area_id)
    }

    /// Position of `area_id` in the configured order
    pub fn position(&self, area_id: &str) -> Option<usize> {
        self.order.iter().position(|id| id == area_id)
    }
}

/// Hidden entities and explicit order for one group of one area
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOptions {
    #[serde(default)]
    pub hidden: Vec<String>,

    #[serde(default)]
    pub order: Vec<String>,
}

impl GroupOptions {
    pub fn is_hidden(&self, entity_id: &str) -> bool {
        self.hidden.iter().any(|id| id == entity_id)
    }

    /// True when an explicit order overrides last-change ordering
    pub fn has_order(&self) -> bool {
        !self.order.is_empty()
    }
}

/// Options for a single area
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaOptions {
    /// Keyed by group name (`lights`, `covers`, `covers_curtain`, ...)
    #[serde(default)]
    pub groups_options: IndexMap<String, GroupOptions>,
}

impl AreaOptions {
    pub fn group(&self, group: &str) -> Option<&GroupOptions> {
        self.groups_options.get(group)
    }
}

/// Top-level dashboard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Dashboard title
    #[serde(default = "default_title")]
    pub title: String,

    /// Show the weather forecast card on the overview
    #[serde(default = "default_true")]
    pub show_weather: bool,

    /// Show the energy distribution card on the overview
    #[serde(default = "default_true")]
    pub show_energy: bool,

    /// Show a search card above the summary tiles
    #[serde(default)]
    pub show_search_card: bool,

    /// List the lights/covers/security/batteries views in the top bar
    #[serde(default)]
    pub show_summary_views: bool,

    /// List the room views in the top bar
    #[serde(default)]
    pub show_room_views: bool,

    /// Group area tiles by floor on the overview
    #[serde(default)]
    pub group_by_floors: bool,

    #[serde(default)]
    pub areas_display: AreasDisplay,

    /// Keyed by area ID
    #[serde(default)]
    pub areas_options: IndexMap<String, AreaOptions>,

    /// Entities pinned to the room view of the area they belong to
    #[serde(default)]
    pub room_pin_entities: Vec<String>,
}

fn default_title() -> String {
    "Home".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            show_weather: true,
            show_energy: true,
            show_search_card: false,
            show_summary_views: false,
            show_room_views: false,
            group_by_floors: false,
            areas_display: AreasDisplay::default(),
            areas_options: IndexMap::new(),
            room_pin_entities: Vec::new(),
        }
    }
}

impl DashboardConfig {
    /// Parse and sanitize YAML text without include processing
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let mut config: Self = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseYaml {
            path: Path::new("<inline>").to_path_buf(),
            source: e,
        })?;
        config.sanitize();
        Ok(config)
    }

    /// Parse and sanitize the options object as the host hands it over
    pub fn from_json_value(value: &serde_json::Value) -> ConfigResult<Self> {
        let mut config: Self =
            serde_json::from_value(value.clone()).map_err(|e| ConfigError::ParseJson {
                context: "dashboard config",
                source: e,
            })?;
        config.sanitize();
        Ok(config)
    }

    /// Drop malformed references and keep the rest
    ///
    /// Entity lists keep only well-formed entity IDs and area lists drop
    /// blank IDs, each with a warning. Returns how many entries were dropped.
    pub fn sanitize(&mut self) -> usize {
        let mut dropped = retain_entity_ids(&mut self.room_pin_entities, "room_pin_entities");

        for (area_id, area) in &mut self.areas_options {
            for (group, options) in &mut area.groups_options {
                let key = format!("areas_options.{area_id}.groups_options.{group}");
                dropped += retain_entity_ids(&mut options.hidden, &format!("{key}.hidden"));
                dropped += retain_entity_ids(&mut options.order, &format!("{key}.order"));
            }
        }

        let display = &mut self.areas_display;
        for (key, ids) in [
            ("areas_display.hidden", &mut display.hidden),
            ("areas_display.order", &mut display.order),
        ] {
            let before = ids.len();
            ids.retain(|id| !id.trim().is_empty());
            if ids.len() < before {
                warn!(key, count = before - ids.len(), "Dropping blank area IDs");
                dropped += before - ids.len();
            }
        }

        debug!(
            areas_options = self.areas_options.len(),
            room_pins = self.room_pin_entities.len(),
            dropped,
            "Sanitized dashboard config"
        );
        dropped
    }

    pub fn area_options(&self, area_id: &str) -> Option<&AreaOptions> {
        self.areas_options.get(area_id)
    }

    /// Options for `group` within `area_id`
    pub fn group_options(&self, area_id: &str, group: &str) -> Option<&GroupOptions> {
        self.area_options(area_id)?.group(group)
    }

    /// Union of the hidden lists of `groups` across every area
    ///
    /// Views that span areas (lights, covers, security) hide an entity when
    /// any area hides it in one of the groups the view draws from.
    pub fn hidden_for_groups<'a>(
        &self,
        groups: impl IntoIterator<Item = &'a str>,
    ) -> HashSet<String> {
        let groups: Vec<&str> = groups.into_iter().collect();
        self.areas_options
            .values()
            .flat_map(|area| groups.iter().filter_map(|group| area.group(group)))
            .flat_map(|options| options.hidden.iter().cloned())
            .collect()
    }

    /// Union of every hidden list of every group and area
    pub fn hidden_in_any_group(&self) -> HashSet<String> {
        self.areas_options
            .values()
            .flat_map(|area| area.groups_options.values())
            .flat_map(|options| options.hidden.iter().cloned())
            .collect()
    }
}

fn retain_entity_ids(ids: &mut Vec<String>, key: &str) -> usize {
    let before = ids.len();
    ids.retain(|entity_id| match entity_id.parse::<EntityId>() {
        Ok(_) => true,
        Err(e) => {
            warn!(key, entity_id = %entity_id, error = %e, "Dropping malformed entity reference");
            false
        }
    });
    before - ids.len()
}
