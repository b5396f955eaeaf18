use ha_core::domains::{self, services};
use ha_core::BatchCommand;
use ha_dashboard_config::{ConfigResult, LightGroupType, LightsGroupCardConfig};
use ha_registries::Snapshot;
use serde_json::Value;
use tracing::debug;

use crate::binding::Surface;
use crate::cards::GroupCardContent;
use crate::classifier::{classify, LIGHTS};
use crate::filter::{select, SortOrder, StatePredicate};
use crate::fingerprint::KeyStrategy;
use crate::group::GroupName;
use crate::layout::lovelace::{EntityBadge, Feature, HeadingCard, StateContent, TileCard};
use crate::naming::display_name;
use crate::visibility::VisibilityPolicy;

/// Lights that are on, or lights that are off
///
/// Re-renders only when the membership or order of its list changes;
/// brightness changes alone never do.
#[derive(Debug, Clone)]
pub struct LightsGroupCard {
    config: LightsGroupCardConfig,
    policy: VisibilityPolicy,
}

impl LightsGroupCard {
    pub fn new(config: LightsGroupCardConfig) -> Self {
        Self {
            config,
            policy: VisibilityPolicy::default(),
        }
    }

    /// Build from a raw card config; fails without `group_type`
    pub fn from_value(value: &Value) -> ConfigResult<Self> {
        LightsGroupCardConfig::from_value(value).map(Self::new)
    }

    pub fn group_type(&self) -> LightGroupType {
        self.config.group_type
    }

    fn predicate(&self) -> StatePredicate {
        match self.config.group_type {
            LightGroupType::On => StatePredicate::ON,
            LightGroupType::Off => StatePredicate::OFF,
        }
    }

    /// Switch every listed light to the other state
    pub fn batch_command(&self, lights: &[String]) -> Option<BatchCommand> {
        let service = match self.config.group_type {
            LightGroupType::On => services::TURN_OFF,
            LightGroupType::Off => services::TURN_ON,
        };
        BatchCommand::new(domains::LIGHT, service, lights.to_vec()).ok()
    }

    /// Content for `lights`; `None` hides the card
    pub fn render(&self, lights: &[String], snapshot: &Snapshot) -> Option<GroupCardContent> {
        if lights.is_empty() {
            return None;
        }

        let (title, icon, batch_icon) = match self.config.group_type {
            LightGroupType::On => ("Lights on", "mdi:lightbulb-on", "mdi:lightbulb-off"),
            LightGroupType::Off => ("Lights off", "mdi:lightbulb-off", "mdi:lightbulb-on"),
        };
        let mut heading = match self.config.group_type {
            LightGroupType::On => HeadingCard::title(format!("{title} ({})", lights.len())),
            LightGroupType::Off => HeadingCard::subtitle(format!("{title} ({})", lights.len())),
        }
        .icon(icon);
        if let Some(badge) = self
            .batch_command(lights)
            .and_then(|command| EntityBadge::batch(command, batch_icon))
        {
            heading = heading.badge(badge);
        }

        let tiles = lights
            .iter()
            .map(|entity_id| {
                TileCard::new(entity_id.as_str())
                    .name(display_name(entity_id, snapshot))
                    .horizontal()
                    .inline_feature(Feature::LightBrightness)
                    .state_content(StateContent::last_changed())
            })
            .collect();

        Some(GroupCardContent { heading, tiles })
    }
}

impl Surface for LightsGroupCard {
    fn name(&self) -> &str {
        match self.config.group_type {
            LightGroupType::On => "lights_on",
            LightGroupType::Off => "lights_off",
        }
    }

    fn key_strategy(&self) -> KeyStrategy {
        KeyStrategy::Membership
    }

    fn refresh(&mut self, snapshot: &Snapshot) {
        self.policy = VisibilityPolicy::for_groups(snapshot, &self.config.config, &[GroupName::Lights]);
        debug!(group_type = ?self.config.group_type, "Refreshed lights group card");
    }

    fn display_list(&self, snapshot: &Snapshot) -> Vec<String> {
        let lights = classify(&LIGHTS, snapshot.entity_ids(), snapshot, &self.policy)
            .take(GroupName::Lights);
        select(&lights, snapshot, self.predicate(), SortOrder::LastChanged)
    }
}
