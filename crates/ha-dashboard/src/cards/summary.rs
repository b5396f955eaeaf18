use ha_core::{domain_of, domains, State, STATE_ON, STATE_OPEN, STATE_UNLOCKED};
use ha_dashboard_config::{ConfigResult, DashboardConfig, SummaryCardConfig, SummaryType};
use ha_registries::Snapshot;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::binding::Surface;
use crate::classifier::{classify, BATTERY, COVERS, LIGHTS, SECURITY, SECURITY_GROUPS};
use crate::filter::{select, SortOrder, StatePredicate};
use crate::fingerprint::KeyStrategy;
use crate::group::GroupName;
use crate::visibility::VisibilityPolicy;

/// Battery level below which a battery counts as critical
pub const CRITICAL_BATTERY: f64 = 20.0;

/// What a summary tile looks like for a given count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryDisplay {
    pub icon: &'static str,
    pub label: String,
    pub color: &'static str,
    /// View the tile navigates to
    pub path: &'static str,
}

/// Counts what needs attention in one category
///
/// Keys on the count alone: the tile re-renders when the number changes,
/// not when the counted entities swap places.
#[derive(Debug, Clone)]
pub struct SummaryCard {
    config: SummaryCardConfig,
    policy: VisibilityPolicy,
}

impl SummaryCard {
    pub fn new(config: SummaryCardConfig) -> Self {
        Self {
            config,
            policy: VisibilityPolicy::default(),
        }
    }

    /// Build from a raw card config; fails without `summary_type`
    pub fn from_value(value: &Value) -> ConfigResult<Self> {
        SummaryCardConfig::from_value(value).map(Self::new)
    }

    pub fn summary_type(&self) -> SummaryType {
        self.config.summary_type
    }

    /// Groups whose config hidden lists apply to a summary type
    ///
    /// `None` means every group.
    pub fn relevant_groups(summary_type: SummaryType) -> Option<&'static [GroupName]> {
        const LIGHTS_HIDDEN: &[GroupName] = &[GroupName::Lights];
        const COVERS_HIDDEN: &[GroupName] = &[GroupName::Covers, GroupName::CoversCurtain];
        const SECURITY_HIDDEN: &[GroupName] =
            &[GroupName::Covers, GroupName::CoversCurtain, GroupName::Switches];

        match summary_type {
            SummaryType::Lights => Some(LIGHTS_HIDDEN),
            SummaryType::Covers => Some(COVERS_HIDDEN),
            SummaryType::Security => Some(SECURITY_HIDDEN),
            SummaryType::Batteries => None,
        }
    }

    /// Number of entities the tile reports
    pub fn count(&self, snapshot: &Snapshot) -> usize {
        self.display_list(snapshot).len()
    }

    pub fn display(&self, count: usize) -> SummaryDisplay {
        summary_display(self.config.summary_type, count)
    }
}

/// Visibility policy a summary of `summary_type` computes under
pub fn summary_policy(
    snapshot: &Snapshot,
    config: &DashboardConfig,
    summary_type: SummaryType,
) -> VisibilityPolicy {
    match SummaryCard::relevant_groups(summary_type) {
        Some(groups) => VisibilityPolicy::for_groups(snapshot, config, groups),
        None => VisibilityPolicy::for_all_groups(snapshot, config),
    }
}

/// Entities a summary of `summary_type` counts, in classification order
pub fn summary_members(
    summary_type: SummaryType,
    snapshot: &Snapshot,
    policy: &VisibilityPolicy,
) -> Vec<String> {
    let ids = snapshot.entity_ids();
    match summary_type {
        SummaryType::Lights => {
            let lights = classify(&LIGHTS, ids, snapshot, policy).take(GroupName::Lights);
            select(&lights, snapshot, StatePredicate::ON, SortOrder::Preserve)
        }
        SummaryType::Covers => {
            let covers = classify(&COVERS, ids, snapshot, policy)
                .union(&[GroupName::Covers, GroupName::CoversCurtain]);
            select(&covers, snapshot, StatePredicate::OPEN, SortOrder::Preserve)
        }
        SummaryType::Security => {
            let security = classify(&SECURITY, ids, snapshot, policy).union(&SECURITY_GROUPS);
            security
                .into_iter()
                .filter(|id| snapshot.state(id).is_some_and(|state| is_unsafe(id, state)))
                .collect()
        }
        SummaryType::Batteries => {
            let batteries = classify(&BATTERY, ids, snapshot, policy).take(GroupName::Batteries);
            select(
                &batteries,
                snapshot,
                StatePredicate::Below(CRITICAL_BATTERY),
                SortOrder::Preserve,
            )
        }
    }
}

/// Unlocked lock, fully open access cover, or tripped opening sensor
fn is_unsafe(entity_id: &str, state: &State) -> bool {
    match domain_of(entity_id) {
        domains::LOCK => state.is(STATE_UNLOCKED),
        domains::COVER => state.is(STATE_OPEN),
        domains::BINARY_SENSOR => state.is(STATE_ON),
        _ => false,
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("1 {one}")
    } else {
        format!("{count} {many}")
    }
}

/// Tile appearance for `count` entities of `summary_type`
///
/// A zero count is shown grey with an all-clear label.
pub fn summary_display(summary_type: SummaryType, count: usize) -> SummaryDisplay {
    let active = count > 0;
    let (icon, label, color) = match summary_type {
        SummaryType::Lights => (
            "mdi:lamps",
            if active { plural(count, "light on", "lights on") } else { "All lights off".into() },
            "orange",
        ),
        SummaryType::Covers => (
            "mdi:blinds-horizontal",
            if active { plural(count, "cover open", "covers open") } else { "All covers closed".into() },
            "purple",
        ),
        SummaryType::Security => (
            "mdi:security",
            if active { format!("{count} unsafe") } else { "All secure".into() },
            "yellow",
        ),
        SummaryType::Batteries => (
            if active { "mdi:battery-alert" } else { "mdi:battery-charging" },
            if active {
                plural(count, "battery critical", "batteries critical")
            } else {
                "All batteries OK".into()
            },
            "red",
        ),
    };

    SummaryDisplay {
        icon,
        label,
        color: if active { color } else { "grey" },
        path: summary_type.as_str(),
    }
}

impl Surface for SummaryCard {
    fn name(&self) -> &str {
        self.config.summary_type.as_str()
    }

    fn key_strategy(&self) -> KeyStrategy {
        KeyStrategy::Count
    }

    fn refresh(&mut self, snapshot: &Snapshot) {
        self.policy = summary_policy(snapshot, &self.config.config, self.config.summary_type);
        debug!(summary_type = self.config.summary_type.as_str(), "Refreshed summary card");
    }

    fn display_list(&self, snapshot: &Snapshot) -> Vec<String> {
        summary_members(self.config.summary_type, snapshot, &self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ha_registries::{EntityEntry, HiddenBy};
    use serde_json::json;

    fn state(id: &str, value: &str) -> State {
        State::new(id.parse().unwrap(), value)
    }

    fn card(summary_type: &str, snapshot: &Snapshot) -> SummaryCard {
        let mut card = SummaryCard::from_value(&json!({ "summary_type": summary_type })).unwrap();
        card.refresh(snapshot);
        card
    }

    #[test]
    fn test_security_count() {
        let snapshot = Snapshot::builder()
            .state(state("lock.front_door", "unlocked"))
            .state(state("lock.back_door", "locked"))
            .state(state("cover.garage", "open").with_attribute("device_class", "garage"))
            .state(state("cover.gate", "opening").with_attribute("device_class", "gate"))
            .state(state("binary_sensor.window", "on").with_attribute("device_class", "window"))
            .state(state("binary_sensor.hall", "on").with_attribute("device_class", "motion"))
            .build();
        assert_eq!(card("security", &snapshot).count(&snapshot), 3);
    }

    #[test]
    fn test_battery_count_ignores_hidden_by() {
        let snapshot = Snapshot::builder()
            .entity(EntityEntry::new("sensor.x_battery".parse().unwrap()).with_hidden_by(HiddenBy::Integration))
            .state(state("sensor.x_battery", "12"))
            .state(state("sensor.y_battery", "85"))
            .state(state("sensor.z_battery", "unknown"))
            .build();
        assert_eq!(card("batteries", &snapshot).count(&snapshot), 1);
    }

    #[test]
    fn test_lights_hidden_list_applies() {
        let snapshot = Snapshot::builder()
            .state(state("light.a", "on"))
            .state(state("light.b", "on"))
            .build();
        let mut card = SummaryCard::from_value(&json!({
            "summary_type": "lights",
            "areas_options": {
                "kitchen": { "groups_options": { "lights": { "hidden": ["light.b"] } } }
            }
        }))
        .unwrap();
        card.refresh(&snapshot);
        assert_eq!(card.count(&snapshot), 1);
    }

    #[test]
    fn test_display() {
        let lit = summary_display(SummaryType::Lights, 2);
        assert_eq!(lit.label, "2 lights on");
        assert_eq!(lit.color, "orange");
        assert_eq!(lit.path, "lights");

        let dark = summary_display(SummaryType::Lights, 0);
        assert_eq!(dark.label, "All lights off");
        assert_eq!(dark.color, "grey");

        assert_eq!(summary_display(SummaryType::Batteries, 0).icon, "mdi:battery-charging");
        assert_eq!(summary_display(SummaryType::Batteries, 1).label, "1 battery critical");
        assert_eq!(summary_display(SummaryType::Security, 3).label, "3 unsafe");
    }
}
