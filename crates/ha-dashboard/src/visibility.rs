//! Which entities may appear on the dashboard at all
//!
//! A [`VisibilityPolicy`] is built against one snapshot's entity set and one
//! set of config-hidden IDs. Rejection checks run cheapest first and stop at
//! the first hit. A policy must be rebuilt when the entity set changes,
//! since the label exclusions are read from the registry once.

use std::collections::HashSet;
use std::fmt;

use ha_core::domains::device_class;
use ha_core::State;
use ha_dashboard_config::DashboardConfig;
use ha_registries::{EntityCategory, Snapshot};
use tracing::{debug, trace};

use crate::group::GroupName;

/// Label that keeps an entity off every dashboard surface
pub const EXCLUDE_LABEL: &str = "no_dboard";

/// Why an entity is not visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// No live state yet; not an error, the entity appears once it reports
    MissingState,
    /// Carries [`EXCLUDE_LABEL`]
    ExcludedLabel,
    /// Listed in a config hidden list for the group being computed
    HiddenByConfig,
    /// Explicitly set invisible in the registry
    Hidden,
    /// Hidden automatically by its integration
    HiddenBy,
    Disabled,
    /// Config or diagnostic entity
    AuxiliaryCategory,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::MissingState => "missing state",
            Rejection::ExcludedLabel => "exclusion label",
            Rejection::HiddenByConfig => "hidden by dashboard config",
            Rejection::Hidden => "hidden",
            Rejection::HiddenBy => "hidden by integration",
            Rejection::Disabled => "disabled",
            Rejection::AuxiliaryCategory => "config/diagnostic category",
        };
        f.write_str(reason)
    }
}

/// True for battery-level entities: the ID mentions `battery` or the
/// device class is `battery`
pub fn is_battery_signature(entity_id: &str, state: &State) -> bool {
    entity_id.contains("battery") || state.device_class() == Some(device_class::BATTERY)
}

/// Visibility rules for one group computation
#[derive(Debug, Clone, Default)]
pub struct VisibilityPolicy {
    /// Entities carrying the exclusion label
    excluded: HashSet<String>,
    /// Config hidden lists of the groups being computed
    hidden: HashSet<String>,
}

impl VisibilityPolicy {
    /// Policy over `snapshot`'s entity set with an explicit hidden set
    pub fn new(snapshot: &Snapshot, hidden: HashSet<String>) -> Self {
        let excluded: HashSet<String> = snapshot
            .entities()
            .filter(|entry| entry.has_label(EXCLUDE_LABEL))
            .map(|entry| entry.entity_id.to_string())
            .collect();

        debug!(
            excluded = excluded.len(),
            hidden = hidden.len(),
            "Built visibility policy"
        );
        Self { excluded, hidden }
    }

    /// Honour only the exclusion label and registry flags
    pub fn unfiltered(snapshot: &Snapshot) -> Self {
        Self::new(snapshot, HashSet::new())
    }

    /// Hide whatever any area hides in one of `groups`
    pub fn for_groups(snapshot: &Snapshot, config: &DashboardConfig, groups: &[GroupName]) -> Self {
        let hidden = config.hidden_for_groups(groups.iter().map(GroupName::as_str));
        Self::new(snapshot, hidden)
    }

    /// Hide whatever any area hides in any group
    pub fn for_all_groups(snapshot: &Snapshot, config: &DashboardConfig) -> Self {
        Self::new(snapshot, config.hidden_in_any_group())
    }

    /// True if the config hides `entity_id` for this computation
    pub fn hides(&self, entity_id: &str) -> bool {
        self.hidden.contains(entity_id)
    }

    /// Apply every rule; on success hand back the entity's live state
    ///
    /// Registry checks are skipped for entities the registry does not know.
    /// Battery-level entities ignore `hidden_by`, `disabled_by` and the
    /// entity category, but an explicit `hidden` still applies.
    pub fn check<'s>(&self, entity_id: &str, snapshot: &'s Snapshot) -> Result<&'s State, Rejection> {
        let state = snapshot.state(entity_id).ok_or(Rejection::MissingState)?;

        if self.excluded.contains(entity_id) {
            return Err(Rejection::ExcludedLabel);
        }
        if self.hidden.contains(entity_id) {
            return Err(Rejection::HiddenByConfig);
        }

        let battery = is_battery_signature(entity_id, state);
        if let Some(entry) = snapshot.entity(entity_id) {
            if entry.hidden {
                return Err(Rejection::Hidden);
            }
            if !battery {
                if entry.is_hidden_by() {
                    return Err(Rejection::HiddenBy);
                }
                if entry.is_disabled() {
                    return Err(Rejection::Disabled);
                }
                if entry.is_auxiliary() {
                    return Err(Rejection::AuxiliaryCategory);
                }
            }
        }

        // Some integrations only report the category on the state
        if !battery && state.entity_category().is_some_and(EntityCategory::is_auxiliary_str) {
            return Err(Rejection::AuxiliaryCategory);
        }

        Ok(state)
    }

    /// Same as [`check`](Self::check), reduced to a bool
    pub fn is_visible(&self, entity_id: &str, snapshot: &Snapshot) -> bool {
        match self.check(entity_id, snapshot) {
            Ok(_) => true,
            Err(reason) => {
                trace!(entity_id, %reason, "Entity not visible");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ha_registries::{DisabledBy, EntityEntry, HiddenBy};

    fn entry(id: &str) -> EntityEntry {
        EntityEntry::new(id.parse().unwrap())
    }

    fn state(id: &str, value: &str) -> State {
        State::new(id.parse().unwrap(), value)
    }

    #[test]
    fn test_missing_state_is_invisible() {
        let snapshot = Snapshot::builder().entity(entry("light.porch")).build();
        let policy = VisibilityPolicy::unfiltered(&snapshot);
        assert_eq!(
            policy.check("light.porch", &snapshot).unwrap_err(),
            Rejection::MissingState
        );
    }

    #[test]
    fn test_rule_order() {
        let snapshot = Snapshot::builder()
            .entity(
                entry("light.hall")
                    .with_label(EXCLUDE_LABEL)
                    .with_hidden(true),
            )
            .state(state("light.hall", "on"))
            .entity(entry("light.desk").with_hidden(true).with_disabled_by(DisabledBy::User))
            .state(state("light.desk", "on"))
            .build();
        let policy = VisibilityPolicy::new(&snapshot, HashSet::from(["light.desk".to_string()]));

        assert_eq!(
            policy.check("light.hall", &snapshot).unwrap_err(),
            Rejection::ExcludedLabel
        );
        assert_eq!(
            policy.check("light.desk", &snapshot).unwrap_err(),
            Rejection::HiddenByConfig
        );
        assert!(policy.hides("light.desk"));
    }

    #[test]
    fn test_registry_flags() {
        let snapshot = Snapshot::builder()
            .entity(entry("switch.a").with_hidden_by(HiddenBy::Integration))
            .state(state("switch.a", "on"))
            .entity(entry("switch.b").with_disabled_by(DisabledBy::Integration))
            .state(state("switch.b", "on"))
            .entity(entry("switch.c").with_category(EntityCategory::Config))
            .state(state("switch.c", "on"))
            .state(state("switch.d", "on").with_attribute("entity_category", "diagnostic"))
            .state(state("switch.e", "on"))
            .build();
        let policy = VisibilityPolicy::unfiltered(&snapshot);

        assert_eq!(policy.check("switch.a", &snapshot).unwrap_err(), Rejection::HiddenBy);
        assert_eq!(policy.check("switch.b", &snapshot).unwrap_err(), Rejection::Disabled);
        assert_eq!(
            policy.check("switch.c", &snapshot).unwrap_err(),
            Rejection::AuxiliaryCategory
        );
        assert_eq!(
            policy.check("switch.d", &snapshot).unwrap_err(),
            Rejection::AuxiliaryCategory
        );
        // Not registered: state checks only
        assert!(policy.is_visible("switch.e", &snapshot));
    }

    #[test]
    fn test_battery_exemption() {
        let snapshot = Snapshot::builder()
            .entity(
                entry("sensor.x_battery")
                    .with_hidden_by(HiddenBy::Integration)
                    .with_category(EntityCategory::Diagnostic),
            )
            .state(state("sensor.x_battery", "12"))
            .entity(entry("sensor.remote_level").with_disabled_by(DisabledBy::Integration))
            .state(state("sensor.remote_level", "40").with_attribute("device_class", "battery"))
            .entity(entry("sensor.y_battery").with_hidden(true))
            .state(state("sensor.y_battery", "5"))
            .entity(entry("sensor.noise").with_hidden_by(HiddenBy::Integration))
            .state(state("sensor.noise", "40").with_attribute("device_class", "sound_pressure"))
            .build();
        let policy = VisibilityPolicy::unfiltered(&snapshot);

        assert!(policy.is_visible("sensor.x_battery", &snapshot));
        assert!(policy.is_visible("sensor.remote_level", &snapshot));
        assert_eq!(policy.check("sensor.y_battery", &snapshot).unwrap_err(), Rejection::Hidden);
        // The exemption is not extended to other classes
        assert_eq!(policy.check("sensor.noise", &snapshot).unwrap_err(), Rejection::HiddenBy);
    }

    #[test]
    fn test_idempotent() {
        let snapshot = Snapshot::builder()
            .entity(entry("light.a"))
            .state(state("light.a", "on"))
            .build();
        let policy = VisibilityPolicy::unfiltered(&snapshot);
        let first = policy.check("light.a", &snapshot).map(|s| s.state.clone());
        let second = policy.check("light.a", &snapshot).map(|s| s.state.clone());
        assert_eq!(first, second);
    }
}
