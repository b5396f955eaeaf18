//! Entity classification
//!
//! A scheme is an ordered list of `(predicate, group)` rules. Each visible
//! entity is tested against the rules in order and lands in the group of the
//! first rule that matches; later rules are never consulted. Entities no
//! rule matches are dropped silently.
//!
//! Rule order is part of the contract. In [`ROOM`] the battery rule runs
//! before the humidity rule because both kinds of sensor report `%`.

use ha_core::domains::{self, device_class};
use ha_core::{domain_of, State};
use ha_registries::Snapshot;
use indexmap::IndexMap;
use tracing::{instrument, trace};

use crate::group::GroupName;
use crate::visibility::{is_battery_signature, VisibilityPolicy};

/// A visible entity as seen by classification rules
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub entity_id: &'a str,
    pub domain: &'a str,
    pub state: &'a State,
}

impl<'a> Candidate<'a> {
    pub fn new(entity_id: &'a str, state: &'a State) -> Self {
        Self {
            entity_id,
            domain: domain_of(entity_id),
            state,
        }
    }

    pub fn device_class(&self) -> Option<&'a str> {
        self.state.device_class()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.device_class() == Some(class)
    }

    pub fn has_class_in(&self, classes: &[&str]) -> bool {
        self.device_class().is_some_and(|c| classes.contains(&c))
    }

    pub fn unit(&self) -> Option<&'a str> {
        self.state.unit_of_measurement()
    }

    pub fn id_contains(&self, needle: &str) -> bool {
        self.entity_id.contains(needle)
    }
}

/// Classification rule predicate
pub type Predicate = fn(&Candidate<'_>) -> bool;

/// One `(predicate, group)` pair
#[derive(Clone, Copy)]
pub struct Rule {
    pub group: GroupName,
    pub matches: Predicate,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("group", &self.group).finish()
    }
}

/// Something that assigns a candidate to at most one group
pub trait Classify {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Cheap domain pre-filter run before any visibility check
    fn accepts_domain(&self, domain: &str) -> bool;

    /// Group of `candidate`, if any rule matches
    fn group_of(&self, candidate: &Candidate<'_>) -> Option<GroupName>;
}

/// A fixed, ordered rule list
#[derive(Debug)]
pub struct Scheme {
    pub name: &'static str,
    /// Domains any rule can match; empty means every domain
    pub domains: &'static [&'static str],
    pub rules: &'static [Rule],
}

impl Classify for Scheme {
    fn name(&self) -> &str {
        self.name
    }

    fn accepts_domain(&self, domain: &str) -> bool {
        self.domains.is_empty() || self.domains.contains(&domain)
    }

    fn group_of(&self, candidate: &Candidate<'_>) -> Option<GroupName> {
        self.rules
            .iter()
            .find(|rule| (rule.matches)(candidate))
            .map(|rule| rule.group)
    }
}

/// Covers whose device class is in a configured set, or that have none
#[derive(Debug, Clone)]
pub struct CoverScheme {
    device_classes: Vec<String>,
}

impl CoverScheme {
    pub fn new(device_classes: Vec<String>) -> Self {
        Self { device_classes }
    }
}

impl Classify for CoverScheme {
    fn name(&self) -> &str {
        "cover"
    }

    fn accepts_domain(&self, domain: &str) -> bool {
        domain == domains::COVER
    }

    fn group_of(&self, candidate: &Candidate<'_>) -> Option<GroupName> {
        match candidate.device_class() {
            None => Some(GroupName::Covers),
            Some(class) if self.device_classes.iter().any(|c| c == class) => {
                Some(GroupName::Covers)
            }
            Some(_) => None,
        }
    }
}

/// Classified entity IDs, grouped, in classification order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    groups: IndexMap<GroupName, Vec<String>>,
}

impl Classification {
    /// Members of `group`; empty if nothing was classified there
    pub fn get(&self, group: GroupName) -> &[String] {
        self.groups.get(&group).map_or(&[], Vec::as_slice)
    }

    /// Take ownership of one group's members
    pub fn take(&mut self, group: GroupName) -> Vec<String> {
        self.groups.shift_remove(&group).unwrap_or_default()
    }

    /// Members of several groups, concatenated in the order given
    pub fn union(&self, groups: &[GroupName]) -> Vec<String> {
        groups
            .iter()
            .flat_map(|group| self.get(*group).iter().cloned())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GroupName, &[String])> {
        self.groups.iter().map(|(group, ids)| (*group, ids.as_slice()))
    }

    /// Number of classified entities across all groups
    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Classify every visible entity among `entity_ids` with `scheme`
///
/// Entities outside the scheme's domains are skipped before visibility is
/// even checked.
#[instrument(skip_all, fields(scheme = scheme.name()))]
pub fn classify<'a, C>(
    scheme: &C,
    entity_ids: impl IntoIterator<Item = &'a str>,
    snapshot: &Snapshot,
    policy: &VisibilityPolicy,
) -> Classification
where
    C: Classify + ?Sized,
{
    let mut result = Classification::default();

    for entity_id in entity_ids {
        if !scheme.accepts_domain(domain_of(entity_id)) {
            continue;
        }
        let state = match policy.check(entity_id, snapshot) {
            Ok(state) => state,
            Err(reason) => {
                trace!(entity_id, %reason, "Skipping invisible entity");
                continue;
            }
        };

        let candidate = Candidate::new(entity_id, state);
        match scheme.group_of(&candidate) {
            Some(group) => result
                .groups
                .entry(group)
                .or_default()
                .push(entity_id.to_string()),
            None => trace!(entity_id, "No classification rule matched"),
        }
    }

    result
}

// Rule predicates

fn is_light(c: &Candidate<'_>) -> bool {
    c.domain == domains::LIGHT
}

fn is_curtain_cover(c: &Candidate<'_>) -> bool {
    c.domain == domains::COVER && c.has_class_in(device_class::CURTAIN_COVERS)
}

fn is_cover(c: &Candidate<'_>) -> bool {
    c.domain == domains::COVER
}

fn is_scene(c: &Candidate<'_>) -> bool {
    c.domain == domains::SCENE
}

fn is_climate(c: &Candidate<'_>) -> bool {
    c.domain == domains::CLIMATE
}

fn is_media_player(c: &Candidate<'_>) -> bool {
    c.domain == domains::MEDIA_PLAYER
}

fn is_vacuum(c: &Candidate<'_>) -> bool {
    c.domain == domains::VACUUM
}

fn is_fan(c: &Candidate<'_>) -> bool {
    c.domain == domains::FAN
}

fn is_switch(c: &Candidate<'_>) -> bool {
    c.domain == domains::SWITCH
}

fn is_camera(c: &Candidate<'_>) -> bool {
    c.domain == domains::CAMERA
}

fn is_battery(c: &Candidate<'_>) -> bool {
    is_battery_signature(c.entity_id, c.state)
}

fn is_battery_sensor(c: &Candidate<'_>) -> bool {
    c.domain == domains::SENSOR && is_battery(c)
}

fn is_temperature_sensor(c: &Candidate<'_>) -> bool {
    c.domain == domains::SENSOR
        && (c.has_class(device_class::TEMPERATURE) || matches!(c.unit(), Some("°C" | "°F")))
}

fn is_humidity_sensor(c: &Candidate<'_>) -> bool {
    c.domain == domains::SENSOR && (c.has_class(device_class::HUMIDITY) || c.unit() == Some("%"))
}

fn is_pm25_sensor(c: &Candidate<'_>) -> bool {
    c.domain == domains::SENSOR
        && (c.has_class(device_class::PM25) || c.id_contains("pm_2_5") || c.id_contains("pm25"))
}

fn is_pm10_sensor(c: &Candidate<'_>) -> bool {
    c.domain == domains::SENSOR
        && (c.has_class(device_class::PM10) || c.id_contains("pm_10") || c.id_contains("pm10"))
}

fn is_co2_sensor(c: &Candidate<'_>) -> bool {
    c.domain == domains::SENSOR && (c.has_class(device_class::CARBON_DIOXIDE) || c.id_contains("co2"))
}

fn is_voc_sensor(c: &Candidate<'_>) -> bool {
    c.domain == domains::SENSOR
        && (c.has_class(device_class::VOLATILE_ORGANIC_COMPOUNDS) || c.id_contains("voc"))
}

fn is_illuminance_sensor(c: &Candidate<'_>) -> bool {
    c.domain == domains::SENSOR && (c.has_class(device_class::ILLUMINANCE) || c.unit() == Some("lx"))
}

fn is_motion_sensor(c: &Candidate<'_>) -> bool {
    c.domain == domains::BINARY_SENSOR && c.has_class(device_class::MOTION)
}

fn is_presence_sensor(c: &Candidate<'_>) -> bool {
    c.domain == domains::BINARY_SENSOR && c.has_class(device_class::PRESENCE)
}

fn is_lock(c: &Candidate<'_>) -> bool {
    c.domain == domains::LOCK
}

fn is_garage_cover(c: &Candidate<'_>) -> bool {
    c.domain == domains::COVER && c.has_class(device_class::GARAGE)
}

fn is_door_cover(c: &Candidate<'_>) -> bool {
    c.domain == domains::COVER && c.has_class_in(&[device_class::DOOR, device_class::GATE])
}

fn is_opening_sensor(c: &Candidate<'_>) -> bool {
    c.domain == domains::BINARY_SENSOR && c.has_class_in(device_class::SECURITY_OPENINGS)
}

/// Everything a room view shows, sections and badges alike
pub static ROOM: Scheme = Scheme {
    name: "room",
    domains: &[
        domains::LIGHT,
        domains::COVER,
        domains::SCENE,
        domains::CLIMATE,
        domains::MEDIA_PLAYER,
        domains::VACUUM,
        domains::FAN,
        domains::SWITCH,
        domains::CAMERA,
        domains::SENSOR,
        domains::BINARY_SENSOR,
    ],
    rules: &[
        Rule { group: GroupName::Lights, matches: is_light },
        Rule { group: GroupName::CoversCurtain, matches: is_curtain_cover },
        Rule { group: GroupName::Covers, matches: is_cover },
        Rule { group: GroupName::Scenes, matches: is_scene },
        Rule { group: GroupName::Climate, matches: is_climate },
        Rule { group: GroupName::MediaPlayer, matches: is_media_player },
        Rule { group: GroupName::Vacuum, matches: is_vacuum },
        Rule { group: GroupName::Fan, matches: is_fan },
        Rule { group: GroupName::Switches, matches: is_switch },
        Rule { group: GroupName::Cameras, matches: is_camera },
        // Battery before humidity: both report %
        Rule { group: GroupName::Battery, matches: is_battery_sensor },
        Rule { group: GroupName::Temperature, matches: is_temperature_sensor },
        Rule { group: GroupName::Humidity, matches: is_humidity_sensor },
        Rule { group: GroupName::Pm25, matches: is_pm25_sensor },
        Rule { group: GroupName::Pm10, matches: is_pm10_sensor },
        Rule { group: GroupName::Co2, matches: is_co2_sensor },
        Rule { group: GroupName::Voc, matches: is_voc_sensor },
        Rule { group: GroupName::Illuminance, matches: is_illuminance_sensor },
        Rule { group: GroupName::Motion, matches: is_motion_sensor },
        Rule { group: GroupName::Occupancy, matches: is_presence_sensor },
    ],
};

/// Lights only
pub static LIGHTS: Scheme = Scheme {
    name: "lights",
    domains: &[domains::LIGHT],
    rules: &[Rule { group: GroupName::Lights, matches: is_light }],
};

/// Every cover, split into curtain-like and the rest
pub static COVERS: Scheme = Scheme {
    name: "covers",
    domains: &[domains::COVER],
    rules: &[
        Rule { group: GroupName::CoversCurtain, matches: is_curtain_cover },
        Rule { group: GroupName::Covers, matches: is_cover },
    ],
};

/// Locks, access-point covers and opening sensors
///
/// The three domains are disjoint, so an entity reaches the security group
/// through exactly one path.
pub static SECURITY: Scheme = Scheme {
    name: "security",
    domains: &[domains::LOCK, domains::COVER, domains::BINARY_SENSOR],
    rules: &[
        Rule { group: GroupName::Locks, matches: is_lock },
        Rule { group: GroupName::Garages, matches: is_garage_cover },
        Rule { group: GroupName::Doors, matches: is_door_cover },
        Rule { group: GroupName::Openings, matches: is_opening_sensor },
    ],
};

/// Battery-level entities of any domain
pub static BATTERY: Scheme = Scheme {
    name: "battery",
    domains: &[],
    rules: &[Rule { group: GroupName::Batteries, matches: is_battery }],
};

/// Security groups in the order the security view lays them out
pub const SECURITY_GROUPS: [GroupName; 4] = [
    GroupName::Locks,
    GroupName::Doors,
    GroupName::Garages,
    GroupName::Openings,
];
