//! Named buckets produced by classification

use std::fmt;

use serde::{Deserialize, Serialize};

/// A semantic group an entity can be classified into
///
/// The `as_str` names double as the keys of `groups_options` in the
/// dashboard config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupName {
    Lights,
    Covers,
    CoversCurtain,
    Scenes,
    Climate,
    MediaPlayer,
    Vacuum,
    Fan,
    Switches,
    Cameras,

    // Sensor categories
    Battery,
    Temperature,
    Humidity,
    Pm25,
    Pm10,
    Co2,
    Voc,
    Illuminance,
    Motion,
    Occupancy,

    // Security
    Locks,
    Doors,
    Garages,
    Openings,

    /// Battery-level entities of any domain
    Batteries,
}

impl GroupName {
    /// Groups a room view lays out as sections, and the only ones users can
    /// hide or reorder entities in
    pub const ROOM_GROUPS: [GroupName; 10] = [
        GroupName::Lights,
        GroupName::Covers,
        GroupName::CoversCurtain,
        GroupName::Scenes,
        GroupName::Climate,
        GroupName::MediaPlayer,
        GroupName::Vacuum,
        GroupName::Fan,
        GroupName::Switches,
        GroupName::Cameras,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupName::Lights => "lights",
            GroupName::Covers => "covers",
            GroupName::CoversCurtain => "covers_curtain",
            GroupName::Scenes => "scenes",
            GroupName::Climate => "climate",
            GroupName::MediaPlayer => "media_player",
            GroupName::Vacuum => "vacuum",
            GroupName::Fan => "fan",
            GroupName::Switches => "switches",
            GroupName::Cameras => "cameras",
            GroupName::Battery => "battery",
            GroupName::Temperature => "temperature",
            GroupName::Humidity => "humidity",
            GroupName::Pm25 => "pm25",
            GroupName::Pm10 => "pm10",
            GroupName::Co2 => "co2",
            GroupName::Voc => "voc",
            GroupName::Illuminance => "illuminance",
            GroupName::Motion => "motion",
            GroupName::Occupancy => "occupancy",
            GroupName::Locks => "locks",
            GroupName::Doors => "doors",
            GroupName::Garages => "garages",
            GroupName::Openings => "openings",
            GroupName::Batteries => "batteries",
        }
    }

    /// True for the sensor categories a room view shows as badges
    pub fn is_sensor_category(&self) -> bool {
        matches!(
            self,
            GroupName::Battery
                | GroupName::Temperature
                | GroupName::Humidity
                | GroupName::Pm25
                | GroupName::Pm10
                | GroupName::Co2
                | GroupName::Voc
                | GroupName::Illuminance
                | GroupName::Motion
                | GroupName::Occupancy
        )
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
