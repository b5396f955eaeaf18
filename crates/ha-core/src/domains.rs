//! Domain, device class and service names the dashboard classifies by
//!
//! These are plain string constants because the host sends them as strings;
//! keeping them in one place means classification rules and tests agree on
//! the spelling.

pub const LIGHT: &str = "light";
pub const COVER: &str = "cover";
pub const LOCK: &str = "lock";
pub const BINARY_SENSOR: &str = "binary_sensor";
pub const SENSOR: &str = "sensor";
pub const SCENE: &str = "scene";
pub const CLIMATE: &str = "climate";
pub const MEDIA_PLAYER: &str = "media_player";
pub const VACUUM: &str = "vacuum";
pub const FAN: &str = "fan";
pub const SWITCH: &str = "switch";
pub const CAMERA: &str = "camera";
pub const PERSON: &str = "person";
pub const WEATHER: &str = "weather";
pub const SIREN: &str = "siren";
pub const SUN: &str = "sun";

/// Domains that only report state; a batch command never targets them
pub static READONLY_DOMAINS: &[&str] = &[
    SENSOR,
    BINARY_SENSOR,
    WEATHER,
    "device_tracker",
    SUN,
    "zone",
    PERSON,
    "calendar",
    "image",
    "event",
    "update",
];

/// Check if a domain is read-only
pub fn is_readonly_domain(domain: &str) -> bool {
    READONLY_DOMAINS.contains(&domain)
}

/// Device class values used by the classification schemes
pub mod device_class {
    pub const BATTERY: &str = "battery";
    pub const TEMPERATURE: &str = "temperature";
    pub const HUMIDITY: &str = "humidity";
    pub const PM25: &str = "pm25";
    pub const PM10: &str = "pm10";
    pub const CARBON_DIOXIDE: &str = "carbon_dioxide";
    pub const VOLATILE_ORGANIC_COMPOUNDS: &str = "volatile_organic_compounds";
    pub const ILLUMINANCE: &str = "illuminance";
    pub const MOTION: &str = "motion";
    pub const PRESENCE: &str = "presence";

    pub const CURTAIN: &str = "curtain";
    pub const BLIND: &str = "blind";
    pub const GARAGE: &str = "garage";
    pub const DOOR: &str = "door";
    pub const GATE: &str = "gate";
    pub const WINDOW: &str = "window";
    pub const GARAGE_DOOR: &str = "garage_door";
    pub const OPENING: &str = "opening";

    /// Cover classes shown on the covers view when no override is configured
    pub static DEFAULT_SHADE_COVERS: &[&str] =
        &["awning", BLIND, CURTAIN, "shade", "shutter", WINDOW];

    /// Cover classes that split into the curtain bucket
    pub static CURTAIN_COVERS: &[&str] = &[CURTAIN, BLIND];

    /// Cover classes the security view treats as access points
    pub static SECURITY_COVERS: &[&str] = &[DOOR, GARAGE, GATE];

    /// Binary sensor classes the security view treats as openings
    pub static SECURITY_OPENINGS: &[&str] = &[DOOR, WINDOW, GARAGE_DOOR, OPENING];
}

/// Services issued by batch actions
pub mod services {
    pub const TURN_ON: &str = "turn_on";
    pub const TURN_OFF: &str = "turn_off";
    pub const OPEN_COVER: &str = "open_cover";
    pub const CLOSE_COVER: &str = "close_cover";
    pub const LOCK: &str = "lock";
}
