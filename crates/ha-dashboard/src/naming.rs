//! Display-name cleanup for tiles

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use ha_core::split_entity_id;
use ha_registries::Snapshot;

/// The entity's friendly name, else its object ID with spaces
pub fn display_name(entity_id: &str, snapshot: &Snapshot) -> String {
    snapshot
        .state(entity_id)
        .and_then(|state| state.friendly_name())
        .map(str::to_string)
        .unwrap_or_else(|| fallback_name(entity_id))
}

fn fallback_name(entity_id: &str) -> String {
    split_entity_id(entity_id)
        .map_or(entity_id, |(_, object_id)| object_id)
        .replace('_', " ")
}

/// Remove the area name from the start, end or middle of `name`
///
/// Matching is case-insensitive. If nothing meaningful is left, `name` is
/// returned unchanged.
pub fn strip_area_name(name: &str, area_name: &str) -> String {
    let area_name = area_name.trim();
    if area_name.is_empty() {
        return name.to_string();
    }
    let area = regex::escape(area_name);

    let mut cleaned = name.to_string();
    for (pattern, replacement) in [
        (format!(r"^{area}\s+"), ""),
        (format!(r"\s+{area}$"), ""),
        (format!(r"\s+{area}\s+"), " "),
    ] {
        let Ok(re) = RegexBuilder::new(&pattern).case_insensitive(true).build() else {
            return name.to_string();
        };
        cleaned = re.replace(&cleaned, replacement).into_owned();
    }

    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case(area_name) {
        name.to_string()
    } else {
        cleaned.to_string()
    }
}

fn cover_terms() -> Option<&'static Regex> {
    static COVER_TERMS: OnceLock<Option<Regex>> = OnceLock::new();
    COVER_TERMS
        .get_or_init(|| {
            Regex::new(
                r"(?i)\b(?:rollos?|roll?laden|rolläden|vorhang|vorhänge|gardinen?|jalousien?|shutters?|blinds?|curtains?)\b",
            )
            .ok()
        })
        .as_ref()
}

/// Remove shade and blind terms from a cover's name
///
/// Falls back to `name` if nothing is left.
pub fn strip_cover_type(name: &str) -> String {
    let Some(re) = cover_terms() else {
        return name.to_string();
    };
    let stripped = re.replace_all(name, "");
    let cleaned = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        name.to_string()
    } else {
        cleaned
    }
}

/// First word of a person's name
pub fn first_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ha_core::State;

    #[test]
    fn test_display_name() {
        let snapshot = Snapshot::builder()
            .state(
                State::new("light.desk_lamp".parse().unwrap(), "on")
                    .with_attribute("friendly_name", "Desk Lamp"),
            )
            .state(State::new("light.floor_lamp".parse().unwrap(), "on"))
            .build();
        assert_eq!(display_name("light.desk_lamp", &snapshot), "Desk Lamp");
        assert_eq!(display_name("light.floor_lamp", &snapshot), "floor lamp");
        assert_eq!(display_name("light.missing_one", &snapshot), "missing one");
    }

    #[test]
    fn test_strip_area_name() {
        assert_eq!(strip_area_name("Kitchen Ceiling", "Kitchen"), "Ceiling");
        assert_eq!(strip_area_name("Ceiling kitchen", "Kitchen"), "Ceiling");
        assert_eq!(strip_area_name("Main Kitchen Light", "kitchen"), "Main Light");
        assert_eq!(strip_area_name("Kitchen", "Kitchen"), "Kitchen");
        assert_eq!(strip_area_name("Kitchenette Light", "Kitchen"), "Kitchenette Light");
        assert_eq!(strip_area_name("Bath (1) Fan", "Bath (1)"), "Fan");
        assert_eq!(strip_area_name("Desk", ""), "Desk");
    }

    #[test]
    fn test_strip_cover_type() {
        assert_eq!(strip_cover_type("Rollo Wohnzimmer"), "Wohnzimmer");
        assert_eq!(strip_cover_type("Living Room Blinds"), "Living Room");
        assert_eq!(strip_cover_type("Vorhänge links"), "links");
        assert_eq!(strip_cover_type("Blind"), "Blind");
        assert_eq!(strip_cover_type("Blinder Door"), "Blinder Door");
    }

    #[test]
    fn test_first_name() {
        assert_eq!(first_name("Ada Lovelace"), "Ada");
        assert_eq!(first_name(""), "");
    }
}
