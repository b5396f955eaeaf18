//! Area selection and per-area membership

use std::cmp::Ordering;

use ha_dashboard_config::AreasDisplay;
use ha_registries::{AreaEntry, Snapshot};

/// Areas not hidden by `display`, configured order first, then by name
pub fn visible_areas<'s>(snapshot: &'s Snapshot, display: &AreasDisplay) -> Vec<&'s AreaEntry> {
    let mut areas: Vec<&AreaEntry> = snapshot
        .areas()
        .filter(|area| !display.is_hidden(&area.area_id))
        .collect();

    areas.sort_by(|a, b| {
        match (display.position(&a.area_id), display.position(&b.area_id)) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => compare_names(&a.name, &b.name),
        }
    });
    areas
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Registry entities that belong to `area_id`, directly or through their device
pub fn entities_in_area<'s>(snapshot: &'s Snapshot, area_id: &str) -> Vec<&'s str> {
    snapshot
        .entities()
        .map(|entry| entry.entity_id.as_str())
        .filter(|entity_id| snapshot.area_of(entity_id) == Some(area_id))
        .collect()
}
