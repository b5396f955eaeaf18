//! Cross-area views: lights, covers, security and batteries

use ha_core::domains::{self, services};
use ha_core::{BatchCommand, STATE_CLOSED, STATE_LOCKED, STATE_OPEN, STATE_UNLOCKED};
use ha_dashboard_config::{
    CoverGroupType, CoversGroupCardConfig, DashboardConfig, LightGroupType, LightsGroupCardConfig,
    SummaryType,
};
use ha_registries::Snapshot;
use tracing::debug;

use crate::cards::{summary_policy, CRITICAL_BATTERY};
use crate::classifier::{classify, BATTERY, SECURITY};
use crate::filter::{select, SortOrder, StatePredicate};
use crate::group::GroupName;
use crate::layout::lovelace::{
    Card, EntityBadge, Feature, HeadingCard, Section, StateContent, TileCard, View,
};
use crate::visibility::VisibilityPolicy;

/// Upper bound of the "low" battery bucket, inclusive
pub const LOW_BATTERY: f64 = 50.0;

fn utility_view(summary_type: SummaryType, title: &str, icon: &str, config: &DashboardConfig) -> View {
    View::new(title, summary_type.as_str())
        .icon(icon)
        .subview(!config.show_summary_views)
}

/// On and off light group cards
pub fn lights_view(config: &DashboardConfig) -> View {
    let mut view = utility_view(SummaryType::Lights, "Lights", "mdi:lamps", config);
    view.push_section(Section {
        cards: vec![
            Card::LightsGroup(LightsGroupCardConfig::new(LightGroupType::On, config.clone())),
            Card::LightsGroup(LightsGroupCardConfig::new(LightGroupType::Off, config.clone())),
        ],
    });
    view
}

/// Open and closed cover group cards
pub fn covers_view(config: &DashboardConfig) -> View {
    let mut view = utility_view(SummaryType::Covers, "Covers", "mdi:blinds-horizontal", config);
    view.push_section(Section {
        cards: vec![
            Card::CoversGroup(CoversGroupCardConfig::new(CoverGroupType::Open, config.clone())),
            Card::CoversGroup(CoversGroupCardConfig::new(CoverGroupType::Closed, config.clone())),
        ],
    });
    view
}

/// One half of a split section: a subtitle, an optional batch badge and tiles
fn push_split(
    section: &mut Section,
    heading: &str,
    members: &[String],
    batch: Option<(BatchCommand, &str)>,
    tile: impl Fn(&str) -> TileCard,
) {
    if members.is_empty() {
        return;
    }
    let mut heading = HeadingCard::subtitle(heading);
    if let Some(badge) = batch.and_then(|(command, icon)| EntityBadge::batch(command, icon)) {
        heading = heading.badge(badge);
    }
    section.push(heading);
    section.extend(members.iter().map(|id| tile(id)));
}

fn lock_tile(entity_id: &str) -> TileCard {
    TileCard::new(entity_id)
        .feature(Feature::LockCommands)
        .state_content(StateContent::last_changed())
}

fn access_cover_tile(entity_id: &str) -> TileCard {
    TileCard::new(entity_id)
        .inline_feature(Feature::CoverOpenClose)
        .state_content(StateContent::last_changed())
}

fn opening_tile(entity_id: &str) -> TileCard {
    TileCard::new(entity_id).state_content(StateContent::last_changed())
}

fn access_cover_section(label: &str, members: &[String], snapshot: &Snapshot) -> Section {
    let open = select(members, snapshot, StatePredicate::Is(STATE_OPEN), SortOrder::Preserve);
    let closed = select(members, snapshot, StatePredicate::Is(STATE_CLOSED), SortOrder::Preserve);
    let close_all = BatchCommand::new(domains::COVER, services::CLOSE_COVER, open.clone()).ok();

    let mut section = Section::default();
    push_split(
        &mut section,
        &format!("{label} - open"),
        &open,
        close_all.map(|command| (command, "mdi:arrow-down")),
        access_cover_tile,
    );
    push_split(&mut section, &format!("{label} - closed"), &closed, None, access_cover_tile);
    section
}

/// Locks, doors and gates, garages, and opening sensors
pub fn security_view(snapshot: &Snapshot, config: &DashboardConfig) -> View {
    let policy = summary_policy(snapshot, config, SummaryType::Security);
    let groups = classify(&SECURITY, snapshot.entity_ids(), snapshot, &policy);
    debug!(entities = groups.total(), "Building security view");

    let mut view = utility_view(SummaryType::Security, "Security", "mdi:security", config);

    let locks = groups.get(GroupName::Locks);
    let unlocked = select(locks, snapshot, StatePredicate::Is(STATE_UNLOCKED), SortOrder::Preserve);
    let locked = select(locks, snapshot, StatePredicate::Is(STATE_LOCKED), SortOrder::Preserve);
    let lock_all = BatchCommand::new(domains::LOCK, services::LOCK, unlocked.clone()).ok();
    let mut section = Section::default();
    push_split(
        &mut section,
        "Locks - unlocked",
        &unlocked,
        lock_all.map(|command| (command, "mdi:lock")),
        lock_tile,
    );
    push_split(&mut section, "Locks - locked", &locked, None, lock_tile);
    view.push_section(section);

    view.push_section(access_cover_section("Doors & gates", groups.get(GroupName::Doors), snapshot));
    view.push_section(access_cover_section("Garages", groups.get(GroupName::Garages), snapshot));

    let openings = groups.get(GroupName::Openings);
    let mut section = Section::default();
    push_split(
        &mut section,
        "Windows & openings - open",
        &select(openings, snapshot, StatePredicate::ON, SortOrder::Preserve),
        None,
        opening_tile,
    );
    push_split(
        &mut section,
        "Windows & openings - closed",
        &select(openings, snapshot, StatePredicate::OFF, SortOrder::Preserve),
        None,
        opening_tile,
    );
    view.push_section(section);

    view
}

fn battery_section(title: &str, members: &[String], color: &str) -> Section {
    if members.is_empty() {
        return Section::default();
    }
    let noun = if members.len() == 1 { "battery" } else { "batteries" };
    let mut section =
        Section::titled(HeadingCard::title(format!("{title} - {} {noun}", members.len())));
    section.extend(members.iter().map(|id| {
        TileCard::new(id.as_str())
            .horizontal()
            .color(color)
            .state_content(StateContent::many(&["state", "last_changed"]))
    }));
    section
}

/// Battery levels bucketed into critical, low and good
///
/// Batteries whose level does not parse appear in no bucket.
pub fn batteries_view(snapshot: &Snapshot, config: &DashboardConfig) -> View {
    let policy = VisibilityPolicy::for_all_groups(snapshot, config);
    let batteries = classify(&BATTERY, snapshot.entity_ids(), snapshot, &policy)
        .take(GroupName::Batteries);

    let bucket = |predicate| select(&batteries, snapshot, predicate, SortOrder::Preserve);
    let critical = bucket(StatePredicate::Below(CRITICAL_BATTERY));
    let low = bucket(StatePredicate::Between(CRITICAL_BATTERY, LOW_BATTERY));
    let good = bucket(StatePredicate::Above(LOW_BATTERY));
    debug!(
        critical = critical.len(),
        low = low.len(),
        good = good.len(),
        "Building batteries view"
    );

    let mut view = utility_view(SummaryType::Batteries, "Batteries", "mdi:battery-alert", config);
    view.push_section(battery_section("Critical (< 20%)", &critical, "red"));
    view.push_section(battery_section("Low (20-50%)", &low, "yellow"));
    view.push_section(battery_section("Good (> 50%)", &good, "green"));
    view
}

/// All four utility views in top-bar order
pub fn utility_views(snapshot: &Snapshot, config: &DashboardConfig) -> Vec<View> {
    vec![
        lights_view(config),
        covers_view(config),
        security_view(snapshot, config),
        batteries_view(snapshot, config),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::lovelace::Action;
    use ha_core::State;

    fn state(id: &str, value: &str) -> State {
        State::new(id.parse().unwrap(), value)
    }

    fn headings(view: &View) -> Vec<String> {
        view.cards()
            .filter_map(|card| match card {
                Card::Heading(h) => Some(h.heading.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_subview_flag() {
        let config = DashboardConfig::default();
        assert!(lights_view(&config).subview);

        let config = DashboardConfig {
            show_summary_views: true,
            ..DashboardConfig::default()
        };
        assert!(!covers_view(&config).subview);
    }

    #[test]
    fn test_security_sections() {
        let snapshot = Snapshot::builder()
            .state(state("lock.front_door", "unlocked"))
            .state(state("lock.back_door", "locked"))
            .state(state("cover.garage", "open").with_attribute("device_class", "garage"))
            .state(state("binary_sensor.window", "off").with_attribute("device_class", "window"))
            .build();
        let view = security_view(&snapshot, &DashboardConfig::default());

        assert_eq!(
            headings(&view),
            vec![
                "Locks - unlocked",
                "Locks - locked",
                "Garages - open",
                "Windows & openings - closed"
            ]
        );
        let Card::Heading(unlocked) = &view.sections[0].cards[0] else {
            panic!("expected heading");
        };
        assert_eq!(
            unlocked.badges[0].tap_action,
            Some(Action::PerformAction {
                perform_action: "lock.lock".into(),
                target: crate::layout::lovelace::ActionTarget {
                    entity_id: vec!["lock.front_door".into()]
                },
            })
        );
    }

    #[test]
    fn test_battery_buckets() {
        let snapshot = Snapshot::builder()
            .state(state("sensor.a_battery", "5"))
            .state(state("sensor.b_battery", "20"))
            .state(state("sensor.c_battery", "50"))
            .state(state("sensor.d_battery", "51"))
            .state(state("sensor.e_battery", "unavailable"))
            .build();
        let view = batteries_view(&snapshot, &DashboardConfig::default());

        assert_eq!(
            headings(&view),
            vec![
                "Critical (< 20%) - 1 battery",
                "Low (20-50%) - 2 batteries",
                "Good (> 50%) - 1 battery"
            ]
        );
    }
}
