//! Self-updating cards driven through snapshot deliveries

mod common;

use chrono::{TimeZone, Utc};
use common::{cover, home_snapshot, init_tracing, state};
use ha_dashboard::binding::{BindingError, BindingState, ReactiveBinding, Surface};
use ha_dashboard::cards::{CoversGroupCard, LightsGroupCard, SummaryCard};
use ha_dashboard::fingerprint::{compute_key, KeyStrategy};
use ha_dashboard_config::{
    CoverGroupType, CoversGroupCardConfig, DashboardConfig, LightGroupType, LightsGroupCardConfig,
};
use ha_registries::{EntityEntry, Snapshot};
use serde_json::json;

fn lights_card(group_type: LightGroupType) -> LightsGroupCard {
    LightsGroupCard::new(LightsGroupCardConfig::new(group_type, DashboardConfig::default()))
}

fn covers_card(group_type: CoverGroupType) -> CoversGroupCard {
    CoversGroupCard::new(CoversGroupCardConfig::new(group_type, DashboardConfig::default()))
}

#[test]
fn test_excluded_label_keeps_light_off_both_lists() {
    init_tracing();
    let snapshot = Snapshot::builder()
        .entity(EntityEntry::new("light.kitchen".parse().unwrap()))
        .entity(EntityEntry::new("light.hall".parse().unwrap()).with_label("no_dboard"))
        .state(state("light.kitchen", "on"))
        .state(state("light.hall", "off"))
        .build();

    let mut on = ReactiveBinding::new(lights_card(LightGroupType::On));
    let mut off = ReactiveBinding::new(lights_card(LightGroupType::Off));

    assert_eq!(on.on_snapshot_update(&snapshot).unwrap().display_list, vec!["light.kitchen"]);
    assert!(off.on_snapshot_update(&snapshot).unwrap().display_list.is_empty());
}

#[test]
fn test_lights_newest_change_first() {
    let older = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    let newer = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    let snapshot = Snapshot::builder()
        .state(state("light.a", "on").with_last_changed(older))
        .state(state("light.b", "on").with_last_changed(newer))
        .build();

    let mut binding = ReactiveBinding::new(lights_card(LightGroupType::On));
    let decision = binding.on_snapshot_update(&snapshot).unwrap();
    assert_eq!(decision.display_list, vec!["light.b", "light.a"]);
}

#[test]
fn test_unrelated_state_change_skips_render() {
    let snapshot = home_snapshot();
    let mut binding = ReactiveBinding::new(lights_card(LightGroupType::On));

    assert!(binding.on_snapshot_update(&snapshot).unwrap().should_render);

    let next = snapshot.with_state(state("weather.home", "rainy"));
    let decision = binding.on_snapshot_update(&next).unwrap();
    assert!(!decision.should_render);
    assert_eq!(decision.display_list, vec!["light.kitchen"]);

    let next = next.with_state(state("light.living_room_lamp", "on"));
    let decision = binding.on_snapshot_update(&next).unwrap();
    assert!(decision.should_render);
    assert_eq!(decision.display_list.len(), 2);
}

#[test]
fn test_opening_cover_renders_every_tick() {
    init_tracing();
    let mut current = Snapshot::builder().state(cover("cover.blind_1", "open", 100)).build();
    let mut binding = ReactiveBinding::new(covers_card(CoverGroupType::Open));
    assert!(binding.on_snapshot_update(&current).unwrap().should_render);

    let mut renders = 0;
    for position in [80, 60, 40] {
        current = current.with_state(cover("cover.blind_1", "opening", position));
        let decision = binding.on_snapshot_update(&current).unwrap();
        assert_eq!(decision.display_list, vec!["cover.blind_1"]);
        if decision.should_render {
            renders += 1;
        }
    }
    assert_eq!(renders, 3);
    assert_eq!(
        binding.last_fingerprint().map(|key| key.as_str()),
        Some("cover.blind_1:opening:40")
    );

    // Same position again: nothing moved
    let decision = binding.on_snapshot_update(&current).unwrap();
    assert!(!decision.should_render);
}

#[test]
fn test_closing_cover_stays_in_closed_card() {
    let mut current = Snapshot::builder()
        .state(cover("cover.shutter", "closing", 80).with_attribute("device_class", "shutter"))
        .build();
    let mut binding = ReactiveBinding::new(covers_card(CoverGroupType::Closed));
    binding.on_snapshot_update(&current).unwrap();

    current = current.with_state(
        cover("cover.shutter", "closed", 0).with_attribute("device_class", "shutter"),
    );
    let decision = binding.on_snapshot_update(&current).unwrap();
    assert!(decision.should_render);
    assert_eq!(decision.fingerprint.as_str(), "cover.shutter:closed");
}

#[test]
fn test_membership_key_ignores_position() {
    let a = Snapshot::builder().state(cover("cover.a", "open", 50)).build();
    let b = a.with_state(cover("cover.a", "open", 70));
    let list = vec!["cover.a".to_string()];

    assert_eq!(
        compute_key(&list, &a, KeyStrategy::Membership),
        compute_key(&list, &b, KeyStrategy::Membership)
    );
    // Fully open is not transitional either
    assert_eq!(
        compute_key(&list, &a, KeyStrategy::Transitional),
        compute_key(&list, &b, KeyStrategy::Transitional)
    );
}

#[test]
fn test_registry_change_refreshes_visibility() {
    let snapshot = Snapshot::builder()
        .entity(EntityEntry::new("light.a".parse().unwrap()))
        .entity(EntityEntry::new("light.b".parse().unwrap()))
        .state(state("light.a", "on"))
        .state(state("light.b", "on"))
        .build();
    let mut binding = ReactiveBinding::new(lights_card(LightGroupType::On));
    assert_eq!(binding.on_snapshot_update(&snapshot).unwrap().display_list.len(), 2);

    let relabelled = snapshot.with_entities([
        EntityEntry::new("light.a".parse().unwrap()),
        EntityEntry::new("light.b".parse().unwrap()).with_label("no_dboard"),
    ]);
    let decision = binding.on_snapshot_update(&relabelled).unwrap();
    assert!(decision.should_render);
    assert_eq!(decision.display_list, vec!["light.a"]);
}

#[test]
fn test_burst_uses_newest_snapshot() {
    let first = Snapshot::builder().state(state("light.a", "off")).build();
    let second = first.with_state(state("light.a", "on"));
    let third = second.with_state(state("light.b", "on"));

    let mut binding = ReactiveBinding::new(lights_card(LightGroupType::On));
    let decision = binding
        .on_snapshot_burst([&first, &second, &third])
        .unwrap()
        .expect("non-empty burst decides");
    assert!(decision.should_render);
    assert_eq!(decision.display_list.len(), 2);
    assert_eq!(binding.state(), BindingState::Bound);
}

#[test]
fn test_detached_binding_rejects_updates() {
    let snapshot = home_snapshot();
    let mut binding = ReactiveBinding::new(lights_card(LightGroupType::Off));
    binding.on_snapshot_update(&snapshot).unwrap();
    binding.detach();

    assert_eq!(binding.state(), BindingState::Detached);
    assert_eq!(binding.on_snapshot_update(&snapshot), Err(BindingError::Detached));
    assert_eq!(binding.on_snapshot_burst([&snapshot]), Err(BindingError::Detached));
}

#[test]
fn test_summary_card_counts_from_host_config() {
    let card = SummaryCard::from_value(&json!({ "summary_type": "security" })).unwrap();
    let mut binding = ReactiveBinding::new(card);
    let snapshot = home_snapshot();

    let decision = binding.on_snapshot_update(&snapshot).unwrap();
    assert_eq!(decision.display_list.len(), 3);
    assert_eq!(decision.fingerprint.as_str(), "3");
    assert_eq!(binding.surface().display(3).label, "3 unsafe");

    // Locking the door changes the count
    let locked = snapshot.with_state(state("lock.front_door", "locked"));
    let decision = binding.on_snapshot_update(&locked).unwrap();
    assert!(decision.should_render);
    assert_eq!(decision.fingerprint.as_str(), "2");
}

#[test]
fn test_batteries_summary_exemptions() {
    let card = SummaryCard::from_value(&json!({ "summary_type": "batteries" })).unwrap();
    let mut binding = ReactiveBinding::new(card);
    let decision = binding.on_snapshot_update(&home_snapshot()).unwrap();

    // hidden_by and diagnostic batteries stay, an explicit hide does not
    assert_eq!(
        decision.display_list,
        vec!["sensor.thermo_battery", "sensor.diagnostic_battery"]
    );
}

#[test]
fn test_covers_card_names_and_batch() {
    let snapshot = home_snapshot();
    let mut binding = ReactiveBinding::new(covers_card(CoverGroupType::Open));
    let decision = binding.on_snapshot_update(&snapshot).unwrap();
    assert_eq!(decision.display_list, vec!["cover.living_room_shutter"]);

    let content = binding
        .surface()
        .render(&decision.display_list, &snapshot)
        .expect("one open cover");
    assert_eq!(content.heading.heading, "Open covers (1)");
    assert_eq!(content.tiles[0].name.as_deref(), Some("Living Room"));
    assert_eq!(binding.surface().name(), "covers_open");

    let command = binding
        .surface()
        .batch_command(&decision.display_list)
        .expect("non-empty target");
    assert_eq!(command.action, "cover.close_cover");
    assert_eq!(command.target_entity_ids, vec!["cover.living_room_shutter"]);
}
