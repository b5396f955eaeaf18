//! One view per area

use ha_core::{domain_of, domains, State};
use ha_dashboard_config::{AreaOptions, DashboardConfig};
use ha_registries::{AreaEntry, Snapshot};
use tracing::{debug, instrument};

use crate::cards::CRITICAL_BATTERY;
use crate::classifier::{classify, Classification, ROOM};
use crate::filter::{sort_by_explicit_order, sort_by_last_changed, StatePredicate};
use crate::group::GroupName;
use crate::layout::areas::entities_in_area;
use crate::layout::lovelace::{
    Card, EntityBadge, Feature, GlanceEntity, HeadingCard, PictureEntityCard, PictureGlanceCard,
    Section, StateContent, TileCard, View, ViewHeader,
};
use crate::naming::{display_name, strip_area_name};
use crate::visibility::VisibilityPolicy;

/// Camera vendor whose devices get a glance card with their companions
const GLANCE_VENDOR: &str = "reolink";

struct RoomContext<'a> {
    snapshot: &'a Snapshot,
    area: &'a AreaEntry,
    policy: VisibilityPolicy,
    groups: Classification,
}

impl<'a> RoomContext<'a> {
    fn name(&self, entity_id: &str) -> String {
        strip_area_name(&display_name(entity_id, self.snapshot), &self.area.name)
    }

    fn tile(&self, entity_id: &str) -> TileCard {
        TileCard::new(entity_id).name(self.name(entity_id)).horizontal()
    }

    fn state(&self, entity_id: &str) -> Option<&'a State> {
        self.snapshot.state(entity_id)
    }

    fn first_where(&self, group: GroupName, predicate: StatePredicate) -> Option<&str> {
        self.groups
            .get(group)
            .iter()
            .find(|id| self.state(id).is_some_and(|s| predicate.matches(s)))
            .map(String::as_str)
    }

    fn first(&self, group: GroupName) -> Option<&str> {
        self.groups.get(group).first().map(String::as_str)
    }

    /// The area's configured sensor if it is usable, else `fallback`
    fn preferred(&self, configured: Option<&'a str>, fallback: GroupName) -> Option<&str> {
        configured
            .filter(|id| self.policy.is_visible(id, self.snapshot))
            .or_else(|| self.first(fallback))
    }
}

/// Drop the members the area hides in `group`, then apply its custom order
fn apply_group_options(members: &mut Vec<String>, options: Option<&AreaOptions>, group: GroupName) {
    let Some(group_options) = options.and_then(|o| o.group(group.as_str())) else {
        return;
    };
    members.retain(|id| !group_options.is_hidden(id));
    if group_options.has_order() {
        sort_by_explicit_order(members, &group_options.order);
    }
}

fn badges(ctx: &RoomContext<'_>) -> Vec<EntityBadge> {
    let candidates = [
        (
            ctx.preferred(ctx.area.temperature_entity_id.as_deref(), GroupName::Temperature),
            "red",
        ),
        (
            ctx.preferred(ctx.area.humidity_entity_id.as_deref(), GroupName::Humidity),
            "indigo",
        ),
        (ctx.first(GroupName::Pm25), "orange"),
        (ctx.first(GroupName::Pm10), "orange"),
        (ctx.first(GroupName::Co2), "green"),
        (ctx.first(GroupName::Voc), "purple"),
        (ctx.first_where(GroupName::Motion, StatePredicate::ON), "yellow"),
        (ctx.first_where(GroupName::Occupancy, StatePredicate::ON), "cyan"),
        (ctx.first(GroupName::Illuminance), "amber"),
        (
            ctx.first_where(GroupName::Battery, StatePredicate::Below(CRITICAL_BATTERY)),
            "red",
        ),
    ];

    candidates
        .into_iter()
        .filter_map(|(entity_id, color)| {
            entity_id.map(|id| EntityBadge::new(id).color(color).more_info())
        })
        .collect()
}

/// First companion entity of `device_id` in `domain` that passes `accept`
fn companion<'s>(
    snapshot: &'s Snapshot,
    policy: &VisibilityPolicy,
    device_id: &'s str,
    domain: &str,
    accept: impl Fn(&State) -> bool,
) -> Option<&'s str> {
    snapshot
        .entities_of_device(device_id)
        .map(|entry| entry.entity_id.as_str())
        .filter(|id| domain_of(id) == domain)
        .find(|id| policy.check(id, snapshot).is_ok_and(|state| accept(state)))
}

fn camera_card(ctx: &RoomContext<'_>, camera_id: &str) -> Card {
    let glance_device = ctx
        .snapshot
        .device_of(camera_id)
        .filter(|device| device.is_made_by(GLANCE_VENDOR));

    match glance_device {
        Some(device) => {
            let (snapshot, policy) = (ctx.snapshot, &ctx.policy);
            let entities = [
                companion(snapshot, policy, &device.id, domains::LIGHT, |_| true),
                companion(snapshot, policy, &device.id, domains::BINARY_SENSOR, |s| {
                    s.device_class() == Some("motion")
                }),
                companion(snapshot, policy, &device.id, domains::SIREN, |_| true),
            ]
            .into_iter()
            .flatten()
            .map(|entity| GlanceEntity {
                entity: entity.to_string(),
            })
            .collect();

            Card::PictureGlance(PictureGlanceCard {
                camera_image: camera_id.to_string(),
                camera_view: "auto".to_string(),
                fit_mode: Some("cover".to_string()),
                title: Some(ctx.name(camera_id)),
                entities,
            })
        }
        None => Card::PictureEntity(PictureEntityCard {
            entity: camera_id.to_string(),
            camera_image: camera_id.to_string(),
            camera_view: "auto".to_string(),
            name: Some(ctx.name(camera_id)),
            show_name: true,
            show_state: false,
        }),
    }
}

fn section<I>(heading: &str, icon: &str, cards: I) -> Section
where
    I: IntoIterator,
    I::Item: Into<Card>,
{
    let mut section = Section::titled(HeadingCard::title(heading).icon(icon));
    section.extend(cards);
    if section.content_len() == 0 {
        Section::default()
    } else {
        section
    }
}

/// Room view for `area`
///
/// Sections in order: cameras, lights, climate, covers, curtains, media,
/// scenes, misc (vacuums, fans and switches by last change), room pins.
#[instrument(skip_all, fields(area = %area.area_id))]
pub fn room_view(snapshot: &Snapshot, config: &DashboardConfig, area: &AreaEntry) -> View {
    let policy = VisibilityPolicy::unfiltered(snapshot);
    let members = entities_in_area(snapshot, &area.area_id);
    let mut groups = classify(&ROOM, members, snapshot, &policy);
    debug!(entities = groups.total(), "Classified room");

    let options = config.area_options(&area.area_id);
    let mut take = |group: GroupName| {
        let mut members = groups.take(group);
        apply_group_options(&mut members, options, group);
        members
    };
    let cameras = take(GroupName::Cameras);
    let mut lights = take(GroupName::Lights);
    let climate = take(GroupName::Climate);
    let covers = take(GroupName::Covers);
    let curtains = take(GroupName::CoversCurtain);
    let media = take(GroupName::MediaPlayer);
    let scenes = take(GroupName::Scenes);
    let mut misc: Vec<String> = [GroupName::Vacuum, GroupName::Fan, GroupName::Switches]
        .into_iter()
        .flat_map(&mut take)
        .collect();

    let lights_ordered = options
        .and_then(|o| o.group(GroupName::Lights.as_str()))
        .is_some_and(|o| o.has_order());
    if !lights_ordered {
        sort_by_last_changed(&mut lights, snapshot);
    }
    sort_by_last_changed(&mut misc, snapshot);

    // What is left are the sensor categories
    let ctx = RoomContext {
        snapshot,
        area,
        policy,
        groups,
    };

    let mut view = View::new(area.name.as_str(), area.area_id.as_str())
        .icon(area.icon.as_deref().unwrap_or("mdi:floor-plan"))
        .subview(!config.show_room_views);
    view.header = Some(ViewHeader {
        badges_position: Some("bottom".to_string()),
        ..ViewHeader::default()
    });
    view.badges = badges(&ctx);

    view.push_section(section(
        "Cameras",
        "mdi:cctv",
        cameras.iter().map(|id| camera_card(&ctx, id)),
    ));
    view.push_section(section(
        "Lights",
        "mdi:lightbulb",
        lights.iter().map(|id| {
            ctx.tile(id)
                .inline_feature(Feature::LightBrightness)
                .state_content(StateContent::last_changed())
        }),
    ));
    view.push_section(section(
        "Climate",
        "mdi:thermostat",
        climate.iter().map(|id| {
            ctx.tile(id)
                .inline_feature(Feature::ClimateHvacModes)
                .state_content(StateContent::many(&["hvac_action", "current_temperature"]))
        }),
    ));
    let cover_tile = |id: &String| {
        ctx.tile(id)
            .inline_feature(Feature::CoverOpenClose)
            .state_content(StateContent::many(&["current_position", "last_changed"]))
    };
    view.push_section(section("Covers", "mdi:window-shutter", covers.iter().map(cover_tile)));
    view.push_section(section("Curtains", "mdi:curtains", curtains.iter().map(cover_tile)));
    view.push_section(section(
        "Media",
        "mdi:speaker",
        media.iter().map(|id| {
            ctx.tile(id)
                .inline_feature(Feature::MediaPlayerPlayback)
                .state_content(StateContent::many(&["media_title", "media_artist"]))
        }),
    ));
    view.push_section(section(
        "Scenes",
        "mdi:palette",
        scenes
            .iter()
            .map(|id| ctx.tile(id).state_content(StateContent::last_changed())),
    ));
    view.push_section(section(
        "Misc",
        "mdi:dots-horizontal",
        misc.iter().map(|id| {
            let tile = match domain_of(id) {
                domains::VACUUM => ctx.tile(id).inline_feature(Feature::VacuumCommands),
                domains::FAN => ctx.tile(id).inline_feature(Feature::FanSpeed),
                _ => ctx.tile(id),
            };
            tile.state_content(StateContent::last_changed())
        }),
    ));

    let pins = config
        .room_pin_entities
        .iter()
        .filter(|id| snapshot.area_of(id) == Some(area.area_id.as_str()));
    view.push_section(section(
        "Room pins",
        "mdi:pin",
        pins.map(|id| ctx.tile(id).state_content(StateContent::last_changed())),
    ));

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ha_registries::{DeviceEntry, EntityEntry};
    use serde_json::json;

    fn entry(id: &str) -> EntityEntry {
        EntityEntry::new(id.parse().unwrap()).with_area("kitchen")
    }

    fn state(id: &str, value: &str) -> State {
        State::new(id.parse().unwrap(), value)
    }

    fn kitchen() -> AreaEntry {
        AreaEntry::new("kitchen", "Kitchen").with_temperature_entity("sensor.kitchen_temp")
    }

    fn section_headings(view: &View) -> Vec<String> {
        view.sections
            .iter()
            .filter_map(|s| match s.cards.first() {
                Some(Card::Heading(h)) => Some(h.heading.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_section_order_and_names() {
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap();
        let snapshot = Snapshot::builder()
            .area(kitchen())
            .entity(entry("scene.dinner"))
            .state(state("scene.dinner", "scening"))
            .entity(entry("light.ceiling"))
            .state(
                state("light.ceiling", "on")
                    .with_attribute("friendly_name", "Kitchen Ceiling")
                    .with_last_changed(t1),
            )
            .entity(entry("light.counter"))
            .state(state("light.counter", "off").with_last_changed(t2))
            .entity(entry("switch.kettle"))
            .state(state("switch.kettle", "off"))
            .build();
        let view = room_view(&snapshot, &DashboardConfig::default(), &kitchen());

        assert_eq!(section_headings(&view), vec!["Lights", "Scenes", "Misc"]);
        let lights: Vec<&str> = view.sections[0].cards.iter().filter_map(Card::entity).collect();
        assert_eq!(lights, vec!["light.counter", "light.ceiling"]);
        let Card::Tile(ceiling) = &view.sections[0].cards[2] else {
            panic!("expected tile");
        };
        assert_eq!(ceiling.name.as_deref(), Some("Ceiling"));
        assert!(view.subview);
    }

    #[test]
    fn test_group_options_hide_and_order() {
        let snapshot = Snapshot::builder()
            .area(kitchen())
            .entity(entry("light.a"))
            .state(state("light.a", "on"))
            .entity(entry("light.b"))
            .state(state("light.b", "on"))
            .entity(entry("light.c"))
            .state(state("light.c", "on"))
            .build();
        let config = DashboardConfig::from_json_value(&json!({
            "areas_options": {
                "kitchen": {
                    "groups_options": {
                        "lights": { "hidden": ["light.b"], "order": ["light.c", "light.a"] }
                    }
                }
            }
        }))
        .unwrap();
        let view = room_view(&snapshot, &config, &kitchen());

        let lights: Vec<&str> = view.sections[0].cards.iter().filter_map(Card::entity).collect();
        assert_eq!(lights, vec!["light.c", "light.a"]);
    }

    #[test]
    fn test_badges() {
        let snapshot = Snapshot::builder()
            .area(kitchen())
            .entity(entry("sensor.kitchen_temp"))
            .state(state("sensor.kitchen_temp", "21").with_attribute("device_class", "temperature"))
            .entity(entry("sensor.other_temp"))
            .state(state("sensor.other_temp", "19").with_attribute("unit_of_measurement", "°C"))
            .entity(entry("binary_sensor.motion"))
            .state(state("binary_sensor.motion", "off").with_attribute("device_class", "motion"))
            .entity(entry("sensor.door_battery"))
            .state(state("sensor.door_battery", "9"))
            .build();
        let view = room_view(&snapshot, &DashboardConfig::default(), &kitchen());

        let badges: Vec<(&str, Option<&str>)> = view
            .badges
            .iter()
            .map(|b| (b.entity.as_str(), b.color.as_deref()))
            .collect();
        assert_eq!(
            badges,
            vec![("sensor.kitchen_temp", Some("red")), ("sensor.door_battery", Some("red"))]
        );
    }

    #[test]
    fn test_glance_camera() {
        let snapshot = Snapshot::builder()
            .area(kitchen())
            .device(DeviceEntry::new("cam1").with_area("kitchen").with_manufacturer("Reolink"))
            .entity(EntityEntry::new("camera.yard".parse().unwrap()).with_device("cam1"))
            .state(state("camera.yard", "idle"))
            .entity(EntityEntry::new("light.yard_spot".parse().unwrap()).with_device("cam1"))
            .state(state("light.yard_spot", "off"))
            .entity(EntityEntry::new("binary_sensor.yard_motion".parse().unwrap()).with_device("cam1"))
            .state(state("binary_sensor.yard_motion", "off").with_attribute("device_class", "motion"))
            .entity(EntityEntry::new("siren.yard".parse().unwrap()).with_device("cam1"))
            .state(state("siren.yard", "off"))
            .build();
        let view = room_view(&snapshot, &DashboardConfig::default(), &kitchen());

        let Card::PictureGlance(glance) = &view.sections[0].cards[1] else {
            panic!("expected glance card");
        };
        let entities: Vec<&str> = glance.entities.iter().map(|e| e.entity.as_str()).collect();
        assert_eq!(
            entities,
            vec!["light.yard_spot", "binary_sensor.yard_motion", "siren.yard"]
        );
    }

    #[test]
    fn test_room_pins() {
        let snapshot = Snapshot::builder()
            .area(kitchen())
            .entity(entry("sensor.power"))
            .state(state("sensor.power", "120"))
            .entity(EntityEntry::new("sensor.elsewhere".parse().unwrap()).with_area("hall"))
            .state(state("sensor.elsewhere", "1"))
            .build();
        let config = DashboardConfig {
            room_pin_entities: vec!["sensor.power".into(), "sensor.elsewhere".into()],
            ..DashboardConfig::default()
        };
        let view = room_view(&snapshot, &config, &kitchen());

        assert_eq!(section_headings(&view), vec!["Room pins"]);
        assert_eq!(view.sections[0].content_len(), 1);
    }
}
