//! The landing view: people, summaries, areas and weather

use ha_core::{domain_of, domains, STATE_HOME};
use ha_dashboard_config::{DashboardConfig, SummaryCardConfig, SummaryType};
use ha_registries::{AreaEntry, Snapshot};
use tracing::debug;

use crate::layout::lovelace::{
    AreaCard, Card, EnergyDistributionCard, EntityBadge, HeadingCard, Section, View, ViewHeader,
    WeatherForecastCard,
};
use crate::naming::{display_name, first_name};
use crate::visibility::VisibilityPolicy;

pub const OVERVIEW_PATH: &str = "home";

/// One badge per visible person, first name only
///
/// People away from home get the accent colour.
pub fn person_badges(snapshot: &Snapshot, policy: &VisibilityPolicy) -> Vec<EntityBadge> {
    snapshot
        .states()
        .map(|state| state.entity_id.as_str())
        .filter(|entity_id| domain_of(entity_id) == domains::PERSON)
        .filter_map(|entity_id| policy.check(entity_id, snapshot).ok().map(|s| (entity_id, s)))
        .map(|(entity_id, state)| {
            let name = display_name(entity_id, snapshot);
            let mut badge = EntityBadge::new(entity_id).name(first_name(&name));
            badge.show_name = Some(true);
            badge.show_state = Some(true);
            badge.show_icon = Some(true);
            if !state.is(STATE_HOME) {
                badge = badge.color("accent");
            }
            badge
        })
        .collect()
}

/// First visible weather entity that is not a config/diagnostic one
pub fn find_weather_entity<'s>(snapshot: &'s Snapshot, policy: &VisibilityPolicy) -> Option<&'s str> {
    snapshot
        .states()
        .map(|state| state.entity_id.as_str())
        .filter(|entity_id| domain_of(entity_id) == domains::WEATHER)
        .find(|entity_id| {
            policy
                .check(entity_id, snapshot)
                .is_ok_and(|state| state.entity_category().is_none())
        })
}

fn summary_section(config: &DashboardConfig) -> Section {
    let mut section = Section::titled(HeadingCard::title("Summary").icon("mdi:home"));
    if config.show_search_card {
        section.push(Card::Search);
    }
    for summary_type in SummaryType::ALL {
        section.push(Card::Summary(SummaryCardConfig::new(summary_type, config.clone())));
    }
    section
}

fn areas_section(areas: &[&AreaEntry]) -> Section {
    let mut section = Section::titled(HeadingCard::title("Areas").icon("mdi:floor-plan"));
    for area in areas {
        section.push(Card::Area(AreaCard {
            area: area.area_id.clone(),
            display_type: Some("compact".to_string()),
            navigation_path: Some(area.area_id.clone()),
            alert_classes: vec!["motion".to_string(), "moisture".to_string()],
            sensor_classes: vec!["temperature".to_string(), "humidity".to_string()],
        }));
    }
    section
}

fn weather_energy_section(weather: Option<&str>, config: &DashboardConfig) -> Section {
    let mut section = Section::default();
    if let Some(entity) = weather.filter(|_| config.show_weather) {
        section.push(HeadingCard::title("Weather").icon("mdi:weather-partly-cloudy"));
        section.push(Card::WeatherForecast(WeatherForecastCard {
            entity: entity.to_string(),
            forecast_type: "daily".to_string(),
            show_current: true,
            show_forecast: true,
        }));
    }
    if config.show_energy {
        section.push(HeadingCard::title("Energy").icon("mdi:lightning-bolt"));
        section.push(Card::EnergyDistribution(EnergyDistributionCard {
            link_dashboard: true,
        }));
    }
    section
}

/// Overview view over the given visible areas
pub fn overview_view(snapshot: &Snapshot, config: &DashboardConfig, areas: &[&AreaEntry]) -> View {
    let policy = VisibilityPolicy::for_all_groups(snapshot, config);
    let badges = person_badges(snapshot, &policy);
    let weather = find_weather_entity(snapshot, &policy);
    debug!(persons = badges.len(), areas = areas.len(), weather = ?weather, "Building overview");

    let mut view = View::new("Overview", OVERVIEW_PATH).icon("mdi:home");
    view.max_columns = Some(3);
    if !badges.is_empty() {
        view.header = Some(ViewHeader {
            layout: Some("center".to_string()),
            badges_position: Some("bottom".to_string()),
            badges_wrap: Some("wrap".to_string()),
        });
    }
    view.badges = badges;

    view.push_section(summary_section(config));
    if !areas.is_empty() {
        view.push_section(areas_section(areas));
    }
    view.push_section(weather_energy_section(weather, config));
    view
}
