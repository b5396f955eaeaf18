//! Dashboard layout
//!
//! Pure functions from a [`Snapshot`] and a [`DashboardConfig`] to the
//! Lovelace document: the overview, the four utility views and one view per
//! visible area.

mod areas;
pub mod lovelace;
mod overview;
mod room;
mod utility;

pub use areas::{entities_in_area, visible_areas};
pub use lovelace::{Card, Dashboard, Section, View};
pub use overview::{find_weather_entity, overview_view, person_badges, OVERVIEW_PATH};
pub use room::room_view;
pub use utility::{batteries_view, covers_view, lights_view, security_view, utility_views, LOW_BATTERY};

use ha_dashboard_config::DashboardConfig;
use ha_registries::Snapshot;
use tracing::{info, instrument, warn};

/// Build the whole dashboard
///
/// Views come in navigation order: overview, lights, covers, security,
/// batteries, then the visible areas.
#[instrument(skip_all, fields(entities = snapshot.entity_count(), states = snapshot.state_count()))]
pub fn build_dashboard(snapshot: &Snapshot, config: &DashboardConfig) -> Dashboard {
    if config.group_by_floors {
        warn!("group_by_floors is set but floors are not in the snapshot; laying out flat");
    }
    let areas = visible_areas(snapshot, &config.areas_display);

    let mut views = Vec::with_capacity(5 + areas.len());
    views.push(overview_view(snapshot, config, &areas));
    views.extend(utility_views(snapshot, config));
    views.extend(areas.iter().map(|area| room_view(snapshot, config, area)));

    info!(views = views.len(), areas = areas.len(), "Built dashboard");
    Dashboard {
        title: config.title.clone(),
        views,
    }
}
