use ha_core::domains::{self, services};
use ha_core::BatchCommand;
use ha_dashboard_config::{ConfigResult, CoverGroupType, CoversGroupCardConfig};
use ha_registries::Snapshot;
use serde_json::Value;
use tracing::debug;

use crate::binding::Surface;
use crate::cards::GroupCardContent;
use crate::classifier::{classify, CoverScheme};
use crate::filter::{select, SortOrder, StatePredicate};
use crate::fingerprint::KeyStrategy;
use crate::group::GroupName;
use crate::layout::lovelace::{EntityBadge, Feature, HeadingCard, StateContent, TileCard};
use crate::naming::{display_name, strip_cover_type};
use crate::visibility::VisibilityPolicy;

/// Open covers (`open`, `opening`) or closed ones (`closed`, `closing`)
///
/// Keys on position while a cover moves, so the card follows a travelling
/// cover tick by tick.
#[derive(Debug, Clone)]
pub struct CoversGroupCard {
    config: CoversGroupCardConfig,
    scheme: CoverScheme,
    policy: VisibilityPolicy,
}

impl CoversGroupCard {
    pub fn new(config: CoversGroupCardConfig) -> Self {
        let scheme = CoverScheme::new(config.device_classes.clone());
        Self {
            config,
            scheme,
            policy: VisibilityPolicy::default(),
        }
    }

    /// Build from a raw card config; fails without `group_type`
    pub fn from_value(value: &Value) -> ConfigResult<Self> {
        CoversGroupCardConfig::from_value(value).map(Self::new)
    }

    pub fn group_type(&self) -> CoverGroupType {
        self.config.group_type
    }

    fn predicate(&self) -> StatePredicate {
        match self.config.group_type {
            CoverGroupType::Open => StatePredicate::OPEN,
            CoverGroupType::Closed => StatePredicate::CLOSED,
        }
    }

    /// Close every listed cover if the card shows open ones, else open them
    pub fn batch_command(&self, covers: &[String]) -> Option<BatchCommand> {
        let service = match self.config.group_type {
            CoverGroupType::Open => services::CLOSE_COVER,
            CoverGroupType::Closed => services::OPEN_COVER,
        };
        BatchCommand::new(domains::COVER, service, covers.to_vec()).ok()
    }

    /// Content for `covers`; `None` hides the card
    pub fn render(&self, covers: &[String], snapshot: &Snapshot) -> Option<GroupCardContent> {
        if covers.is_empty() {
            return None;
        }

        let count = covers.len();
        let (heading, batch_icon) = match self.config.group_type {
            CoverGroupType::Open => (
                HeadingCard::title(format!("Open covers ({count})")).icon("mdi:window-shutter-open"),
                "mdi:arrow-down",
            ),
            CoverGroupType::Closed => (
                HeadingCard::subtitle(format!("Closed covers ({count})")).icon("mdi:window-shutter"),
                "mdi:arrow-up",
            ),
        };
        let heading = match self
            .batch_command(covers)
            .and_then(|command| EntityBadge::batch(command, batch_icon))
        {
            Some(badge) => heading.badge(badge),
            None => heading,
        };

        let tiles = covers
            .iter()
            .map(|entity_id| {
                TileCard::new(entity_id.as_str())
                    .name(strip_cover_type(&display_name(entity_id, snapshot)))
                    .horizontal()
                    .inline_feature(Feature::CoverOpenClose)
                    .state_content(StateContent::many(&["current_position", "last_changed"]))
            })
            .collect();

        Some(GroupCardContent { heading, tiles })
    }
}

impl Surface for CoversGroupCard {
    fn name(&self) -> &str {
        match self.config.group_type {
            CoverGroupType::Open => "covers_open",
            CoverGroupType::Closed => "covers_closed",
        }
    }

    fn key_strategy(&self) -> KeyStrategy {
        KeyStrategy::Transitional
    }

    fn refresh(&mut self, snapshot: &Snapshot) {
        self.policy = VisibilityPolicy::for_groups(
            snapshot,
            &self.config.config,
            &[GroupName::Covers, GroupName::CoversCurtain],
        );
        debug!(group_type = ?self.config.group_type, "Refreshed covers group card");
    }

    fn display_list(&self, snapshot: &Snapshot) -> Vec<String> {
        let covers = classify(&self.scheme, snapshot.entity_ids(), snapshot, &self.policy)
            .take(GroupName::Covers);
        select(&covers, snapshot, self.predicate(), SortOrder::LastChanged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ha_core::State;
    use serde_json::json;

    fn cover(id: &str, value: &str, class: Option<&str>) -> State {
        let state = State::new(id.parse().unwrap(), value);
        match class {
            Some(class) => state.with_attribute("device_class", class),
            None => state,
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot::builder()
            .state(cover("cover.living_blind", "open", Some("blind")))
            .state(cover("cover.attic", "opening", None))
            .state(cover("cover.garage", "open", Some("garage")))
            .state(cover("cover.bedroom_shutter", "closing", Some("shutter")))
            .build()
    }

    fn card(value: Value) -> CoversGroupCard {
        let mut card = CoversGroupCard::from_value(&value).unwrap();
        card.refresh(&snapshot());
        card
    }

    #[test]
    fn test_open_and_closed_split() {
        let snapshot = snapshot();
        let open = card(json!({ "group_type": "open" }));
        assert_eq!(
            open.display_list(&snapshot),
            vec!["cover.living_blind", "cover.attic"]
        );

        let closed = card(json!({ "group_type": "closed" }));
        assert_eq!(closed.display_list(&snapshot), vec!["cover.bedroom_shutter"]);
    }

    #[test]
    fn test_configured_classes() {
        let snapshot = snapshot();
        let open = card(json!({ "group_type": "open", "device_classes": ["garage"] }));
        assert_eq!(open.display_list(&snapshot), vec!["cover.attic", "cover.garage"]);
    }

    #[test]
    fn test_render_strips_cover_terms() {
        let snapshot = Snapshot::builder()
            .state(
                cover("cover.a", "open", Some("blind"))
                    .with_attribute("friendly_name", "Rollo Wohnzimmer"),
            )
            .build();
        let open = card(json!({ "group_type": "open" }));
        let content = open.render(&["cover.a".to_string()], &snapshot).unwrap();

        assert_eq!(content.heading.heading, "Open covers (1)");
        assert_eq!(content.tiles[0].name.as_deref(), Some("Wohnzimmer"));
        assert_eq!(
            open.batch_command(&["cover.a".to_string()]).unwrap().action,
            "cover.close_cover"
        );
    }
}
