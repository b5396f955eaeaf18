//! Declarative dashboard tree handed to the host's frontend
//!
//! Field names and tag values follow the Lovelace card schema so the tree
//! serializes to exactly what the frontend expects.

use ha_core::BatchCommand;
use ha_dashboard_config::{CoversGroupCardConfig, LightsGroupCardConfig, SummaryCardConfig};
use serde::{Deserialize, Deserializer, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Accept a single entity ID where a list is expected
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrVec {
        String(String),
        Vec(Vec<String>),
    }

    match StringOrVec::deserialize(deserializer)? {
        StringOrVec::String(s) => Ok(vec![s]),
        StringOrVec::Vec(v) => Ok(v),
    }
}

/// Generated dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub title: String,
    pub views: Vec<View>,
}

impl Dashboard {
    pub fn view(&self, path: &str) -> Option<&View> {
        self.views.iter().find(|view| view.path == path)
    }
}

/// A sections view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "sections")]
pub struct View {
    pub title: String,
    pub path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Reachable by navigation only, not listed in the top bar
    #[serde(default, skip_serializing_if = "is_false")]
    pub subview: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_columns: Option<u8>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<EntityBadge>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<ViewHeader>,

    #[serde(default)]
    pub sections: Vec<Section>,
}

impl View {
    pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            icon: None,
            subview: false,
            max_columns: None,
            badges: Vec::new(),
            header: None,
            sections: Vec::new(),
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn subview(mut self, subview: bool) -> Self {
        self.subview = subview;
        self
    }

    /// Append a section unless it has no cards
    pub fn push_section(&mut self, section: Section) {
        if !section.cards.is_empty() {
            self.sections.push(section);
        }
    }

    /// Every card in every section, in order
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.sections.iter().flat_map(|section| section.cards.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewHeader {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badges_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badges_wrap: Option<String>,
}

/// A grid section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "grid")]
pub struct Section {
    pub cards: Vec<Card>,
}

impl Section {
    /// A section opened by a title heading
    pub fn titled(heading: HeadingCard) -> Self {
        Self {
            cards: vec![Card::Heading(heading)],
        }
    }

    pub fn push(&mut self, card: impl Into<Card>) {
        self.cards.push(card.into());
    }

    pub fn extend<I>(&mut self, cards: I)
    where
        I: IntoIterator,
        I::Item: Into<Card>,
    {
        self.cards.extend(cards.into_iter().map(Into::into));
    }

    /// Number of cards that are not headings
    pub fn content_len(&self) -> usize {
        self.cards
            .iter()
            .filter(|card| !matches!(card, Card::Heading(_)))
            .count()
    }
}

/// Every card kind the generator emits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Card {
    Heading(HeadingCard),
    Tile(TileCard),
    PictureGlance(PictureGlanceCard),
    PictureEntity(PictureEntityCard),
    WeatherForecast(WeatherForecastCard),
    EnergyDistribution(EnergyDistributionCard),
    Area(AreaCard),
    #[serde(rename = "custom:lights-group-card")]
    LightsGroup(LightsGroupCardConfig),
    #[serde(rename = "custom:covers-group-card")]
    CoversGroup(CoversGroupCardConfig),
    #[serde(rename = "custom:summary-card")]
    Summary(SummaryCardConfig),
    #[serde(rename = "custom:search-card")]
    Search,
}

impl Card {
    /// Entity the card is about, if it has exactly one
    pub fn entity(&self) -> Option<&str> {
        match self {
            Card::Tile(tile) => Some(&tile.entity),
            Card::PictureEntity(card) => Some(&card.entity),
            Card::PictureGlance(card) => Some(&card.camera_image),
            Card::WeatherForecast(card) => Some(&card.entity),
            _ => None,
        }
    }
}

impl From<HeadingCard> for Card {
    fn from(card: HeadingCard) -> Self {
        Card::Heading(card)
    }
}

impl From<TileCard> for Card {
    fn from(card: TileCard) -> Self {
        Card::Tile(card)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingStyle {
    #[default]
    Title,
    Subtitle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingCard {
    pub heading: String,
    #[serde(default)]
    pub heading_style: HeadingStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Badges on the heading; batch actions live here
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<EntityBadge>,
}

impl HeadingCard {
    pub fn title(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            heading_style: HeadingStyle::Title,
            icon: None,
            badges: Vec::new(),
        }
    }

    pub fn subtitle(heading: impl Into<String>) -> Self {
        Self {
            heading_style: HeadingStyle::Subtitle,
            ..Self::title(heading)
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn badge(mut self, badge: EntityBadge) -> Self {
        self.badges.push(badge);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeaturesPosition {
    Bottom,
    Inline,
}

/// Tile card feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Feature {
    LightBrightness,
    CoverOpenClose,
    CoverPosition,
    LockCommands,
    ClimateHvacModes,
    MediaPlayerPlayback,
    VacuumCommands,
    FanSpeed,
}

/// What a tile shows under its name: one attribute or several
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateContent {
    One(String),
    Many(Vec<String>),
}

impl StateContent {
    pub fn last_changed() -> Self {
        StateContent::One("last_changed".to_string())
    }

    pub fn many(items: &[&str]) -> Self {
        StateContent::Many(items.iter().map(|s| s.to_string()).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileCard {
    pub entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<Feature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features_position: Option<FeaturesPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_content: Option<StateContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tap_action: Option<Action>,
}

impl TileCard {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            name: None,
            icon: None,
            color: None,
            vertical: None,
            features: Vec::new(),
            features_position: None,
            state_content: None,
            tap_action: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn horizontal(mut self) -> Self {
        self.vertical = Some(false);
        self
    }

    /// Add a feature shown inline with the tile
    pub fn inline_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self.features_position = Some(FeaturesPosition::Inline);
        self
    }

    pub fn feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn state_content(mut self, content: StateContent) -> Self {
        self.state_content = Some(content);
        self
    }

    pub fn tap_action(mut self, action: Action) -> Self {
        self.tap_action = Some(action);
        self
    }
}

/// Badge pointing at one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "entity")]
pub struct EntityBadge {
    pub entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_name: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_state: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_icon: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tap_action: Option<Action>,
}

impl EntityBadge {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            name: None,
            icon: None,
            color: None,
            show_name: None,
            show_state: None,
            show_icon: None,
            tap_action: None,
        }
    }

    /// Icon-only badge that fires `command` on tap
    ///
    /// The badge shows the first target; an empty command has no badge.
    pub fn batch(command: BatchCommand, icon: impl Into<String>) -> Option<Self> {
        let first = command.target_entity_ids.first()?.clone();
        Some(Self {
            icon: Some(icon.into()),
            show_name: Some(false),
            show_state: Some(false),
            tap_action: Some(command.into()),
            ..Self::new(first)
        })
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn more_info(mut self) -> Self {
        self.tap_action = Some(Action::MoreInfo);
        self
    }
}

/// Entities an action applies to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTarget {
    #[serde(default, deserialize_with = "string_or_vec")]
    pub entity_id: Vec<String>,
}

/// Tap behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    MoreInfo,
    Navigate {
        navigation_path: String,
    },
    PerformAction {
        perform_action: String,
        target: ActionTarget,
    },
    None,
}

impl Action {
    pub fn navigate(path: impl Into<String>) -> Self {
        Action::Navigate {
            navigation_path: path.into(),
        }
    }
}

impl From<BatchCommand> for Action {
    fn from(command: BatchCommand) -> Self {
        Action::PerformAction {
            perform_action: command.action,
            target: ActionTarget {
                entity_id: command.target_entity_ids,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlanceEntity {
    pub entity: String,
}

/// Camera still with a row of related entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureGlanceCard {
    pub camera_image: String,
    pub camera_view: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub entities: Vec<GlanceEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureEntityCard {
    pub entity: String,
    pub camera_image: String,
    pub camera_view: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub show_name: bool,
    pub show_state: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecastCard {
    pub entity: String,
    pub forecast_type: String,
    pub show_current: bool,
    pub show_forecast: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyDistributionCard {
    pub link_dashboard: bool,
}

/// Area tile linking to the area's room view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaCard {
    pub area: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alert_classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sensor_classes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tile_serializes_to_lovelace() {
        let tile = TileCard::new("light.desk")
            .name("Desk")
            .horizontal()
            .inline_feature(Feature::LightBrightness)
            .state_content(StateContent::last_changed());

        assert_eq!(
            serde_json::to_value(Card::from(tile)).unwrap(),
            json!({
                "type": "tile",
                "entity": "light.desk",
                "name": "Desk",
                "vertical": false,
                "features": [{ "type": "light-brightness" }],
                "features_position": "inline",
                "state_content": "last_changed"
            })
        );
    }

    #[test]
    fn test_batch_badge() {
        let command = BatchCommand::new(
            "cover",
            "close_cover",
            vec!["cover.a".into(), "cover.b".into()],
        )
        .unwrap();
        let badge = EntityBadge::batch(command, "mdi:arrow-down").unwrap();

        assert_eq!(
            serde_json::to_value(&badge).unwrap(),
            json!({
                "type": "entity",
                "entity": "cover.a",
                "icon": "mdi:arrow-down",
                "show_name": false,
                "show_state": false,
                "tap_action": {
                    "action": "perform-action",
                    "perform_action": "cover.close_cover",
                    "target": { "entity_id": ["cover.a", "cover.b"] }
                }
            })
        );
    }

    #[test]
    fn test_section_and_view_tags() {
        let mut view = View::new("Lights", "lights").subview(true);
        view.push_section(Section::default());
        let mut section = Section::titled(HeadingCard::title("On"));
        section.push(TileCard::new("light.a"));
        view.push_section(section);

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["type"], "sections");
        assert_eq!(value["subview"], true);
        assert_eq!(value["sections"].as_array().unwrap().len(), 1);
        assert_eq!(value["sections"][0]["type"], "grid");
        assert_eq!(value["sections"][0]["cards"][0]["heading_style"], "title");
    }

    #[test]
    fn test_search_card_and_target_shorthand() {
        assert_eq!(
            serde_json::to_value(Card::Search).unwrap(),
            json!({ "type": "custom:search-card" })
        );

        let action: Action = serde_json::from_value(json!({
            "action": "perform-action",
            "perform_action": "light.turn_on",
            "target": { "entity_id": "light.a" }
        }))
        .unwrap();
        assert_eq!(
            action,
            Action::PerformAction {
                perform_action: "light.turn_on".into(),
                target: ActionTarget {
                    entity_id: vec!["light.a".into()]
                },
            }
        );
    }
}
