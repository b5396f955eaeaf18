//! Configs for the self-updating cards
//!
//! Cards are configured from a raw JSON object the way the host passes a
//! card's options. A missing selector key fails construction outright; the
//! card never runs half-configured.

use ha_core::domains::device_class;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dashboard_config::DashboardConfig;
use crate::error::{ConfigError, ConfigResult};

/// Which half of the lights split a card shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightGroupType {
    On,
    Off,
}

/// Which half of the covers split a card shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverGroupType {
    /// `open` and `opening`
    Open,
    /// `closed` and `closing`
    Closed,
}

/// What a summary tile counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryType {
    Lights,
    Covers,
    Security,
    Batteries,
}

impl SummaryType {
    pub const ALL: [SummaryType; 4] = [
        SummaryType::Lights,
        SummaryType::Covers,
        SummaryType::Security,
        SummaryType::Batteries,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryType::Lights => "lights",
            SummaryType::Covers => "covers",
            SummaryType::Security => "security",
            SummaryType::Batteries => "batteries",
        }
    }
}

/// Config of a lights group card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightsGroupCardConfig {
    pub group_type: LightGroupType,

    /// Dashboard options the card takes hidden lists from
    #[serde(default)]
    pub config: DashboardConfig,
}

impl LightsGroupCardConfig {
    pub fn new(group_type: LightGroupType, config: DashboardConfig) -> Self {
        Self { group_type, config }
    }

    pub fn from_value(value: &Value) -> ConfigResult<Self> {
        require_key(value, "group_type", "lights group card")?;
        let mut card: Self = parse(value, "lights group card")?;
        card.config.sanitize();
        Ok(card)
    }
}

/// Config of a covers group card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoversGroupCardConfig {
    pub group_type: CoverGroupType,

    /// Cover device classes the card accepts; covers without a class always pass
    #[serde(default = "default_cover_classes")]
    pub device_classes: Vec<String>,

    #[serde(default)]
    pub config: DashboardConfig,
}

fn default_cover_classes() -> Vec<String> {
    device_class::DEFAULT_SHADE_COVERS
        .iter()
        .map(|class| class.to_string())
        .collect()
}

impl CoversGroupCardConfig {
    pub fn new(group_type: CoverGroupType, config: DashboardConfig) -> Self {
        Self {
            group_type,
            device_classes: default_cover_classes(),
            config,
        }
    }

    pub fn from_value(value: &Value) -> ConfigResult<Self> {
        require_key(value, "group_type", "covers group card")?;
        let mut card: Self = parse(value, "covers group card")?;
        card.config.sanitize();
        Ok(card)
    }
}

/// Config of a summary tile
///
/// The dashboard options sit next to `summary_type` rather than under a
/// nested key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCardConfig {
    pub summary_type: SummaryType,

    #[serde(flatten)]
    pub config: DashboardConfig,
}

impl SummaryCardConfig {
    pub fn new(summary_type: SummaryType, config: DashboardConfig) -> Self {
        Self {
            summary_type,
            config,
        }
    }

    pub fn from_value(value: &Value) -> ConfigResult<Self> {
        require_key(value, "summary_type", "summary card")?;
        let mut card: Self = parse(value, "summary card")?;
        card.config.sanitize();
        Ok(card)
    }
}

fn require_key(value: &Value, key: &'static str, context: &'static str) -> ConfigResult<()> {
    match value.get(key) {
        None | Some(Value::Null) => Err(ConfigError::MissingKey { key, context }),
        Some(_) => Ok(()),
    }
}

fn parse<T: DeserializeOwned>(value: &Value, context: &'static str) -> ConfigResult<T> {
    serde_json::from_value(value.clone()).map_err(|e| ConfigError::ParseJson { context, source: e })
}
