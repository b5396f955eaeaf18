//! Dashboard configuration
//!
//! This crate provides the user-authored options of the generated dashboard:
//!
//! - [`DashboardConfig`] - global toggles, area display order and per-area
//!   per-group hidden/order lists
//! - card configs for the self-updating cards ([`LightsGroupCardConfig`],
//!   [`CoversGroupCardConfig`], [`SummaryCardConfig`])
//! - YAML file loading with `!include` support
//!
//! # Example
//!
//! ```ignore
//! use ha_dashboard_config::load_config;
//!
//! let config = load_config("/config/dashboard.yaml")?;
//! let hidden = config.hidden_for_groups(["covers", "covers_curtain"]);
//! ```

mod card;
mod dashboard_config;
mod error;
mod loader;

pub use card::{
    CoverGroupType, CoversGroupCardConfig, LightGroupType, LightsGroupCardConfig,
    SummaryCardConfig, SummaryType,
};
pub use dashboard_config::{AreaOptions, AreasDisplay, DashboardConfig, GroupOptions};
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, ConfigLoader};
