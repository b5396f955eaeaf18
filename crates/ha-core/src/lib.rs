//! Core types for the Home Assistant dashboard engine
//!
//! This crate provides the fundamental types shared by the registry snapshot,
//! the configuration layer and the dashboard engine: EntityId, State, domain
//! constants and BatchCommand.

pub mod domains;
mod entity_id;
mod service_call;
mod state;

pub use entity_id::{domain_of, split_entity_id, EntityId, EntityIdError};
pub use service_call::{BatchCommand, BatchCommandError};
pub use state::{parse_numeric_prefix, parse_timestamp, State};

pub const STATE_ON: &str = "on";
pub const STATE_OFF: &str = "off";
pub const STATE_OPEN: &str = "open";
pub const STATE_OPENING: &str = "opening";
pub const STATE_CLOSED: &str = "closed";
pub const STATE_CLOSING: &str = "closing";
pub const STATE_LOCKED: &str = "locked";
pub const STATE_UNLOCKED: &str = "unlocked";
pub const STATE_HOME: &str = "home";

/// State value of an entity whose integration is not reachable
pub const STATE_UNAVAILABLE: &str = "unavailable";

/// State value of an entity that has not reported yet
pub const STATE_UNKNOWN: &str = "unknown";
