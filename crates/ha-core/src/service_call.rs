//! Batch command requests handed back to the host

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domains::is_readonly_domain;
use crate::entity_id::split_entity_id;

/// Reasons a batch command cannot be built
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BatchCommandError {
    #[error("action must be 'domain.service', got '{0}'")]
    InvalidAction(String),

    #[error("domain '{0}' is read-only and has no services")]
    ReadOnlyDomain(String),

    #[error("batch command '{0}' has no targets")]
    NoTargets(String),
}

/// A user-initiated action over many entities at once (e.g. "close all")
///
/// The dashboard never dispatches these itself; the host receives the value
/// and performs the service call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchCommand {
    /// Full service identifier, e.g. `cover.close_cover`
    pub action: String,

    /// Entities the action applies to, in display order
    pub target_entity_ids: Vec<String>,
}

impl BatchCommand {
    /// Build a command for `domain.service` over `targets`
    pub fn new(
        domain: &str,
        service: &str,
        targets: Vec<String>,
    ) -> Result<Self, BatchCommandError> {
        let action = format!("{domain}.{service}");
        if domain.is_empty() || service.is_empty() {
            return Err(BatchCommandError::InvalidAction(action));
        }
        if is_readonly_domain(domain) {
            return Err(BatchCommandError::ReadOnlyDomain(domain.to_string()));
        }
        if targets.is_empty() {
            return Err(BatchCommandError::NoTargets(action));
        }
        Ok(Self {
            action,
            target_entity_ids: targets,
        })
    }

    /// Domain part of the action
    pub fn domain(&self) -> &str {
        split_entity_id(&self.action).map_or("", |(domain, _)| domain)
    }

    /// Service part of the action
    pub fn service(&self) -> &str {
        split_entity_id(&self.action).map_or("", |(_, service)| service)
    }

    /// Service data in the shape the host's service call expects
    pub fn service_data(&self) -> serde_json::Value {
        serde_json::json!({ "entity_id": self.target_entity_ids })
    }
}
