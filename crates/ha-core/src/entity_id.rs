//! Entity ID type representing a domain.object_id pair

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for invalid entity IDs
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntityIdError {
    #[error("entity_id must contain exactly one '.' separator")]
    InvalidFormat,

    #[error("domain cannot be empty")]
    EmptyDomain,

    #[error("object_id cannot be empty")]
    EmptyObjectId,

    #[error("domain contains invalid characters (lowercase alphanumeric and single underscores only)")]
    InvalidDomainChars,

    #[error("object_id contains invalid characters (lowercase alphanumeric and underscores only)")]
    InvalidObjectIdChars,
}

/// A validated entity ID such as `light.living_room`.
///
/// The full string is kept in one allocation; `domain()` and `object_id()`
/// slice it at the separator, so the value can be used directly as a map key
/// via `as_str()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId {
    raw: String,
    dot: usize,
}

impl EntityId {
    /// Build an entity ID from its two parts
    pub fn new(
        domain: impl AsRef<str>,
        object_id: impl AsRef<str>,
    ) -> Result<Self, EntityIdError> {
        format!("{}.{}", domain.as_ref(), object_id.as_ref()).parse()
    }

    /// The domain, e.g. `light`
    pub fn domain(&self) -> &str {
        &self.raw[..self.dot]
    }

    /// The part after the separator, e.g. `living_room`
    pub fn object_id(&self) -> &str {
        &self.raw[self.dot + 1..]
    }

    /// The full `domain.object_id` string
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when the domain equals `domain`
    pub fn is_domain(&self, domain: &str) -> bool {
        self.domain() == domain
    }

    // `(?!_)[\da-z_]+(?<!_)`
    fn is_valid_object_id(s: &str) -> bool {
        !s.starts_with('_')
            && !s.ends_with('_')
            && s.bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
    }

    // `(?!.+__)(?!_)[\da-z_]+(?<!_)`
    fn is_valid_domain(s: &str) -> bool {
        !s.contains("__") && Self::is_valid_object_id(s)
    }
}

impl FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (domain, object_id) = split_entity_id(s).ok_or(EntityIdError::InvalidFormat)?;
        if object_id.contains('.') {
            return Err(EntityIdError::InvalidFormat);
        }
        if domain.is_empty() {
            return Err(EntityIdError::EmptyDomain);
        }
        if object_id.is_empty() {
            return Err(EntityIdError::EmptyObjectId);
        }
        if !Self::is_valid_domain(domain) {
            return Err(EntityIdError::InvalidDomainChars);
        }
        if !Self::is_valid_object_id(object_id) {
            return Err(EntityIdError::InvalidObjectIdChars);
        }

        Ok(Self {
            raw: s.to_string(),
            dot: domain.len(),
        })
    }
}

impl TryFrom<String> for EntityId {
    type Error = EntityIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> String {
        id.raw
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split a raw entity ID at its first separator without validating it
pub fn split_entity_id(entity_id: &str) -> Option<(&str, &str)> {
    entity_id.split_once('.')
}

/// Domain prefix of a raw entity ID; the whole string when there is no separator
pub fn domain_of(entity_id: &str) -> &str {
    split_entity_id(entity_id).map_or(entity_id, |(domain, _)| domain)
}
