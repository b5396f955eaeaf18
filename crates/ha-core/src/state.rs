//! Live state of a single entity as delivered in a host snapshot

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::EntityId;

/// The current state of an entity
///
/// Only the fields the dashboard reads are modelled. Timestamps are parsed
/// leniently: a missing or malformed `last_changed` becomes `None` rather
/// than rejecting the whole state, so ordering code treats it as unknown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    /// The entity this state belongs to
    pub entity_id: EntityId,

    /// The state value (e.g., "on", "open", "23.5", "unavailable")
    pub state: String,

    /// Additional attributes associated with the state
    #[serde(default)]
    pub attributes: HashMap<String, Value>,

    /// When the state value last changed
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_changed: Option<DateTime<Utc>>,

    /// When the state was last written, even if unchanged
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl State {
    /// Create a state with no attributes and no timestamps
    pub fn new(entity_id: EntityId, state: impl Into<String>) -> Self {
        Self {
            entity_id,
            state: state.into(),
            attributes: HashMap::new(),
            last_changed: None,
            last_updated: None,
        }
    }

    /// Set an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Set `last_changed` (and `last_updated`, which is never older)
    pub fn with_last_changed(mut self, at: DateTime<Utc>) -> Self {
        self.last_changed = Some(at);
        self.last_updated = Some(at);
        self
    }

    /// Check if the state value represents an unavailable entity
    pub fn is_unavailable(&self) -> bool {
        self.state == crate::STATE_UNAVAILABLE
    }

    /// Check if the state value represents an unknown state
    pub fn is_unknown(&self) -> bool {
        self.state == crate::STATE_UNKNOWN
    }

    /// Check the state value against a fixed string
    pub fn is(&self, value: &str) -> bool {
        self.state == value
    }

    /// Get an attribute value by key, deserialized into `T`
    pub fn attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Get a string attribute without cloning
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// The `device_class` attribute
    pub fn device_class(&self) -> Option<&str> {
        self.attribute_str("device_class")
    }

    /// The `unit_of_measurement` attribute
    pub fn unit_of_measurement(&self) -> Option<&str> {
        self.attribute_str("unit_of_measurement")
    }

    /// The `friendly_name` attribute
    pub fn friendly_name(&self) -> Option<&str> {
        self.attribute_str("friendly_name")
    }

    /// `entity_category` as reported on the state rather than the registry
    pub fn entity_category(&self) -> Option<&str> {
        self.attribute_str("entity_category")
    }

    /// The state value as a number, using leading-prefix parsing
    pub fn numeric_state(&self) -> Option<f64> {
        parse_numeric_prefix(&self.state)
    }

    /// `current_position` of a cover; 0 when absent or not numeric
    pub fn current_position(&self) -> f64 {
        match self.attributes.get("current_position") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => parse_numeric_prefix(s).unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        // Timestamps are not compared
        self.entity_id == other.entity_id
            && self.state == other.state
            && self.attributes == other.attributes
    }
}

/// Parse a timestamp value as the host sends it: RFC 3339 text or epoch seconds
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_f64()
            .filter(|secs| secs.is_finite())
            .and_then(|secs| DateTime::from_timestamp_millis((secs * 1000.0) as i64)),
        _ => None,
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_timestamp))
}

/// Parse the longest numeric prefix of `text`
///
/// `"15.5 %"` gives 15.5 and `"abc"` gives `None`. Leading whitespace is
/// skipped; an exponent is only consumed when digits follow it.
pub fn parse_numeric_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}
