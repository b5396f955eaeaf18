//! Change keys for display lists
//!
//! A key is compared for equality only. Two snapshots that would render the
//! same list produce the same key; anything that changes what is drawn
//! changes it.

use std::fmt;

use ha_core::{State, STATE_CLOSING, STATE_OPENING};
use ha_registries::Snapshot;
use serde::{Deserialize, Serialize};

/// Opaque comparable summary of a display list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a surface's key is sensitive to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStrategy {
    /// Member IDs in display order
    #[default]
    Membership,
    /// Member IDs plus state, plus position while a member is moving
    Transitional,
    /// Only the number of members
    Count,
}

/// Derive the key of `list` under `strategy`
///
/// The key is order-sensitive: the same members in another order give a
/// different key.
pub fn compute_key(list: &[String], snapshot: &Snapshot, strategy: KeyStrategy) -> Fingerprint {
    let key = match strategy {
        KeyStrategy::Membership => list.join(","),
        KeyStrategy::Count => list.len().to_string(),
        KeyStrategy::Transitional => {
            let mut key = String::new();
            for (i, entity_id) in list.iter().enumerate() {
                if i > 0 {
                    key.push(',');
                }
                push_transitional(&mut key, entity_id, snapshot.state(entity_id));
            }
            key
        }
    };
    Fingerprint(key)
}

fn push_transitional(key: &mut String, entity_id: &str, state: Option<&State>) {
    key.push_str(entity_id);
    let Some(state) = state else {
        return;
    };
    if is_moving(state) {
        key.push_str(&format!(":{}:{}", state.state, state.current_position()));
    } else {
        key.push_str(&format!(":{}", state.state));
    }
}

fn is_moving(state: &State) -> bool {
    state.is(STATE_OPENING) || state.is(STATE_CLOSING)
}
