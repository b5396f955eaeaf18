//! Shared helpers for the dashboard integration tests

#![allow(dead_code)]

use std::path::Path;
use std::sync::Once;

use ha_core::State;
use ha_registries::Snapshot;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test subscriber once per binary; `RUST_LOG` picks the level
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Load a fixture from `tests/fixtures/` as JSON
pub fn load_json_fixture(name: &str) -> serde_json::Value {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture '{}' from {:?}: {}", name, path, e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture '{}' as JSON: {}", name, e))
}

/// The sample home: two areas, lights, covers, locks, batteries and people
pub fn home_snapshot() -> Snapshot {
    Snapshot::from_json(&load_json_fixture("home.json")).expect("fixture is a valid snapshot")
}

pub fn state(entity_id: &str, value: &str) -> State {
    State::new(entity_id.parse().expect("valid entity id"), value)
}

/// A cover state with a position attribute
pub fn cover(entity_id: &str, value: &str, position: u8) -> State {
    state(entity_id, value).with_attribute("current_position", position)
}
