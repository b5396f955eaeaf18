//! Point-in-time read of the host registries plus live states
//!
//! A [`Snapshot`] is immutable. The registry half (entities, devices, areas)
//! and the state half are reference counted separately so a state push can
//! produce a new snapshot that still shares the registry maps. Consumers use
//! [`Snapshot::same_entity_set`] to tell a plain state update from a registry
//! change that invalidates visibility and classification.

use std::sync::Arc;

use ha_core::State;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{AreaEntry, DeviceEntry, EntityEntry};

/// Snapshot ingestion errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot root must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("snapshot section '{section}' must be an object or array, found {found}")]
    InvalidSection {
        section: &'static str,
        found: &'static str,
    },
}

#[derive(Debug, Default)]
struct RegistryMaps {
    entities: IndexMap<String, EntityEntry>,
    devices: IndexMap<String, DeviceEntry>,
    areas: IndexMap<String, AreaEntry>,
}

/// Handle on a snapshot's registry half
///
/// Keeps the maps alive, so comparing against a later snapshot can never
/// mistake a reused allocation for the same registry.
#[derive(Debug, Clone)]
pub struct EntitySet(Arc<RegistryMaps>);

impl EntitySet {
    /// True if `snapshot` still carries this exact registry
    pub fn is_current(&self, snapshot: &Snapshot) -> bool {
        Arc::ptr_eq(&self.0, &snapshot.registry)
    }
}

/// Registry maps plus live states, read-only
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    registry: Arc<RegistryMaps>,
    states: Arc<IndexMap<String, State>>,
}

impl Snapshot {
    /// Start building a snapshot from typed records
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    /// Ingest the host's JSON shape
    ///
    /// ```json
    /// { "entities": {...}, "devices": {...}, "areas": {...}, "states": {...} }
    /// ```
    ///
    /// Every section may be an object keyed by id or an array of records, and
    /// may be missing. Records that fail to deserialize are dropped with a
    /// warning; the rest of the snapshot is kept.
    pub fn from_json(value: &Value) -> Result<Self, SnapshotError> {
        let root = value.as_object().ok_or(SnapshotError::NotAnObject {
            found: json_type(value),
        })?;

        let entities: Vec<EntityEntry> = read_section(root, "entities", "entity_id")?;
        let devices: Vec<DeviceEntry> = read_section(root, "devices", "id")?;
        let areas: Vec<AreaEntry> = read_section(root, "areas", "area_id")?;
        let states: Vec<State> = read_section(root, "states", "entity_id")?;

        debug!(
            entities = entities.len(),
            devices = devices.len(),
            areas = areas.len(),
            states = states.len(),
            "Ingested snapshot"
        );

        Ok(SnapshotBuilder {
            entities,
            devices,
            areas,
            states,
        }
        .build())
    }

    /// New snapshot with fresh live states and the same registry
    pub fn with_states(&self, states: impl IntoIterator<Item = State>) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            states: Arc::new(index_states(states)),
        }
    }

    /// New snapshot with one state replaced or added
    pub fn with_state(&self, state: State) -> Self {
        let mut states = (*self.states).clone();
        states.insert(state.entity_id.to_string(), state);
        Self {
            registry: Arc::clone(&self.registry),
            states: Arc::new(states),
        }
    }

    /// New snapshot with a replaced entity registry
    ///
    /// Devices, areas and states carry over, but the result never counts as
    /// the same entity set as `self`.
    pub fn with_entities(&self, entities: impl IntoIterator<Item = EntityEntry>) -> Self {
        let registry = RegistryMaps {
            entities: entities
                .into_iter()
                .map(|entry| (entry.entity_id.to_string(), entry))
                .collect(),
            devices: self.registry.devices.clone(),
            areas: self.registry.areas.clone(),
        };
        Self {
            registry: Arc::new(registry),
            states: Arc::clone(&self.states),
        }
    }

    /// True if both snapshots share the same registry maps
    pub fn same_entity_set(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.registry, &other.registry)
    }

    /// Handle for later [`EntitySet::is_current`] checks
    pub fn entity_set(&self) -> EntitySet {
        EntitySet(Arc::clone(&self.registry))
    }

    pub fn entity(&self, entity_id: &str) -> Option<&EntityEntry> {
        self.registry.entities.get(entity_id)
    }

    pub fn state(&self, entity_id: &str) -> Option<&State> {
        self.states.get(entity_id)
    }

    pub fn device(&self, device_id: &str) -> Option<&DeviceEntry> {
        self.registry.devices.get(device_id)
    }

    pub fn area(&self, area_id: &str) -> Option<&AreaEntry> {
        self.registry.areas.get(area_id)
    }

    /// Registered entities in ingestion order
    pub fn entities(&self) -> impl Iterator<Item = &EntityEntry> {
        self.registry.entities.values()
    }

    /// Live states in ingestion order
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }

    pub fn devices(&self) -> impl Iterator<Item = &DeviceEntry> {
        self.registry.devices.values()
    }

    pub fn areas(&self) -> impl Iterator<Item = &AreaEntry> {
        self.registry.areas.values()
    }

    /// IDs of every entity known to either the registry or the state map
    ///
    /// Registry order first, then state-only entities in state order.
    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        let registered = self.registry.entities.keys();
        let state_only = self
            .states
            .keys()
            .filter(|id| !self.registry.entities.contains_key(id.as_str()));
        registered.chain(state_only).map(String::as_str)
    }

    /// Area of an entity, directly assigned or inherited from its device
    pub fn area_of(&self, entity_id: &str) -> Option<&str> {
        let entry = self.entity(entity_id)?;
        if let Some(area_id) = entry.area_id.as_deref() {
            return Some(area_id);
        }
        entry
            .device_id
            .as_deref()
            .and_then(|device_id| self.device(device_id))
            .and_then(|device| device.area_id.as_deref())
    }

    /// Device of an entity, if registered
    pub fn device_of(&self, entity_id: &str) -> Option<&DeviceEntry> {
        self.entity(entity_id)?
            .device_id
            .as_deref()
            .and_then(|device_id| self.device(device_id))
    }

    /// Registered entities attached to `device_id`
    pub fn entities_of_device<'a>(
        &'a self,
        device_id: &'a str,
    ) -> impl Iterator<Item = &'a EntityEntry> + 'a {
        self.entities()
            .filter(move |entry| entry.device_id.as_deref() == Some(device_id))
    }

    pub fn entity_count(&self) -> usize {
        self.registry.entities.len()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

/// Collects typed records into a [`Snapshot`]
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    entities: Vec<EntityEntry>,
    devices: Vec<DeviceEntry>,
    areas: Vec<AreaEntry>,
    states: Vec<State>,
}

impl SnapshotBuilder {
    pub fn entity(mut self, entry: EntityEntry) -> Self {
        self.entities.push(entry);
        self
    }

    pub fn device(mut self, entry: DeviceEntry) -> Self {
        self.devices.push(entry);
        self
    }

    pub fn area(mut self, entry: AreaEntry) -> Self {
        self.areas.push(entry);
        self
    }

    pub fn state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// Later records with the same id replace earlier ones
    pub fn build(self) -> Snapshot {
        let registry = RegistryMaps {
            entities: self
                .entities
                .into_iter()
                .map(|entry| (entry.entity_id.to_string(), entry))
                .collect(),
            devices: self
                .devices
                .into_iter()
                .map(|entry| (entry.id.clone(), entry))
                .collect(),
            areas: self
                .areas
                .into_iter()
                .map(|entry| (entry.area_id.clone(), entry))
                .collect(),
        };
        Snapshot {
            registry: Arc::new(registry),
            states: Arc::new(index_states(self.states)),
        }
    }
}

fn index_states(states: impl IntoIterator<Item = State>) -> IndexMap<String, State> {
    states
        .into_iter()
        .map(|state| (state.entity_id.to_string(), state))
        .collect()
}

fn read_section<T: DeserializeOwned>(
    root: &Map<String, Value>,
    section: &'static str,
    id_field: &str,
) -> Result<Vec<T>, SnapshotError> {
    let records: Vec<(Option<&str>, &Value)> = match root.get(section) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(map)) => map.iter().map(|(k, v)| (Some(k.as_str()), v)).collect(),
        Some(Value::Array(items)) => items.iter().map(|v| (None, v)).collect(),
        Some(other) => {
            return Err(SnapshotError::InvalidSection {
                section,
                found: json_type(other),
            })
        }
    };

    let mut parsed = Vec::with_capacity(records.len());
    for (key, raw) in records {
        let mut record = raw.clone();
        // Keyed maps may omit the id inside the record
        if let (Some(key), Value::Object(fields)) = (key, &mut record) {
            fields
                .entry(id_field.to_string())
                .or_insert_with(|| Value::String(key.to_string()));
        }

        match serde_json::from_value::<T>(record) {
            Ok(item) => parsed.push(item),
            Err(e) => warn!(
                section,
                key = key.unwrap_or("<array item>"),
                error = %e,
                "Dropping malformed snapshot record"
            ),
        }
    }
    Ok(parsed)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
