//! Home Assistant Registries
//!
//! Read-only views of the host registries as the dashboard receives them:
//! - Entities (EntityEntry)
//! - Devices (DeviceEntry)
//! - Areas (AreaEntry)
//!
//! bundled with live states into a [`Snapshot`]. The host owns these records;
//! nothing here mutates or persists them.

pub mod area_registry;
pub mod device_registry;
pub mod entity_registry;
pub mod snapshot;

// Re-export main types
pub use area_registry::AreaEntry;
pub use device_registry::DeviceEntry;
pub use entity_registry::{DisabledBy, EntityCategory, EntityEntry, HiddenBy};
pub use snapshot::{EntitySet, Snapshot, SnapshotBuilder, SnapshotError};
