//! Render gating for self-updating surfaces
//!
//! A [`ReactiveBinding`] owns one surface and the key of the last list it
//! rendered. Every snapshot delivery recomputes the surface's display list
//! and key; the surface re-renders only when the key moved.
//!
//! ```text
//! Uninitialized --update--> Bound --update--> Bound
//!       |                     |
//!       +------detach---------+---> Detached
//! ```

use ha_registries::{EntitySet, Snapshot};
use thiserror::Error;
use tracing::{debug, instrument, trace};

use crate::fingerprint::{compute_key, Fingerprint, KeyStrategy};

/// A display surface whose content derives from a snapshot
pub trait Surface {
    /// Short name for logs
    fn name(&self) -> &str;

    /// What the surface's change key is sensitive to
    fn key_strategy(&self) -> KeyStrategy {
        KeyStrategy::Membership
    }

    /// Rebuild anything derived from the registry's entity set
    ///
    /// Called before the first display list and whenever the entity set
    /// changes identity.
    fn refresh(&mut self, snapshot: &Snapshot);

    /// The ordered entity IDs the surface would show for `snapshot`
    fn display_list(&self, snapshot: &Snapshot) -> Vec<String>;
}

/// Errors returned by a binding
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("binding is detached")]
    Detached,
}

/// Lifecycle of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// No snapshot seen yet
    Uninitialized,
    Bound,
    /// Torn down; terminal
    Detached,
}

/// Outcome of one update cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderDecision {
    pub should_render: bool,
    pub display_list: Vec<String>,
    pub fingerprint: Fingerprint,
}

/// Gate between snapshot deliveries and one surface's renders
#[derive(Debug)]
pub struct ReactiveBinding<S> {
    surface: S,
    state: BindingState,
    last_key: Option<Fingerprint>,
    entity_set: Option<EntitySet>,
}

impl<S: Surface> ReactiveBinding<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            state: BindingState::Uninitialized,
            last_key: None,
            entity_set: None,
        }
    }

    pub fn state(&self) -> BindingState {
        self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Key of the last rendered list
    pub fn last_fingerprint(&self) -> Option<&Fingerprint> {
        self.last_key.as_ref()
    }

    /// Process one snapshot delivery
    ///
    /// The first delivery always renders.
    #[instrument(skip_all, fields(surface = self.surface.name()))]
    pub fn on_snapshot_update(&mut self, snapshot: &Snapshot) -> Result<RenderDecision, BindingError> {
        if self.state == BindingState::Detached {
            return Err(BindingError::Detached);
        }

        let stale = self
            .entity_set
            .as_ref()
            .map_or(true, |set| !set.is_current(snapshot));
        if stale {
            debug!("Entity set changed, refreshing surface");
            self.surface.refresh(snapshot);
            self.entity_set = Some(snapshot.entity_set());
        }

        let display_list = self.surface.display_list(snapshot);
        let fingerprint = compute_key(&display_list, snapshot, self.surface.key_strategy());
        let should_render = self.last_key.as_ref() != Some(&fingerprint);

        if should_render {
            trace!(key = %fingerprint, members = display_list.len(), "Key changed, rendering");
            self.last_key = Some(fingerprint.clone());
        } else {
            trace!("Key unchanged, skipping render");
        }
        self.state = BindingState::Bound;

        Ok(RenderDecision {
            should_render,
            display_list,
            fingerprint,
        })
    }

    /// Process a burst of deliveries as one, using only the newest
    ///
    /// Returns `None` for an empty burst.
    pub fn on_snapshot_burst<'a>(
        &mut self,
        burst: impl IntoIterator<Item = &'a Snapshot>,
    ) -> Result<Option<RenderDecision>, BindingError> {
        if self.state == BindingState::Detached {
            return Err(BindingError::Detached);
        }
        match burst.into_iter().last() {
            Some(snapshot) => self.on_snapshot_update(snapshot).map(Some),
            None => Ok(None),
        }
    }

    /// Tear the binding down; every later delivery fails
    pub fn detach(&mut self) {
        debug!(surface = self.surface.name(), "Detaching binding");
        self.state = BindingState::Detached;
        self.last_key = None;
        self.entity_set = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ha_core::State;
    use ha_registries::EntityEntry;

    /// Lights that are on, minus a set read from the registry on refresh
    #[derive(Default)]
    struct OnLights {
        refreshes: usize,
        labelled: Vec<String>,
    }

    impl Surface for OnLights {
        fn name(&self) -> &str {
            "on_lights"
        }

        fn refresh(&mut self, snapshot: &Snapshot) {
            self.refreshes += 1;
            self.labelled = snapshot
                .entities()
                .filter(|e| e.has_label("no_dboard"))
                .map(|e| e.entity_id.to_string())
                .collect();
        }

        fn display_list(&self, snapshot: &Snapshot) -> Vec<String> {
            snapshot
                .states()
                .filter(|s| s.is("on") && !self.labelled.contains(&s.entity_id.to_string()))
                .map(|s| s.entity_id.to_string())
                .collect()
        }
    }

    fn light(id: &str, value: &str) -> State {
        State::new(id.parse().unwrap(), value)
    }

    #[test]
    fn test_first_update_renders() {
        let mut binding = ReactiveBinding::new(OnLights::default());
        assert_eq!(binding.state(), BindingState::Uninitialized);

        let decision = binding.on_snapshot_update(&Snapshot::default()).unwrap();
        assert!(decision.should_render);
        assert!(decision.display_list.is_empty());
        assert_eq!(binding.state(), BindingState::Bound);
    }

    #[test]
    fn test_unchanged_key_skips_render() {
        let base = Snapshot::builder().state(light("light.a", "on")).build();
        let mut binding = ReactiveBinding::new(OnLights::default());

        assert!(binding.on_snapshot_update(&base).unwrap().should_render);
        // Unrelated entity changes
        let next = base.with_state(light("light.b", "off"));
        assert!(!binding.on_snapshot_update(&next).unwrap().should_render);

        let next = next.with_state(light("light.b", "on"));
        let decision = binding.on_snapshot_update(&next).unwrap();
        assert!(decision.should_render);
        assert_eq!(decision.display_list, vec!["light.a", "light.b"]);
    }

    #[test]
    fn test_entity_set_change_refreshes() {
        let base = Snapshot::builder()
            .entity(EntityEntry::new("light.a".parse().unwrap()))
            .state(light("light.a", "on"))
            .build();
        let mut binding = ReactiveBinding::new(OnLights::default());
        binding.on_snapshot_update(&base).unwrap();

        let same_set = base.with_state(light("light.a", "on"));
        binding.on_snapshot_update(&same_set).unwrap();
        assert_eq!(binding.surface().refreshes, 1);

        let relabelled = base.with_entities([
            EntityEntry::new("light.a".parse().unwrap()).with_label("no_dboard")
        ]);
        let decision = binding.on_snapshot_update(&relabelled).unwrap();
        assert_eq!(binding.surface().refreshes, 2);
        assert!(decision.should_render);
        assert!(decision.display_list.is_empty());
    }

    #[test]
    fn test_burst_uses_last_snapshot() {
        let a = Snapshot::builder().state(light("light.a", "on")).build();
        let b = a.with_state(light("light.a", "off"));
        let mut binding = ReactiveBinding::new(OnLights::default());

        assert!(binding.on_snapshot_burst(Vec::<&Snapshot>::new()).unwrap().is_none());
        let decision = binding.on_snapshot_burst([&a, &b]).unwrap().unwrap();
        assert!(decision.display_list.is_empty());
        assert_eq!(binding.last_fingerprint(), Some(&decision.fingerprint));
    }

    #[test]
    fn test_detach_is_terminal() {
        let mut binding = ReactiveBinding::new(OnLights::default());
        binding.on_snapshot_update(&Snapshot::default()).unwrap();
        binding.detach();

        assert_eq!(binding.state(), BindingState::Detached);
        assert_eq!(
            binding.on_snapshot_update(&Snapshot::default()),
            Err(BindingError::Detached)
        );
        assert_eq!(binding.on_snapshot_burst(Vec::<&Snapshot>::new()), Err(BindingError::Detached));
    }
}
