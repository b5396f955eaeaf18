//! Home Assistant auto-generated dashboard engine
//!
//! This crate turns a registry [`Snapshot`](ha_registries::Snapshot) and a
//! [`DashboardConfig`](ha_dashboard_config::DashboardConfig) into a Lovelace
//! dashboard, and keeps its self-updating cards cheap to refresh:
//!
//! - [`visibility`] decides which entities may appear at all
//! - [`classifier`] sorts visible entities into named groups
//! - [`filter`] narrows a group by state and orders it
//! - [`fingerprint`] reduces a display list to a change-detection key
//! - [`binding`] drives a card through snapshot updates and renders only
//!   when its key changes
//! - [`layout`] builds the views
//!
//! # Example
//!
//! ```ignore
//! use ha_dashboard::binding::ReactiveBinding;
//! use ha_dashboard::cards::LightsGroupCard;
//!
//! let mut binding = ReactiveBinding::new(LightsGroupCard::new(card_config));
//! let decision = binding.on_snapshot_update(&snapshot)?;
//! if decision.should_render {
//!     redraw(binding.surface().render(&decision.display_list, &snapshot));
//! }
//! ```

pub mod binding;
pub mod cards;
pub mod classifier;
pub mod filter;
pub mod fingerprint;
pub mod group;
pub mod layout;
pub mod naming;
pub mod visibility;

pub use binding::{BindingError, BindingState, ReactiveBinding, RenderDecision, Surface};
pub use classifier::{classify, Classification, Classify, CoverScheme, Scheme};
pub use filter::{select, SortOrder, StatePredicate};
pub use fingerprint::{compute_key, Fingerprint, KeyStrategy};
pub use group::GroupName;
pub use layout::{build_dashboard, Dashboard};
pub use visibility::{Rejection, VisibilityPolicy, EXCLUDE_LABEL};
