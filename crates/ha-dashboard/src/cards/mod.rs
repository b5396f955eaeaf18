//! Self-updating widgets
//!
//! Each card is a [`Surface`](crate::binding::Surface): wrap it in a
//! [`ReactiveBinding`](crate::binding::ReactiveBinding) and render only when
//! the binding says so.

mod covers_group;
mod lights_group;
mod summary;

pub use covers_group::CoversGroupCard;
pub use lights_group::LightsGroupCard;
pub use summary::{
    summary_display, summary_members, summary_policy, SummaryCard, SummaryDisplay, CRITICAL_BATTERY,
};

use crate::layout::lovelace::{HeadingCard, Section, TileCard};

/// Renderable content of a group card: a heading and one tile per member
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCardContent {
    pub heading: HeadingCard,
    pub tiles: Vec<TileCard>,
}

impl GroupCardContent {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn into_section(self) -> Section {
        let mut section = Section::titled(self.heading);
        section.extend(self.tiles);
        section
    }
}
