//! State predicates and display ordering for classified groups

use std::cmp::Ordering;

use ha_core::{
    parse_numeric_prefix, State, STATE_CLOSED, STATE_CLOSING, STATE_OFF, STATE_ON, STATE_OPEN,
    STATE_OPENING,
};
use ha_registries::Snapshot;
use tracing::trace;

/// Cover states the open half of a split shows
pub const OPEN_STATES: &[&str] = &[STATE_OPEN, STATE_OPENING];

/// Cover states the closed half of a split shows
pub const CLOSED_STATES: &[&str] = &[STATE_CLOSED, STATE_CLOSING];

/// A pure test on an entity's current state value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatePredicate {
    Any,
    Is(&'static str),
    OneOf(&'static [&'static str]),
    /// Numeric value strictly below the bound
    Below(f64),
    /// Numeric value within the bounds, both inclusive
    Between(f64, f64),
    /// Numeric value strictly above the bound
    Above(f64),
}

impl StatePredicate {
    pub const ON: StatePredicate = StatePredicate::Is(STATE_ON);
    pub const OFF: StatePredicate = StatePredicate::Is(STATE_OFF);
    pub const OPEN: StatePredicate = StatePredicate::OneOf(OPEN_STATES);
    pub const CLOSED: StatePredicate = StatePredicate::OneOf(CLOSED_STATES);

    /// Numeric predicates exclude values that do not parse
    pub fn matches(&self, state: &State) -> bool {
        match *self {
            StatePredicate::Any => true,
            StatePredicate::Is(value) => state.state == value,
            StatePredicate::OneOf(values) => values.contains(&state.state.as_str()),
            StatePredicate::Below(bound) => numeric(state).is_some_and(|v| v < bound),
            StatePredicate::Between(low, high) => {
                numeric(state).is_some_and(|v| v >= low && v <= high)
            }
            StatePredicate::Above(bound) => numeric(state).is_some_and(|v| v > bound),
        }
    }
}

fn numeric(state: &State) -> Option<f64> {
    let value = parse_numeric_prefix(&state.state);
    if value.is_none() {
        trace!(entity_id = %state.entity_id, value = %state.state, "Unparseable numeric state");
    }
    value
}

/// How a display list is ordered
#[derive(Debug, Clone, Copy, Default)]
pub enum SortOrder<'a> {
    /// Most recently changed first
    #[default]
    LastChanged,
    /// Listed IDs first in list order, the rest after them in input order
    Explicit(&'a [String]),
    /// Input order
    Preserve,
}

impl<'a> SortOrder<'a> {
    /// An explicit order when one is configured, else by last change
    pub fn explicit_or_last_changed(order: Option<&'a [String]>) -> Self {
        match order {
            Some(order) if !order.is_empty() => SortOrder::Explicit(order),
            _ => SortOrder::LastChanged,
        }
    }
}

/// Keep the members whose state satisfies `predicate`, then order them
///
/// Members without a state are dropped.
pub fn select(
    members: &[String],
    snapshot: &Snapshot,
    predicate: StatePredicate,
    order: SortOrder<'_>,
) -> Vec<String> {
    let mut selected: Vec<String> = members
        .iter()
        .filter(|id| {
            snapshot
                .state(id)
                .is_some_and(|state| predicate.matches(state))
        })
        .cloned()
        .collect();

    match order {
        SortOrder::LastChanged => sort_by_last_changed(&mut selected, snapshot),
        SortOrder::Explicit(order) => sort_by_explicit_order(&mut selected, order),
        SortOrder::Preserve => {}
    }
    selected
}

/// Most recently changed first
///
/// Entities without a timestamp compare equal to each other and sort after
/// every timestamped one. The sort is stable.
pub fn sort_by_last_changed(ids: &mut [String], snapshot: &Snapshot) {
    ids.sort_by(|a, b| {
        let a = snapshot.state(a).and_then(|s| s.last_changed);
        let b = snapshot.state(b).and_then(|s| s.last_changed);
        match (a, b) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// Listed IDs first by list position; unlisted keep their relative order
pub fn sort_by_explicit_order(ids: &mut [String], order: &[String]) {
    ids.sort_by_key(|id| order.iter().position(|o| o == id).unwrap_or(usize::MAX));
}
