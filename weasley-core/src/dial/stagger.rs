//! Stagger allocation
//!
//! Hands sharing a zone are spread across its sector so they do not
//! overlap. The slot of each hand depends only on the current membership
//! set, sorted by hand id.
//!
//! | members | slots              |
//! |---------|--------------------|
//! | 1       | 0.5                |
//! | 2       | 0.25, 0.75         |
//! | 3+      | 0.1 ..= 0.9, evenly |

use heapless::Vec;

use crate::config::{HandAssignment, HandId, MAX_PEOPLE};
use crate::state::HandState;

/// Fractional position of the hand at `index` in a group of `count`
pub fn stagger_scale(index: usize, count: usize) -> f64 {
    if count < 2 {
        return 0.5;
    }

    let step = index as f64 / (count - 1) as f64;
    if count == 2 {
        0.5 * step + 0.25
    } else {
        0.8 * step + 0.1
    }
}

/// Hands currently sharing one zone, sorted ascending by id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaggerGroup {
    hands: Vec<HandId, MAX_PEOPLE>,
}

impl StaggerGroup {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the group for `zone` as seen by `own_hand`
    ///
    /// Other hands count once they have been positioned; the hand being
    /// positioned always counts. People without a hand are skipped.
    pub fn collect(
        zone: &str,
        states: &[HandState],
        hands: &HandAssignment,
        own_hand: &HandId,
    ) -> Self {
        let mut group = Self::new();
        group.insert(own_hand);

        for state in states {
            if state.zone.as_deref() != Some(zone) || !state.has_been_positioned() {
                continue;
            }
            if let Some(hand) = hands.hand_for(&state.person) {
                group.insert(hand);
            }
        }

        group
    }

    /// Add a hand, keeping the group sorted and distinct
    ///
    /// Returns false if the hand was already present or the group is full.
    pub fn insert(&mut self, hand: &HandId) -> bool {
        match self.hands.binary_search(hand) {
            Ok(_) => false,
            Err(pos) => self.hands.insert(pos, hand.clone()).is_ok(),
        }
    }

    /// Fractional position of `hand` within the sector
    ///
    /// A hand outside the group is centred.
    pub fn scale_for(&self, hand: &str) -> f64 {
        match self.hands.iter().position(|h| h.as_str() == hand) {
            Some(index) => stagger_scale(index, self.hands.len()),
            None => 0.5,
        }
    }

    /// Member hand ids in slot order
    pub fn hands(&self) -> impl Iterator<Item = &str> {
        self.hands.iter().map(|h| h.as_str())
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.hands.len()
    }

    /// Check if the group is empty
    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }
}
