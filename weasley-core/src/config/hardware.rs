//! Hardware assignment types
//!
//! Maps tracked people onto hands and hands onto PWM channels.

use heapless::Vec;

use super::types::{name, HandId, PersonName};
use crate::error::ConfigError;

/// Maximum tracked people
pub const MAX_PEOPLE: usize = 16;

/// Number of PWM channels on the servo board
pub const MAX_CHANNELS: usize = 16;

/// Person → hand and hand → channel mapping
///
/// A hand belongs to at most one person and drives exactly one channel.
#[derive(Debug, Clone, Default)]
pub struct HandAssignment {
    people: Vec<(PersonName, HandId), MAX_PEOPLE>,
    channels: Vec<(HandId, u8), MAX_CHANNELS>,
}

impl HandAssignment {
    /// Create an empty assignment
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a hand to a person
    pub fn assign_person(&mut self, person: &str, hand: &str) -> Result<(), ConfigError> {
        if self.hand_for(person).is_some() {
            return Err(ConfigError::DuplicatePerson);
        }
        if self.people.iter().any(|(_, h)| h.as_str() == hand) {
            return Err(ConfigError::SharedHand);
        }
        self.people
            .push((name(person)?, name(hand)?))
            .map_err(|_| ConfigError::TooManyEntries)
    }

    /// Assign a PWM channel to a hand
    pub fn assign_channel(&mut self, hand: &str, channel: u8) -> Result<(), ConfigError> {
        if usize::from(channel) >= MAX_CHANNELS {
            return Err(ConfigError::InvalidChannel);
        }
        if self.channel_for(hand).is_some() {
            return Err(ConfigError::DuplicateHand);
        }
        if self.channels.iter().any(|(_, c)| *c == channel) {
            return Err(ConfigError::SharedChannel);
        }
        self.channels
            .push((name(hand)?, channel))
            .map_err(|_| ConfigError::TooManyEntries)
    }

    /// Hand assigned to a person
    pub fn hand_for(&self, person: &str) -> Option<&HandId> {
        self.people
            .iter()
            .find(|(p, _)| p.as_str() == person)
            .map(|(_, h)| h)
    }

    /// Channel driving a hand
    pub fn channel_for(&self, hand: &str) -> Option<u8> {
        self.channels
            .iter()
            .find(|(h, _)| h.as_str() == hand)
            .map(|(_, c)| *c)
    }

    /// Iterate over (hand, channel) pairs
    pub fn channels(&self) -> impl Iterator<Item = (&str, u8)> {
        self.channels.iter().map(|(h, c)| (h.as_str(), *c))
    }

    /// Iterate over (person, hand) pairs
    pub fn people(&self) -> impl Iterator<Item = (&str, &str)> {
        self.people.iter().map(|(p, h)| (p.as_str(), h.as_str()))
    }
}
