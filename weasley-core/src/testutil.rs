//! Shared test fixtures

use std::vec::Vec;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::config::{DialConfig, HandAssignment, OffsetStyle, Zone, ZoneTable};
use crate::geo::Coordinate;
use crate::state::HandStateStore;
use crate::traits::{ServoActuator, ServoError};

pub type Store = HandStateStore<CriticalSectionRawMutex>;

/// Boston, for coordinate tests
pub const HOME: Coordinate = Coordinate::new(42.3601, -71.0589);

/// Small dial with one zone of each style
///
/// alice → a → 0, bob → b → 1, carol → c → 2, dave → d (no channel).
pub fn dial_config() -> DialConfig {
    let mut zones = ZoneTable::with_defaults().unwrap();
    zones
        .add(Zone::new("home", 340.0, 20.0, OffsetStyle::Staggered).unwrap())
        .unwrap();
    zones
        .add(Zone::new("mortalperil", 270.0, 50.0, OffsetStyle::Distance).unwrap())
        .unwrap();
    zones
        .add(
            Zone::new("quidditch", 225.0, 45.0, OffsetStyle::Distance)
                .unwrap()
                .with_near_home(0.2)
                .unwrap(),
        )
        .unwrap();
    zones
        .add(
            Zone::new("work", 180.0, 45.0, OffsetStyle::Staggered)
                .unwrap()
                .with_delay(30),
        )
        .unwrap();
    zones
        .add(Zone::new("lost", 0.0, 45.0, OffsetStyle::Distance).unwrap())
        .unwrap();

    let mut hands = HandAssignment::new();
    let people = [
        ("alice", "a", Some(0)),
        ("bob", "b", Some(1)),
        ("carol", "c", Some(2)),
        ("dave", "d", None),
    ];
    for (person, hand, channel) in people {
        hands.assign_person(person, hand).unwrap();
        if let Some(channel) = channel {
            hands.assign_channel(hand, channel).unwrap();
        }
    }

    let mut config = DialConfig::new(zones, hands);
    config.home = Some(HOME);
    config.validate().unwrap();
    config
}

/// Actuator that records every command
#[derive(Debug, Default)]
pub struct RecordingActuator {
    pub commands: Vec<(u8, i32)>,
}

impl RecordingActuator {
    /// Last angle sent to a channel
    pub fn last_for(&self, channel: u8) -> Option<i32> {
        self.commands
            .iter()
            .rev()
            .find(|(c, _)| *c == channel)
            .map(|(_, a)| *a)
    }
}

impl ServoActuator for RecordingActuator {
    fn set_angle(&mut self, channel: u8, angle: i32) -> Result<(), ServoError> {
        self.commands.push((channel, angle));
        Ok(())
    }
}

/// Actuator whose bus fails for one channel
#[derive(Debug, Default)]
pub struct FailingActuator {
    pub broken: u8,
    pub inner: RecordingActuator,
}

impl FailingActuator {
    pub fn new(broken: u8) -> Self {
        Self {
            broken,
            inner: RecordingActuator::default(),
        }
    }
}

impl ServoActuator for FailingActuator {
    fn set_angle(&mut self, channel: u8, angle: i32) -> Result<(), ServoError> {
        if channel == self.broken {
            return Err(ServoError::Bus);
        }
        self.inner.set_angle(channel, angle)
    }
}
