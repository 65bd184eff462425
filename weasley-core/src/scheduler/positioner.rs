//! Tick-driven hand positioner

use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::Vec;

use crate::config::{DialConfig, HandId, PersonName, ZoneId, MAX_PEOPLE};
use crate::dial::{command_angle, sector_offset, DistanceScaler, StaggerGroup};
use crate::error::PositionError;
use crate::state::{HandState, HandStateStore};
use crate::traits::ServoActuator;

/// A planned physical move for one hand
#[derive(Debug, Clone, PartialEq)]
pub struct MoveCommand {
    /// Person the hand tracks
    pub person: PersonName,
    /// Hand being moved
    pub hand: HandId,
    /// PWM channel driving the hand
    pub channel: u8,
    /// Zone the hand is placed in (after fallback remapping)
    pub zone: ZoneId,
    /// Distance the placement was computed from
    pub distance: f64,
    /// Hardware angle
    pub angle: i32,
    /// False when re-asserting the last commanded angle
    pub changed: bool,
}

/// Result of one tick for one person
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Actuator accepted the command
    Moved(MoveCommand),
    /// Update delay has not elapsed
    Throttled { person: PersonName },
    /// This person's update failed; other hands are unaffected
    Failed {
        person: PersonName,
        error: PositionError,
        /// False when the same fault was already reported since the last report
        fresh: bool,
    },
}

impl TickOutcome {
    /// Person this outcome belongs to
    pub fn person(&self) -> &str {
        match self {
            TickOutcome::Moved(cmd) => &cmd.person,
            TickOutcome::Throttled { person } | TickOutcome::Failed { person, .. } => person,
        }
    }
}

/// Outcomes of one tick, one per person with a zone
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    outcomes: Vec<TickOutcome, MAX_PEOPLE>,
}

impl TickReport {
    /// All outcomes in store order
    pub fn outcomes(&self) -> &[TickOutcome] {
        &self.outcomes
    }

    /// Successful moves
    pub fn moves(&self) -> impl Iterator<Item = &MoveCommand> {
        self.outcomes.iter().filter_map(|o| match o {
            TickOutcome::Moved(cmd) => Some(cmd),
            _ => None,
        })
    }

    /// Failed updates
    pub fn failures(&self) -> impl Iterator<Item = (&str, &PositionError)> {
        self.outcomes.iter().filter_map(|o| match o {
            TickOutcome::Failed { person, error, .. } => Some((person.as_str(), error)),
            _ => None,
        })
    }

    /// Outcome for one person
    pub fn for_person(&self, person: &str) -> Option<&TickOutcome> {
        self.outcomes.iter().find(|o| o.person() == person)
    }
}

/// Debounced positioning scheduler
///
/// Holds no mutable state of its own; everything that changes lives in
/// the [`HandStateStore`].
pub struct PositioningScheduler<'a> {
    config: &'a DialConfig,
    scaler: DistanceScaler,
}

impl<'a> PositioningScheduler<'a> {
    /// Create a scheduler for a validated dial config
    pub fn new(config: &'a DialConfig) -> Self {
        Self {
            config,
            scaler: DistanceScaler::new(config.scaling),
        }
    }

    /// Run one tick
    ///
    /// Never fails as a whole; per-person failures are reported in the
    /// returned [`TickReport`].
    pub fn tick<M, A>(&self, now_ms: u64, store: &HandStateStore<M>, actuator: &mut A) -> TickReport
    where
        M: RawMutex,
        A: ServoActuator,
    {
        let planned: Vec<(PersonName, Result<Option<MoveCommand>, PositionError>), MAX_PEOPLE> =
            store.read(|states| {
                states
                    .iter()
                    .filter(|s| s.zone.is_some())
                    .map(|s| (s.person.clone(), self.plan(s, states, now_ms)))
                    .collect()
            });

        let mut report = TickReport::default();
        for (person, plan) in planned {
            let outcome = match plan {
                Ok(None) => TickOutcome::Throttled { person },
                Ok(Some(cmd)) => match actuator.set_angle(cmd.channel, cmd.angle) {
                    Ok(()) => {
                        store.mark_positioned(&cmd.person, &cmd.zone, cmd.angle, now_ms);
                        TickOutcome::Moved(cmd)
                    }
                    Err(e) => Self::fail(store, person, e.into()),
                },
                Err(error) => Self::fail(store, person, error),
            };
            // Same capacity as the store
            let _ = report.outcomes.push(outcome);
        }

        report
    }

    /// Plan the move for one hand
    ///
    /// Returns `Ok(None)` when the update delay has not elapsed.
    pub fn plan(
        &self,
        state: &HandState,
        states: &[HandState],
        now_ms: u64,
    ) -> Result<Option<MoveCommand>, PositionError> {
        let Some(reported) = state.zone.as_ref() else {
            return Ok(None);
        };

        let zones = &self.config.zones;
        let zone = zones
            .find(zones.resolve(reported))
            .ok_or_else(|| PositionError::UnknownZone(reported.clone()))?;

        if !state.is_due(zone, now_ms) {
            return Ok(None);
        }

        let hands = &self.config.hands;
        let hand = hands
            .hand_for(&state.person)
            .ok_or(PositionError::UnassignedHand)?;
        let channel = hands
            .channel_for(hand)
            .ok_or(PositionError::UnassignedChannel)?;

        let offset = sector_offset(zone, state.distance, &self.scaler, || {
            StaggerGroup::collect(&zone.id, states, hands, hand).scale_for(hand)
        });
        let angle = command_angle(zone.base_angle, offset, self.config.center_shift);

        Ok(Some(MoveCommand {
            person: state.person.clone(),
            hand: hand.clone(),
            channel,
            zone: zone.id.clone(),
            distance: state.distance,
            angle,
            changed: state.last_angle != Some(angle),
        }))
    }

    fn fail<M: RawMutex>(
        store: &HandStateStore<M>,
        person: PersonName,
        error: PositionError,
    ) -> TickOutcome {
        let fresh = store.set_fault(&person, error.clone());
        TickOutcome::Failed {
            person,
            error,
            fresh,
        }
    }
}
