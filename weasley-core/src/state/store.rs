//! Shared hand state store
//!
//! Every access runs inside one short critical section on the inner
//! mutex, so a reader always sees a consistent snapshot of the whole
//! table. No closure passed in here may block.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

use super::hand::HandState;
use crate::config::{name, PersonName, ZoneId, MAX_PEOPLE};
use crate::error::{IngestError, PositionError};

/// Lock-guarded table of hand states, one entry per person
pub struct HandStateStore<M: RawMutex> {
    states: Mutex<M, RefCell<Vec<HandState, MAX_PEOPLE>>>,
}

impl<M: RawMutex> HandStateStore<M> {
    /// Create an empty store
    pub const fn new() -> Self {
        Self {
            states: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    /// Write a report for a person, creating the entry if absent
    pub fn record(
        &self,
        person: &str,
        zone: &ZoneId,
        distance: f64,
        now_ms: u64,
    ) -> Result<(), IngestError> {
        let key = name(person).map_err(|_| IngestError::NameTooLong)?;

        self.states.lock(|cell| {
            let mut states = cell.borrow_mut();
            if let Some(state) = states.iter_mut().find(|s| s.person == key) {
                state.record(zone.clone(), distance, now_ms);
                return Ok(());
            }

            let mut state = HandState::new(key);
            state.record(zone.clone(), distance, now_ms);
            states.push(state).map_err(|_| IngestError::StoreFull)
        })
    }

    /// Run a closure against a consistent view of all states
    pub fn read<R>(&self, f: impl FnOnce(&[HandState]) -> R) -> R {
        self.states.lock(|cell| f(&cell.borrow()))
    }

    /// Copy of one person's state
    pub fn snapshot(&self, person: &str) -> Option<HandState> {
        self.read(|states| states.iter().find(|s| s.person == person).cloned())
    }

    /// Names of all tracked people
    pub fn people(&self) -> Vec<PersonName, MAX_PEOPLE> {
        self.read(|states| states.iter().map(|s| s.person.clone()).collect())
    }

    /// Record a successful move
    ///
    /// Returns false if the person is not tracked.
    pub fn mark_positioned(&self, person: &str, zone: &ZoneId, angle: i32, now_ms: u64) -> bool {
        self.update(person, |state| {
            state.mark_positioned(zone.clone(), angle, now_ms)
        })
        .is_some()
    }

    /// Record a fault for a person
    ///
    /// Returns true when the fault differs from the one already recorded
    /// since the last report.
    pub fn set_fault(&self, person: &str, fault: PositionError) -> bool {
        self.update(person, |state| {
            let fresh = state.fault.as_ref() != Some(&fault);
            state.fault = Some(fault);
            fresh
        })
        .unwrap_or(true)
    }

    /// Number of tracked people
    pub fn len(&self) -> usize {
        self.read(|states| states.len())
    }

    /// Check if nobody has reported yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn update<R>(&self, person: &str, f: impl FnOnce(&mut HandState) -> R) -> Option<R> {
        self.states.lock(|cell| {
            cell.borrow_mut()
                .iter_mut()
                .find(|s| s.person == person)
                .map(f)
        })
    }
}

impl<M: RawMutex> Default for HandStateStore<M> {
    fn default() -> Self {
        Self::new()
    }
}
