//! Hand state record

use crate::config::{PersonName, Zone, ZoneId};
use crate::error::PositionError;

/// Positioning phase of a hand
///
/// `Unpositioned → Positioned`, re-entered on every successful move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandPhase {
    /// No physical move yet
    Unpositioned,
    /// Moved at least once
    Positioned,
}

/// Latest known state of one person's hand
#[derive(Debug, Clone, PartialEq)]
pub struct HandState {
    /// Person this state belongs to
    pub person: PersonName,
    /// Last reported zone
    pub zone: Option<ZoneId>,
    /// Last reported or derived distance from home, ≥ 0
    pub distance: f64,
    /// Time of the last report (ms)
    pub last_updated_ms: u64,
    /// Time of the last physical move (ms)
    pub last_positioned_ms: Option<u64>,
    /// Zone the hand was in when it last moved
    pub positioned_zone: Option<ZoneId>,
    /// Last commanded hardware angle
    pub last_angle: Option<i32>,
    /// Last fault reported for this hand, cleared by a new report
    pub fault: Option<PositionError>,
}

impl HandState {
    /// Create an empty state for a person
    pub fn new(person: PersonName) -> Self {
        Self {
            person,
            zone: None,
            distance: 0.0,
            last_updated_ms: 0,
            last_positioned_ms: None,
            positioned_zone: None,
            last_angle: None,
            fault: None,
        }
    }

    /// Current phase
    pub fn phase(&self) -> HandPhase {
        if self.has_been_positioned() {
            HandPhase::Positioned
        } else {
            HandPhase::Unpositioned
        }
    }

    /// Check if the hand has moved at least once
    pub fn has_been_positioned(&self) -> bool {
        self.last_positioned_ms.is_some()
    }

    /// Store a new report
    ///
    /// Negative distances are clamped to zero.
    pub fn record(&mut self, zone: ZoneId, distance: f64, now_ms: u64) {
        self.zone = Some(zone);
        self.distance = if distance > 0.0 { distance } else { 0.0 };
        self.last_updated_ms = now_ms;
        self.fault = None;
    }

    /// Record a successful physical move
    pub fn mark_positioned(&mut self, zone: ZoneId, angle: i32, now_ms: u64) {
        self.last_positioned_ms = Some(now_ms);
        self.positioned_zone = Some(zone);
        self.last_angle = Some(angle);
        self.fault = None;
    }

    /// Check the debounce guard for a move into `zone`
    ///
    /// The zone's update delay only applies while the hand stays in the
    /// zone it was last positioned in.
    pub fn is_due(&self, zone: &Zone, now_ms: u64) -> bool {
        let Some(last) = self.last_positioned_ms else {
            return true;
        };

        if self.positioned_zone.as_ref() != Some(&zone.id) {
            return true;
        }

        now_ms >= last.saturating_add(zone.update_delay_ms())
    }
}
