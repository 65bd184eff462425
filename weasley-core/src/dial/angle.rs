//! Angle composition
//!
//! Turns a zone, a distance and a stagger slot into the hardware angle
//! sent to the actuator. Hardware units are double the logical dial and
//! shifted by the configured centre.

use super::scale::DistanceScaler;
use crate::config::{OffsetStyle, Zone};

/// Offset of a hand inside its zone's sector, in dial degrees
///
/// `stagger` is only evaluated when the zone renders staggered for this
/// distance. Distance offsets are mirrored on the lower half of the dial
/// so a growing distance always moves the hand away from home.
pub fn sector_offset(
    zone: &Zone,
    distance: f64,
    scaler: &DistanceScaler,
    stagger: impl FnOnce() -> f64,
) -> f64 {
    match zone.effective_style(distance) {
        OffsetStyle::Distance => {
            let along = scaler.scale(distance) * zone.theta;
            if zone.base_angle < 180.0 {
                along
            } else {
                zone.theta - along
            }
        }
        OffsetStyle::Staggered => stagger() * zone.theta,
        OffsetStyle::None => zone.theta / 2.0,
    }
}

/// Hardware angle for a dial position
pub fn command_angle(base_angle: f64, offset: f64, center_shift: i32) -> i32 {
    (libm::round(2.0 * (base_angle + offset)) as i32).saturating_add(center_shift)
}
