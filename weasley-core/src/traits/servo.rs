//! Servo actuator trait
//!
//! Abstracts over whatever turns a hardware angle into a pulse on a
//! physical channel (a PWM expander board, a dry-run logger, a test double).

/// Errors that can occur when commanding a servo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoError {
    /// Channel has no calibration or does not exist
    InvalidChannel,
    /// Angle outside the servo's actuation range
    OutOfRange,
    /// Communication with the PWM controller failed
    Bus,
}

/// Trait for servo actuators
///
/// Angles are in hardware units (twice the dial angle plus the centre
/// shift). Commands are fire-and-forget: a failed command is not retried
/// by the implementation.
pub trait ServoActuator {
    /// Drive a channel to an angle
    fn set_angle(&mut self, channel: u8, angle: i32) -> Result<(), ServoError>;
}

impl<T: ServoActuator + ?Sized> ServoActuator for &mut T {
    fn set_angle(&mut self, channel: u8, angle: i32) -> Result<(), ServoError> {
        (**self).set_angle(channel, angle)
    }
}
