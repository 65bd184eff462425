//! Servo calibration
//!
//! Linear map from a hardware angle in `[0, actuation_range]` to a pulse
//! width in `[pulse_min_us, pulse_max_us]`. Defaults suit the HS-785HB
//! winch servo (six full turns).

use weasley_core::traits::ServoError;

/// Per-channel servo calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoCalibration {
    /// Pulse width at angle 0
    pub pulse_min_us: u16,
    /// Pulse width at the end of the actuation range
    pub pulse_max_us: u16,
    /// Full travel in degrees
    pub actuation_range: u16,
}

impl Default for ServoCalibration {
    fn default() -> Self {
        Self {
            pulse_min_us: 685,
            pulse_max_us: 2070,
            actuation_range: 2160,
        }
    }
}

impl ServoCalibration {
    /// Check that the calibration describes a usable servo
    pub fn is_valid(&self) -> bool {
        self.pulse_min_us < self.pulse_max_us && self.actuation_range > 0
    }

    /// Pulse width for a hardware angle
    pub fn pulse_for(&self, angle: i32) -> Result<u16, ServoError> {
        if !self.is_valid() {
            return Err(ServoError::OutOfRange);
        }
        let range = i64::from(self.actuation_range);
        let angle = i64::from(angle);
        if !(0..=range).contains(&angle) {
            return Err(ServoError::OutOfRange);
        }

        let span = i64::from(self.pulse_max_us - self.pulse_min_us);
        let pulse = i64::from(self.pulse_min_us) + (span * angle + range / 2) / range;
        Ok(pulse as u16)
    }
}
