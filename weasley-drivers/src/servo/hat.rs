//! 16-channel servo HAT
//!
//! A PCA9685 at 50 Hz with a calibration per channel. Only calibrated
//! channels accept commands.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use weasley_core::traits::{ServoActuator, ServoError};

use super::calibration::ServoCalibration;
use super::pca9685::{Pca9685, PwmError, CHANNELS};

/// Servo HAT actuator
pub struct ServoHat<I2C> {
    pwm: Pca9685<I2C>,
    calibration: [Option<ServoCalibration>; CHANNELS as usize],
}

impl<I2C: I2c> ServoHat<I2C> {
    /// Initialise the controller at `frequency_hz`
    pub fn new(
        i2c: I2C,
        address: u8,
        frequency_hz: u16,
        delay: &mut impl DelayNs,
    ) -> Result<Self, ServoError> {
        let mut pwm = Pca9685::new(i2c, address);
        pwm.init(delay, frequency_hz).map_err(servo_error)?;
        Ok(Self {
            pwm,
            calibration: [None; CHANNELS as usize],
        })
    }

    /// Calibrate a channel, enabling it
    pub fn calibrate(&mut self, channel: u8, calibration: ServoCalibration) -> Result<(), ServoError> {
        if !calibration.is_valid() {
            return Err(ServoError::OutOfRange);
        }
        let slot = self
            .calibration
            .get_mut(usize::from(channel))
            .ok_or(ServoError::InvalidChannel)?;
        *slot = Some(calibration);
        Ok(())
    }

    /// Calibration of a channel
    pub fn calibration(&self, channel: u8) -> Option<&ServoCalibration> {
        self.calibration.get(usize::from(channel))?.as_ref()
    }

    /// Stop driving a channel
    pub fn release_channel(&mut self, channel: u8) -> Result<(), ServoError> {
        self.pwm.set_off(channel).map_err(servo_error)
    }

    /// Underlying controller
    pub fn pwm(&mut self) -> &mut Pca9685<I2C> {
        &mut self.pwm
    }
}

impl<I2C: I2c> ServoActuator for ServoHat<I2C> {
    fn set_angle(&mut self, channel: u8, angle: i32) -> Result<(), ServoError> {
        let calibration = self
            .calibration(channel)
            .copied()
            .ok_or(ServoError::InvalidChannel)?;
        let pulse = calibration.pulse_for(angle)?;
        self.pwm.set_pulse_us(channel, pulse).map_err(servo_error)
    }
}

fn servo_error<E>(e: PwmError<E>) -> ServoError {
    match e {
        PwmError::InvalidChannel => ServoError::InvalidChannel,
        PwmError::Bus(_) | PwmError::InvalidFrequency => ServoError::Bus,
    }
}
