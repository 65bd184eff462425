//! Actuator wiring
//!
//! Tasks cannot be generic, so the positioner owns this enum over the
//! real servo HAT and the dry-run logger.

use log::{debug, info};

use weasley_core::traits::{ServoActuator, ServoError};
use weasley_drivers::servo::ServoCalibration;

use crate::config::ClockConfig;

#[cfg(feature = "linux-i2c")]
use linux_embedded_hal::{Delay, I2cdev};
#[cfg(feature = "linux-i2c")]
use weasley_drivers::servo::ServoHat;

/// Number of channels on the PWM board
const CHANNELS: usize = 16;

/// Servo actuator selected at startup
pub enum Actuator {
    #[cfg(feature = "linux-i2c")]
    Hat(ServoHat<I2cdev>),
    DryRun(DryRunActuator),
}

impl ServoActuator for Actuator {
    fn set_angle(&mut self, channel: u8, angle: i32) -> Result<(), ServoError> {
        match self {
            #[cfg(feature = "linux-i2c")]
            Actuator::Hat(hat) => hat.set_angle(channel, angle),
            Actuator::DryRun(dry) => dry.set_angle(channel, angle),
        }
    }
}

/// Open the actuator described by the configuration
///
/// Every channel a hand is assigned to is calibrated before use.
pub fn open(config: &ClockConfig, dry_run: bool) -> anyhow::Result<Actuator> {
    if dry_run {
        let mut dry = DryRunActuator::default();
        for (channel, calibration) in &config.calibrations {
            dry.calibrate(*channel, *calibration)
                .map_err(|e| anyhow::anyhow!("calibrating channel {channel}: {e:?}"))?;
        }
        info!("Dry run: servo commands are logged, not sent");
        return Ok(Actuator::DryRun(dry));
    }

    open_hat(config)
}

#[cfg(feature = "linux-i2c")]
fn open_hat(config: &ClockConfig) -> anyhow::Result<Actuator> {
    use anyhow::Context;

    let pwm = &config.pwm;
    let i2c = I2cdev::new(&pwm.i2c_bus)
        .with_context(|| format!("opening {}", pwm.i2c_bus.display()))?;
    let mut hat = ServoHat::new(i2c, pwm.address, pwm.frequency_hz, &mut Delay)
        .map_err(|e| anyhow::anyhow!("initialising PWM board at {:#04x}: {e:?}", pwm.address))?;

    for (channel, calibration) in &config.calibrations {
        hat.calibrate(*channel, *calibration)
            .map_err(|e| anyhow::anyhow!("calibrating channel {channel}: {e:?}"))?;
        debug!(
            "Channel {}: {}-{} us over {} degrees",
            channel, calibration.pulse_min_us, calibration.pulse_max_us, calibration.actuation_range
        );
    }

    info!(
        "Servo HAT on {} at {:#04x}, {} Hz",
        pwm.i2c_bus.display(),
        pwm.address,
        pwm.frequency_hz
    );
    Ok(Actuator::Hat(hat))
}

#[cfg(not(feature = "linux-i2c"))]
fn open_hat(_config: &ClockConfig) -> anyhow::Result<Actuator> {
    anyhow::bail!("built without I2C support; run with --dry-run")
}

/// Actuator that logs commands instead of driving hardware
///
/// Applies the same calibration checks as the servo HAT.
#[derive(Debug, Default)]
pub struct DryRunActuator {
    calibration: [Option<ServoCalibration>; CHANNELS],
}

impl DryRunActuator {
    pub fn calibrate(&mut self, channel: u8, calibration: ServoCalibration) -> Result<(), ServoError> {
        let slot = self
            .calibration
            .get_mut(usize::from(channel))
            .ok_or(ServoError::InvalidChannel)?;
        *slot = Some(calibration);
        Ok(())
    }
}

impl ServoActuator for DryRunActuator {
    fn set_angle(&mut self, channel: u8, angle: i32) -> Result<(), ServoError> {
        let calibration = self
            .calibration
            .get(usize::from(channel))
            .copied()
            .flatten()
            .ok_or(ServoError::InvalidChannel)?;
        let pulse = calibration.pulse_for(angle)?;
        info!("dry-run: channel {} -> angle {} ({} us)", channel, angle, pulse);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_dry_run_checks_calibration() {
        let mut dry = DryRunActuator::default();
        assert_eq!(dry.set_angle(0, 1080), Err(ServoError::InvalidChannel));

        dry.calibrate(0, ServoCalibration::default()).unwrap();
        assert_eq!(dry.set_angle(0, 1080), Ok(()));
        assert_eq!(dry.set_angle(0, 9000), Err(ServoError::OutOfRange));
        assert_eq!(
            dry.calibrate(16, ServoCalibration::default()),
            Err(ServoError::InvalidChannel)
        );
    }

    #[test]
    fn test_open_dry_run_calibrates_assigned_channels() {
        let config = parse_config(
            r#"
            [zone.lost]
            angle = 0
            theta = 45

            [hands]
            susan = "hand0"

            [channels]
            hand0 = 5
            "#,
        )
        .unwrap();

        let mut actuator = open(&config, true).unwrap();
        assert_eq!(actuator.set_angle(5, 720), Ok(()));
        assert_eq!(actuator.set_angle(0, 720), Err(ServoError::InvalidChannel));
    }
}
