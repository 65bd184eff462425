//! Servo drivers
//!
//! - PCA9685: 12-bit PWM controller, one pulse train per channel
//! - Calibration: maps a hardware angle to a pulse width
//! - ServoHat: [`ServoActuator`](weasley_core::traits::ServoActuator)
//!   over a PCA9685 with per-channel calibration

pub mod calibration;
pub mod hat;
pub mod pca9685;

pub use calibration::ServoCalibration;
pub use hat::ServoHat;
pub use pca9685::{Pca9685, PwmError, DEFAULT_ADDRESS, DEFAULT_FREQUENCY_HZ};
