//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in weasley-core:
//!
//! - PCA9685 16-channel PWM controller over I2C
//! - Servo calibration (pulse width range, actuation range)
//! - Servo HAT actuator combining both

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod servo;

#[cfg(test)]
mod mock;
