//! Board-agnostic core logic for the Weasley clock
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Dial configuration (zones, hand/channel assignment, scaling)
//! - Dial math (distance scaling, stagger allocation, angle composition)
//! - Per-person hand state and the shared state store
//! - Positioning scheduler (debounced, tick-driven)
//! - Ingress adapter for decoded location reports
//! - Hardware abstraction trait for the servo actuator

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod dial;
pub mod error;
pub mod geo;
pub mod ingress;
pub mod scheduler;
pub mod state;
pub mod traits;

#[cfg(test)]
mod testutil;
