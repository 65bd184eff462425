//! Hardware abstraction traits
//!
//! These traits define the interface between the positioning engine
//! and hardware-specific implementations.

pub mod servo;

pub use servo::{ServoActuator, ServoError};
