//! Positioning scheduler
//!
//! Periodic driver turning hand states into actuator commands. Each tick
//! plans every move under the store lock, then drives the actuator
//! outside it.

pub mod positioner;

pub use positioner::{MoveCommand, PositioningScheduler, TickOutcome, TickReport};
