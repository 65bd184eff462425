//! Configuration loading
//!
//! Loads `clock.toml` from disk, or the copy embedded at build time, and
//! turns it into the validated core configuration plus the hardware
//! settings the daemon needs.

pub mod file;

pub use file::{load, parse_config, ClockConfig, LoadError, PwmSettings, EMBEDDED_CONFIG};
