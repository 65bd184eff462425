//! Configuration types
//!
//! Board-agnostic configuration structures, loaded once at startup and
//! read-only afterwards.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;

pub use crate::error::ConfigError;
