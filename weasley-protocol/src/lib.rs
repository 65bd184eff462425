//! Location report protocol
//!
//! This crate defines the messages the clock receives from the
//! publish/subscribe bus. Every tracked person publishes to their own
//! topic below a shared prefix, and every message carries a small JSON
//! object describing where that person currently is.
//!
//! # Protocol Overview
//!
//! ```text
//! topic:    weasleyclock/<person>
//! payload:  {"zone": "work", "distance": 3.2}
//!           {"state": "mortalperil", "latitude": 42.36, "longitude": -71.06}
//! ```
//!
//! Numeric fields may be sent as JSON numbers or as numeric strings.
//! Unknown fields are ignored. Transport concerns (connection, TLS,
//! reconnect) are not handled here.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod report;
pub mod topic;

pub use report::{DecodeError, LocationReport, ZoneName};
pub use topic::{Topic, DEFAULT_SUBSCRIPTION, UPDATE_PAYLOAD, UPDATE_TOPIC};

/// Maximum length of a person name, zone id or hand id
pub const MAX_NAME_LEN: usize = 24;
