//! Per-person hand state
//!
//! One [`HandState`] per observed person, created on the first report and
//! kept for the life of the process. The [`HandStateStore`] is the only
//! shared mutable resource; the ingress adapter writes it and the
//! positioning scheduler reads it.

pub mod hand;
pub mod store;

pub use hand::{HandPhase, HandState};
pub use store::HandStateStore;
