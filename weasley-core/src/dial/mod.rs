//! Dial math
//!
//! Pure functions turning a zone, a distance and the current stagger
//! membership into a hardware angle.

pub mod angle;
pub mod scale;
pub mod stagger;

pub use angle::{command_angle, sector_offset};
pub use scale::DistanceScaler;
pub use stagger::{stagger_scale, StaggerGroup};
