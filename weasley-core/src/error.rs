//! Error taxonomy
//!
//! Every error here is local to one person's update. None of them stop
//! the scheduler or affect other hands.

use weasley_protocol::DecodeError;

use crate::config::ZoneId;
use crate::traits::ServoError;

/// Reporting severity for an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

/// Static configuration errors (fatal at startup only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Name longer than the fixed capacity
    NameTooLong,
    /// Zone base angle outside [0, 360)
    InvalidAngle,
    /// Negative or undefined sector width, or a sector past 360°
    InvalidTheta,
    /// Negative or undefined near-home threshold
    InvalidNearHome,
    /// Centre shift outside the supported hardware range
    InvalidCenterShift,
    /// Two zones with the same id
    DuplicateZone,
    /// Fallback zone is not in the table
    UnknownFallbackZone,
    /// Person assigned twice
    DuplicatePerson,
    /// Two people assigned the same hand
    SharedHand,
    /// Hand assigned two channels
    DuplicateHand,
    /// Two hands assigned the same channel
    SharedChannel,
    /// Channel index out of range
    InvalidChannel,
    /// Scaling constants do not define a usable curve
    InvalidScaling,
    /// Exceeded a fixed capacity
    TooManyEntries,
}

/// Errors from the ingress path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// Payload could not be decoded
    Decode(DecodeError),
    /// Person name longer than the fixed capacity
    NameTooLong,
    /// Reported zone is not on the dial
    UnknownZone(ZoneId),
    /// Hand state table is full
    StoreFull,
}

impl IngestError {
    /// Reporting severity
    pub fn severity(&self) -> Severity {
        match self {
            IngestError::Decode(_) | IngestError::NameTooLong => Severity::Warning,
            IngestError::UnknownZone(_) | IngestError::StoreFull => Severity::Error,
        }
    }
}

impl From<DecodeError> for IngestError {
    fn from(e: DecodeError) -> Self {
        IngestError::Decode(e)
    }
}

/// Errors from positioning one hand during a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    /// Hand state refers to a zone that is not on the dial
    UnknownZone(ZoneId),
    /// Person has no hand assigned
    UnassignedHand,
    /// Hand has no PWM channel assigned
    UnassignedChannel,
    /// Actuator rejected the command
    Actuator(ServoError),
}

impl PositionError {
    /// Reporting severity
    pub fn severity(&self) -> Severity {
        match self {
            PositionError::UnassignedChannel => Severity::Debug,
            PositionError::UnknownZone(_)
            | PositionError::UnassignedHand
            | PositionError::Actuator(_) => Severity::Error,
        }
    }
}

impl From<ServoError> for PositionError {
    fn from(e: ServoError) -> Self {
        PositionError::Actuator(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severities() {
        assert_eq!(
            IngestError::Decode(DecodeError::Malformed).severity(),
            Severity::Warning
        );
        assert_eq!(IngestError::StoreFull.severity(), Severity::Error);
        assert_eq!(
            PositionError::UnknownZone(ZoneId::new()).severity(),
            Severity::Error
        );
        assert_eq!(PositionError::UnassignedHand.severity(), Severity::Error);
        assert_eq!(PositionError::UnassignedChannel.severity(), Severity::Debug);
        assert_eq!(
            PositionError::from(ServoError::Bus).severity(),
            Severity::Error
        );
        assert!(Severity::Error > Severity::Warning);
    }
}
