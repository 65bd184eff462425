//! Ingress adapter
//!
//! Turns one inbound message into a hand state write. Writing never moves
//! a hand; moves only happen on the scheduler's tick.

use embassy_sync::blocking_mutex::raw::RawMutex;
use weasley_protocol::LocationReport;

use crate::config::{DialConfig, ZoneId};
use crate::error::IngestError;
use crate::geo::{great_circle_miles, Coordinate};
use crate::state::HandStateStore;

/// What an accepted message did
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Hand state updated
    Recorded {
        /// Zone after fallback remapping
        zone: ZoneId,
        /// Reported or derived distance
        distance: f64,
    },
    /// Report carried no zone; nothing changed
    NoZone,
}

/// Writes decoded location reports into the hand state store
pub struct IngressAdapter<'a, M: RawMutex> {
    config: &'a DialConfig,
    store: &'a HandStateStore<M>,
}

impl<'a, M: RawMutex> IngressAdapter<'a, M> {
    /// Create an adapter that writes hand updates into `store`
    pub fn new(config: &'a DialConfig, store: &'a HandStateStore<M>) -> Self {
        Self { config, store }
    }

    /// Decode a raw payload and record it for `person`
    ///
    /// On error the store is left untouched.
    pub fn ingest(
        &self,
        person: &str,
        payload: &[u8],
        now_ms: u64,
    ) -> Result<IngestOutcome, IngestError> {
        let report = LocationReport::decode(payload)?;
        self.apply(person, &report, now_ms)
    }

    /// Record an already decoded report for `person`
    pub fn apply(
        &self,
        person: &str,
        report: &LocationReport,
        now_ms: u64,
    ) -> Result<IngestOutcome, IngestError> {
        let Some(raw) = report.zone.as_ref() else {
            return Ok(IngestOutcome::NoZone);
        };

        let zones = &self.config.zones;
        let zone = zones
            .find(zones.resolve(raw))
            .ok_or_else(|| IngestError::UnknownZone(raw.clone()))?;

        let distance = self.distance(report);
        self.store.record(person, &zone.id, distance, now_ms)?;

        Ok(IngestOutcome::Recorded {
            zone: zone.id.clone(),
            distance,
        })
    }

    /// Reported distance, or the distance from home to the reported position
    ///
    /// Coordinates are only used when the distance is missing or zero and a
    /// home position is configured.
    fn distance(&self, report: &LocationReport) -> f64 {
        let reported = report.distance.unwrap_or(0.0);
        if reported != 0.0 {
            return reported.max(0.0);
        }

        match (report.coordinates(), self.config.home) {
            (Some((latitude, longitude)), Some(home)) => {
                great_circle_miles(home, Coordinate::new(latitude, longitude))
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{dial_config, Store, HOME};
    use weasley_protocol::DecodeError;

    #[test]
    fn test_records_zone_and_distance() {
        let config = dial_config();
        let store = Store::new();
        let ingress = IngressAdapter::new(&config, &store);

        let outcome = ingress
            .ingest("alice", br#"{"zone":"work","distance":3.5}"#, 100)
            .unwrap();
        assert_eq!(
            outcome,
            IngestOutcome::Recorded {
                zone: ZoneId::try_from("work").unwrap(),
                distance: 3.5
            }
        );

        let state = store.snapshot("alice").unwrap();
        assert_eq!(state.zone.as_deref(), Some("work"));
        assert_eq!(state.distance, 3.5);
        assert_eq!(state.last_updated_ms, 100);
        assert!(!state.has_been_positioned());
    }

    #[test]
    fn test_unresolved_zone_remapped() {
        let config = dial_config();
        let store = Store::new();
        let ingress = IngressAdapter::new(&config, &store);

        ingress
            .ingest("alice", br#"{"state":"unavailable"}"#, 0)
            .unwrap();
        assert_eq!(
            store.snapshot("alice").unwrap().zone.as_deref(),
            Some("lost")
        );
    }

    #[test]
    fn test_distance_from_coordinates() {
        let config = dial_config();
        let store = Store::new();
        let ingress = IngressAdapter::new(&config, &store);

        let payload = br#"{"zone":"lost","latitude":40.7128,"longitude":-74.0060,"distance":0}"#;
        let Ok(IngestOutcome::Recorded { distance, .. }) = ingress.ingest("alice", payload, 0)
        else {
            panic!("expected a recorded report");
        };
        assert!((distance - 190.0).abs() < 2.0, "got {distance}");

        // At home
        let payload = std::format!(
            r#"{{"zone":"home","latitude":{},"longitude":{}}}"#,
            HOME.latitude,
            HOME.longitude
        );
        ingress.ingest("alice", payload.as_bytes(), 1).unwrap();
        assert_eq!(store.snapshot("alice").unwrap().distance, 0.0);
    }

    #[test]
    fn test_reported_distance_wins() {
        let config = dial_config();
        let store = Store::new();
        let ingress = IngressAdapter::new(&config, &store);

        let payload = br#"{"zone":"lost","latitude":40.7128,"longitude":-74.0060,"distance":7}"#;
        ingress.ingest("alice", payload, 0).unwrap();
        assert_eq!(store.snapshot("alice").unwrap().distance, 7.0);
    }

    #[test]
    fn test_coordinates_without_home() {
        let mut config = dial_config();
        config.home = None;
        let store = Store::new();
        let ingress = IngressAdapter::new(&config, &store);

        let payload = br#"{"zone":"lost","latitude":40.7128,"longitude":-74.0060}"#;
        ingress.ingest("alice", payload, 0).unwrap();
        assert_eq!(store.snapshot("alice").unwrap().distance, 0.0);
    }

    #[test]
    fn test_negative_distance_clamped() {
        let config = dial_config();
        let store = Store::new();
        let ingress = IngressAdapter::new(&config, &store);

        ingress
            .ingest("alice", br#"{"zone":"lost","distance":-12}"#, 0)
            .unwrap();
        assert_eq!(store.snapshot("alice").unwrap().distance, 0.0);
    }

    #[test]
    fn test_no_zone_is_a_no_op() {
        let config = dial_config();
        let store = Store::new();
        let ingress = IngressAdapter::new(&config, &store);

        ingress.ingest("alice", br#"{"zone":"work"}"#, 0).unwrap();
        let before = store.snapshot("alice").unwrap();

        let outcome = ingress.ingest("alice", br#"{"distance":12}"#, 50).unwrap();
        assert_eq!(outcome, IngestOutcome::NoZone);
        assert_eq!(store.snapshot("alice").unwrap(), before);

        assert_eq!(
            ingress.ingest("bob", br#"{}"#, 50),
            Ok(IngestOutcome::NoZone)
        );
        assert!(store.snapshot("bob").is_none());
    }

    #[test]
    fn test_unknown_zone_rejected_without_mutation() {
        let config = dial_config();
        let store = Store::new();
        let ingress = IngressAdapter::new(&config, &store);

        ingress.ingest("alice", br#"{"zone":"home"}"#, 0).unwrap();
        let before = store.snapshot("alice").unwrap();

        assert_eq!(
            ingress.ingest("alice", br#"{"zone":"narnia"}"#, 10),
            Err(IngestError::UnknownZone(ZoneId::try_from("narnia").unwrap()))
        );
        assert_eq!(store.snapshot("alice").unwrap(), before);
    }

    #[test]
    fn test_decode_errors_propagate() {
        let config = dial_config();
        let store = Store::new();
        let ingress = IngressAdapter::new(&config, &store);

        assert_eq!(
            ingress.ingest("alice", b"not json", 0),
            Err(IngestError::Decode(DecodeError::Malformed))
        );
        assert!(store.is_empty());
    }
}
