//! Location report payloads
//!
//! A report is a JSON object with any of the following fields:
//!
//! | field       | type                    | meaning                         |
//! |-------------|-------------------------|---------------------------------|
//! | `zone`      | string (alias `state`)  | zone id on the dial             |
//! | `distance`  | number or numeric text  | distance from home              |
//! | `latitude`  | number or numeric text  | reported position               |
//! | `longitude` | number or numeric text  | reported position               |
//!
//! Decoding only turns the payload into typed optional fields. Resolving
//! the zone and deriving a distance from coordinates happens in the core.

use core::fmt;

use heapless::String;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

use crate::MAX_NAME_LEN;

/// Zone name as carried in a report
pub type ZoneName = String<MAX_NAME_LEN>;

/// Errors that can occur while decoding a report payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Payload is not valid UTF-8
    InvalidUtf8,
    /// Payload is not a JSON object of the expected shape
    Malformed,
    /// A numeric field holds something that is not a finite number
    InvalidNumber,
    /// The zone name does not fit in [`MAX_NAME_LEN`] bytes
    FieldTooLong,
}

/// A decoded location report
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocationReport {
    /// Reported zone, if any
    pub zone: Option<ZoneName>,
    /// Reported distance from home
    pub distance: Option<f64>,
    /// Reported latitude in degrees
    pub latitude: Option<f64>,
    /// Reported longitude in degrees
    pub longitude: Option<f64>,
}

impl LocationReport {
    /// Decode a report from a raw payload
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        let text = core::str::from_utf8(payload).map_err(|_| DecodeError::InvalidUtf8)?;
        let raw: RawReport = serde_json::from_str(text).map_err(|_| DecodeError::Malformed)?;

        let zone = match raw.zone {
            Some(ZoneField::Name(name)) if !name.is_empty() => Some(name),
            Some(ZoneField::Name(_)) | None => None,
            Some(ZoneField::TooLong) => return Err(DecodeError::FieldTooLong),
        };

        Ok(Self {
            zone,
            distance: number(raw.distance)?,
            latitude: number(raw.latitude)?,
            longitude: number(raw.longitude)?,
        })
    }

    /// Reported zone as a string slice
    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    /// Latitude/longitude pair, when both are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

fn number(field: Option<NumberField>) -> Result<Option<f64>, DecodeError> {
    match field {
        Some(NumberField::Value(v)) => Ok(Some(v)),
        Some(NumberField::Invalid) => Err(DecodeError::InvalidNumber),
        None => Ok(None),
    }
}

/// Wire shape of a report
#[derive(Deserialize)]
struct RawReport {
    #[serde(default, alias = "state")]
    zone: Option<ZoneField>,
    #[serde(default)]
    distance: Option<NumberField>,
    #[serde(default)]
    latitude: Option<NumberField>,
    #[serde(default)]
    longitude: Option<NumberField>,
}

/// Zone field, keeping overflow distinct from malformed input
enum ZoneField {
    Name(ZoneName),
    TooLong,
}

impl<'de> Deserialize<'de> for ZoneField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ZoneVisitor;

        impl<'de> Visitor<'de> for ZoneVisitor {
            type Value = ZoneField;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a zone name")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ZoneField, E> {
                let mut name = ZoneName::new();
                match name.push_str(v.trim()) {
                    Ok(()) => Ok(ZoneField::Name(name)),
                    Err(()) => Ok(ZoneField::TooLong),
                }
            }
        }

        deserializer.deserialize_str(ZoneVisitor)
    }
}

/// Numeric field that also accepts numeric strings
enum NumberField {
    Value(f64),
    Invalid,
}

impl NumberField {
    fn finite(v: f64) -> Self {
        if v.is_finite() {
            NumberField::Value(v)
        } else {
            NumberField::Invalid
        }
    }
}

impl<'de> Deserialize<'de> for NumberField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NumberVisitor;

        impl<'de> Visitor<'de> for NumberVisitor {
            type Value = NumberField;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a number or numeric string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<NumberField, E> {
                Ok(NumberField::finite(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<NumberField, E> {
                Ok(NumberField::Value(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<NumberField, E> {
                Ok(NumberField::Value(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<NumberField, E> {
                Ok(v.trim()
                    .parse::<f64>()
                    .map(NumberField::finite)
                    .unwrap_or(NumberField::Invalid))
            }

            fn visit_bool<E: de::Error>(self, _v: bool) -> Result<NumberField, E> {
                Ok(NumberField::Invalid)
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zone_and_distance() {
        let report = LocationReport::decode(br#"{"zone": "work", "distance": 3.5}"#).unwrap();
        assert_eq!(report.zone(), Some("work"));
        assert_eq!(report.distance, Some(3.5));
        assert_eq!(report.coordinates(), None);
    }

    #[test]
    fn test_state_alias() {
        let report = LocationReport::decode(br#"{"state":"home"}"#).unwrap();
        assert_eq!(report.zone(), Some("home"));
        assert_eq!(report.distance, None);
    }

    #[test]
    fn test_numeric_strings() {
        let report = LocationReport::decode(
            br#"{"state":"intransit","latitude":"42.36","longitude":"-71.06","distance":"0"}"#,
        )
        .unwrap();
        assert_eq!(report.coordinates(), Some((42.36, -71.06)));
        assert_eq!(report.distance, Some(0.0));
    }

    #[test]
    fn test_integer_distance() {
        let report = LocationReport::decode(br#"{"zone":"lost","distance":12}"#).unwrap();
        assert_eq!(report.distance, Some(12.0));
    }

    #[test]
    fn test_missing_zone_is_not_an_error() {
        let report = LocationReport::decode(br#"{"distance": 1.0}"#).unwrap();
        assert_eq!(report.zone(), None);

        let report = LocationReport::decode(br#"{"zone": "  "}"#).unwrap();
        assert_eq!(report.zone(), None);

        let report = LocationReport::decode(br#"{"zone": null}"#).unwrap();
        assert_eq!(report.zone(), None);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let report =
            LocationReport::decode(br#"{"zone":"school","gps_accuracy":12,"source":"gps"}"#)
                .unwrap();
        assert_eq!(report.zone(), Some("school"));
    }

    #[test]
    fn test_invalid_number() {
        assert_eq!(
            LocationReport::decode(br#"{"zone":"work","distance":"far"}"#),
            Err(DecodeError::InvalidNumber)
        );
        assert_eq!(
            LocationReport::decode(br#"{"zone":"work","latitude":true}"#),
            Err(DecodeError::InvalidNumber)
        );
        assert_eq!(
            LocationReport::decode(br#"{"zone":"work","distance":"inf"}"#),
            Err(DecodeError::InvalidNumber)
        );
    }

    #[test]
    fn test_malformed() {
        assert_eq!(LocationReport::decode(b"{"), Err(DecodeError::Malformed));
        assert_eq!(LocationReport::decode(b"[1,2]"), Err(DecodeError::Malformed));
        assert_eq!(LocationReport::decode(b"\"home\""), Err(DecodeError::Malformed));
        assert_eq!(
            LocationReport::decode(br#"{"zone": 7}"#),
            Err(DecodeError::Malformed)
        );
    }

    #[test]
    fn test_invalid_utf8() {
        assert_eq!(
            LocationReport::decode(&[0x7B, 0xFF, 0xFE, 0x7D]),
            Err(DecodeError::InvalidUtf8)
        );
    }

    #[test]
    fn test_zone_too_long() {
        assert_eq!(
            LocationReport::decode(br#"{"zone":"a-zone-name-that-is-far-too-long-for-the-dial"}"#),
            Err(DecodeError::FieldTooLong)
        );
    }

    proptest! {
        #[test]
        fn decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
            let _ = LocationReport::decode(&bytes);
        }
    }
}
