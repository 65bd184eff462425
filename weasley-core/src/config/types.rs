//! Dial configuration type definitions
//!
//! These types describe the clock face: the named zones (sectors) on the
//! dial, the distance scaling constants and the top-level dial config.

use heapless::{String, Vec};

pub use weasley_protocol::MAX_NAME_LEN;

use super::hardware::HandAssignment;
use crate::error::ConfigError;
use crate::geo::Coordinate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum zones on the dial
pub const MAX_ZONES: usize = 16;

/// Maximum zone names remapped to the fallback zone
pub const MAX_UNRESOLVED: usize = 4;

/// Zone that unresolved reports are shown in
pub const DEFAULT_FALLBACK_ZONE: &str = "lost";

/// Report values that mean "location not known"
pub const DEFAULT_UNRESOLVED_ZONES: [&str; 2] = ["unavailable", "unknown"];

/// Hardware angle added after doubling, to centre the hands in the servo travel
pub const DEFAULT_CENTER_SHIFT: i32 = 720;

/// Largest accepted centre shift magnitude, in hardware units
pub const MAX_CENTER_SHIFT: i32 = 100_000;

/// Fixed-capacity name used for zones, people and hands
pub type Name = String<MAX_NAME_LEN>;

/// Zone identifier
pub type ZoneId = Name;

/// Person name
pub type PersonName = Name;

/// Hand identifier
pub type HandId = Name;

/// Build a [`Name`] from a string slice
pub fn name(s: &str) -> Result<Name, ConfigError> {
    let mut out = Name::new();
    out.push_str(s).map_err(|_| ConfigError::NameTooLong)?;
    Ok(out)
}

/// How a hand is placed inside its zone's sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OffsetStyle {
    /// Position within the sector follows distance from home
    Distance,
    /// Hands sharing the zone are spread across the sector
    Staggered,
    /// Sector midpoint
    #[default]
    None,
}

/// A named sector of the dial
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Zone {
    /// Unique zone key
    pub id: ZoneId,
    /// Display label
    pub label: Name,
    /// Start of the sector in degrees, counter-clockwise from the top
    pub base_angle: f64,
    /// Sector width in degrees
    pub theta: f64,
    /// Placement style within the sector
    pub offset_style: OffsetStyle,
    /// Minimum seconds between moves while a hand stays in this zone
    pub update_delay_s: u32,
    /// Distance-style zones below this distance are rendered staggered
    ///
    /// Covers activities done from home (e.g. an indoor trainer ride
    /// reported as the outdoor activity zone).
    pub near_home: Option<f64>,
}

impl Zone {
    /// Create a zone with no update delay
    pub fn new(
        id: &str,
        base_angle: f64,
        theta: f64,
        offset_style: OffsetStyle,
    ) -> Result<Self, ConfigError> {
        if !(0.0..360.0).contains(&base_angle) {
            return Err(ConfigError::InvalidAngle);
        }
        if !(theta >= 0.0 && base_angle + theta <= 360.0) {
            return Err(ConfigError::InvalidTheta);
        }

        Ok(Self {
            id: name(id)?,
            label: name(id)?,
            base_angle,
            theta,
            offset_style,
            update_delay_s: 0,
            near_home: None,
        })
    }

    /// Set the display label
    pub fn with_label(mut self, label: &str) -> Result<Self, ConfigError> {
        self.label = name(label)?;
        Ok(self)
    }

    /// Set the update delay
    pub fn with_delay(mut self, update_delay_s: u32) -> Self {
        self.update_delay_s = update_delay_s;
        self
    }

    /// Set the near-home threshold
    pub fn with_near_home(mut self, threshold: f64) -> Result<Self, ConfigError> {
        if !(threshold >= 0.0 && threshold.is_finite()) {
            return Err(ConfigError::InvalidNearHome);
        }
        self.near_home = Some(threshold);
        Ok(self)
    }

    /// Update delay in milliseconds
    pub fn update_delay_ms(&self) -> u64 {
        u64::from(self.update_delay_s) * 1000
    }

    /// Placement style for a hand at the given distance
    ///
    /// A distance-style zone with a near-home threshold is rendered
    /// staggered when the reported distance is below the threshold.
    pub fn effective_style(&self, distance: f64) -> OffsetStyle {
        match (self.offset_style, self.near_home) {
            (OffsetStyle::Distance, Some(threshold)) if distance < threshold => {
                OffsetStyle::Staggered
            }
            (style, _) => style,
        }
    }
}

/// The set of zones on the dial
#[derive(Debug, Clone)]
pub struct ZoneTable {
    zones: Vec<Zone, MAX_ZONES>,
    fallback: ZoneId,
    unresolved: Vec<ZoneId, MAX_UNRESOLVED>,
}

impl ZoneTable {
    /// Create an empty table with the given fallback zone
    pub fn new(fallback: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            zones: Vec::new(),
            fallback: name(fallback)?,
            unresolved: Vec::new(),
        })
    }

    /// Create an empty table with the default fallback and unresolved names
    pub fn with_defaults() -> Result<Self, ConfigError> {
        let mut table = Self::new(DEFAULT_FALLBACK_ZONE)?;
        for raw in DEFAULT_UNRESOLVED_ZONES {
            table.add_unresolved(raw)?;
        }
        Ok(table)
    }

    /// Add a zone
    pub fn add(&mut self, zone: Zone) -> Result<(), ConfigError> {
        if self.find(&zone.id).is_some() {
            return Err(ConfigError::DuplicateZone);
        }
        self.zones.push(zone).map_err(|_| ConfigError::TooManyEntries)
    }

    /// Register a report value that maps to the fallback zone
    pub fn add_unresolved(&mut self, raw: &str) -> Result<(), ConfigError> {
        let raw = name(raw)?;
        if self.unresolved.contains(&raw) {
            return Ok(());
        }
        self.unresolved
            .push(raw)
            .map_err(|_| ConfigError::TooManyEntries)
    }

    /// Check that the table is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.find(&self.fallback).is_none() {
            return Err(ConfigError::UnknownFallbackZone);
        }
        Ok(())
    }

    /// Map unresolved report values onto the fallback zone
    pub fn resolve<'a>(&'a self, raw: &'a str) -> &'a str {
        if self.unresolved.iter().any(|u| u.as_str() == raw) {
            self.fallback.as_str()
        } else {
            raw
        }
    }

    /// Find a zone by id
    pub fn find(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id.as_str() == id)
    }

    /// Fallback zone id
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Iterate over the zones
    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    /// Number of zones
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Check if the table has no zones
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Logarithmic distance scaling constants
///
/// `scale = clamp((ln(k·d + c) - ln(c)) / ln(D_max), 0, 1)`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScalerConfig {
    /// Curve steepness (k)
    pub steepness: f64,
    /// Offset keeping the logarithm finite at zero (c)
    pub offset: f64,
    /// Distance at which the curve saturates (D_max)
    pub saturation: f64,
}

impl Default for ScalerConfig {
    fn default() -> Self {
        Self {
            steepness: 1.7,
            offset: 1.1,
            saturation: 2500.0,
        }
    }
}

impl ScalerConfig {
    /// Check that the constants define a usable curve
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steepness > 0.0 && self.offset > 0.0 && self.saturation > 1.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidScaling)
        }
    }
}

/// Complete dial configuration
///
/// This is the top-level, read-only configuration shared by the ingress
/// adapter and the positioning scheduler.
#[derive(Debug, Clone)]
pub struct DialConfig {
    /// Zones on the dial
    pub zones: ZoneTable,
    /// Person → hand → channel assignment
    pub hands: HandAssignment,
    /// Distance scaling constants
    pub scaling: ScalerConfig,
    /// Hardware angle offset applied after doubling
    pub center_shift: i32,
    /// Home coordinate used to derive distance from reported positions
    pub home: Option<Coordinate>,
}

impl DialConfig {
    /// Create a dial config with default scaling and centre shift
    pub fn new(zones: ZoneTable, hands: HandAssignment) -> Self {
        Self {
            zones,
            hands,
            scaling: ScalerConfig::default(),
            center_shift: DEFAULT_CENTER_SHIFT,
            home: None,
        }
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-MAX_CENTER_SHIFT..=MAX_CENTER_SHIFT).contains(&self.center_shift) {
            return Err(ConfigError::InvalidCenterShift);
        }
        self.zones.validate()?;
        self.scaling.validate()
    }
}
