//! `clock.toml` schema and conversion
//!
//! The file is deserialised into plain std types first, then every entry
//! is checked while building the fixed-capacity [`DialConfig`].

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use weasley_core::config::{
    DialConfig, HandAssignment, OffsetStyle, ScalerConfig, Zone, ZoneTable,
    DEFAULT_CENTER_SHIFT, DEFAULT_FALLBACK_ZONE, DEFAULT_UNRESOLVED_ZONES,
};
use weasley_core::error::ConfigError;
use weasley_core::geo::Coordinate;
use weasley_drivers::servo::{ServoCalibration, DEFAULT_ADDRESS, DEFAULT_FREQUENCY_HZ};

/// Default configuration compiled into the binary
pub const EMBEDDED_CONFIG: &str = include_str!("../../clock.toml");

/// Default tick period
const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Default I2C bus device
const DEFAULT_I2C_BUS: &str = "/dev/i2c-1";

/// Errors loading the configuration (fatal at startup)
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("zone '{zone}': {error:?}")]
    Zone { zone: String, error: ConfigError },
    #[error("unresolved zone '{name}': {error:?}")]
    Unresolved { name: String, error: ConfigError },
    #[error("hand assignment '{name}': {error:?}")]
    Assignment { name: String, error: ConfigError },
    #[error("[channel_config.{0}] is not a channel number")]
    ChannelKey(String),
    #[error("[channel_config.{0}] does not describe a usable servo")]
    Calibration(u8),
    #[error("tick_interval_ms must be greater than zero")]
    TickInterval,
    #[error("invalid dial configuration: {0:?}")]
    Dial(ConfigError),
}

/// I2C settings for the PWM board
#[derive(Debug, Clone, PartialEq)]
pub struct PwmSettings {
    pub i2c_bus: PathBuf,
    pub address: u8,
    pub frequency_hz: u16,
}

/// Everything the daemon reads from `clock.toml`
#[derive(Debug, Clone)]
pub struct ClockConfig {
    /// Validated dial configuration
    pub dial: DialConfig,
    /// Calibration for every channel a hand is assigned to
    pub calibrations: Vec<(u8, ServoCalibration)>,
    pub pwm: PwmSettings,
    pub tick_interval_ms: u64,
}

/// Load from `path`, or from the embedded default when `None`
pub fn load(path: Option<&Path>) -> Result<ClockConfig, LoadError> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            parse_config(&text)
        }
        None => parse_config(EMBEDDED_CONFIG),
    }
}

/// Parse and validate a configuration document
pub fn parse_config(text: &str) -> Result<ClockConfig, LoadError> {
    let file: ClockFile = toml::from_str(text)?;
    file.into_config()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClockFile {
    #[serde(default = "default_center_shift")]
    center_shift: i32,
    #[serde(default = "default_fallback_zone")]
    fallback_zone: String,
    #[serde(default = "default_unresolved_zones")]
    unresolved_zones: Vec<String>,
    #[serde(default = "default_tick_interval_ms")]
    tick_interval_ms: u64,
    home: Option<HomeSection>,
    #[serde(default)]
    scaling: ScalingSection,
    zone: BTreeMap<String, ZoneSection>,
    #[serde(default)]
    hands: BTreeMap<String, String>,
    #[serde(default)]
    channels: BTreeMap<String, u8>,
    #[serde(default)]
    channel_config: BTreeMap<String, ChannelSection>,
    #[serde(default)]
    pwm: PwmSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HomeSection {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct ScalingSection {
    steepness: f64,
    offset: f64,
    saturation: f64,
}

impl Default for ScalingSection {
    fn default() -> Self {
        let defaults = ScalerConfig::default();
        Self {
            steepness: defaults.steepness,
            offset: defaults.offset,
            saturation: defaults.saturation,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ZoneSection {
    label: Option<String>,
    angle: f64,
    theta: f64,
    #[serde(default)]
    offset_style: OffsetStyle,
    #[serde(default)]
    update_delay_s: u32,
    near_home: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct ChannelSection {
    pulse_min_us: u16,
    pulse_max_us: u16,
    actuation_range: u16,
}

impl Default for ChannelSection {
    fn default() -> Self {
        let defaults = ServoCalibration::default();
        Self {
            pulse_min_us: defaults.pulse_min_us,
            pulse_max_us: defaults.pulse_max_us,
            actuation_range: defaults.actuation_range,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct PwmSection {
    i2c_bus: PathBuf,
    address: u8,
    frequency_hz: u16,
}

impl Default for PwmSection {
    fn default() -> Self {
        Self {
            i2c_bus: PathBuf::from(DEFAULT_I2C_BUS),
            address: DEFAULT_ADDRESS,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
        }
    }
}

fn default_center_shift() -> i32 {
    DEFAULT_CENTER_SHIFT
}

fn default_fallback_zone() -> String {
    DEFAULT_FALLBACK_ZONE.to_string()
}

fn default_unresolved_zones() -> Vec<String> {
    DEFAULT_UNRESOLVED_ZONES.iter().map(|z| z.to_string()).collect()
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

impl ClockFile {
    fn into_config(self) -> Result<ClockConfig, LoadError> {
        if self.tick_interval_ms == 0 {
            return Err(LoadError::TickInterval);
        }

        let mut zones = ZoneTable::new(&self.fallback_zone).map_err(LoadError::Dial)?;
        for raw in &self.unresolved_zones {
            zones.add_unresolved(raw).map_err(|error| LoadError::Unresolved {
                name: raw.clone(),
                error,
            })?;
        }
        for (id, section) in &self.zone {
            let zone = section.to_zone(id).map_err(|error| LoadError::Zone {
                zone: id.clone(),
                error,
            })?;
            zones.add(zone).map_err(|error| LoadError::Zone {
                zone: id.clone(),
                error,
            })?;
        }

        let mut hands = HandAssignment::new();
        for (person, hand) in &self.hands {
            hands
                .assign_person(person, hand)
                .map_err(|error| LoadError::Assignment {
                    name: person.clone(),
                    error,
                })?;
        }
        for (hand, channel) in &self.channels {
            hands
                .assign_channel(hand, *channel)
                .map_err(|error| LoadError::Assignment {
                    name: hand.clone(),
                    error,
                })?;
        }

        let mut overrides = BTreeMap::new();
        for (key, section) in &self.channel_config {
            let channel: u8 = key
                .trim()
                .parse()
                .map_err(|_| LoadError::ChannelKey(key.clone()))?;
            let calibration = ServoCalibration {
                pulse_min_us: section.pulse_min_us,
                pulse_max_us: section.pulse_max_us,
                actuation_range: section.actuation_range,
            };
            if !calibration.is_valid() {
                return Err(LoadError::Calibration(channel));
            }
            overrides.insert(channel, calibration);
        }

        let calibrations = hands
            .channels()
            .map(|(_, channel)| {
                let calibration = overrides.get(&channel).copied().unwrap_or_default();
                (channel, calibration)
            })
            .collect();

        let mut dial = DialConfig::new(zones, hands);
        dial.center_shift = self.center_shift;
        dial.scaling = ScalerConfig {
            steepness: self.scaling.steepness,
            offset: self.scaling.offset,
            saturation: self.scaling.saturation,
        };
        dial.home = self
            .home
            .map(|home| Coordinate::new(home.latitude, home.longitude));
        dial.validate().map_err(LoadError::Dial)?;

        Ok(ClockConfig {
            dial,
            calibrations,
            pwm: PwmSettings {
                i2c_bus: self.pwm.i2c_bus,
                address: self.pwm.address,
                frequency_hz: self.pwm.frequency_hz,
            },
            tick_interval_ms: self.tick_interval_ms,
        })
    }
}

impl ZoneSection {
    fn to_zone(&self, id: &str) -> Result<Zone, ConfigError> {
        let mut zone = Zone::new(id, self.angle, self.theta, self.offset_style)?
            .with_delay(self.update_delay_s);
        if let Some(label) = &self.label {
            zone = zone.with_label(label)?;
        }
        if let Some(threshold) = self.near_home {
            zone = zone.with_near_home(threshold)?;
        }
        Ok(zone)
    }
}
