//! Logarithmic distance scaling
//!
//! Maps a distance to a position in [0, 1] within a sector. Resolution is
//! highest near home and large distances are compressed.
//!
//! Reference points with the default constants (k = 1.7, c = 1.1,
//! D_max = 2500):
//!
//! | distance | scale |
//! |----------|-------|
//! | 0        | 0.00  |
//! | 1        | 0.12  |
//! | 10       | 0.36  |
//! | 100      | 0.65  |
//! | 500      | 0.85  |
//! | ≥ 2500   | 1.00  |

use crate::config::ScalerConfig;

/// Distance scaler with precomputed logarithms
#[derive(Debug, Clone, Copy)]
pub struct DistanceScaler {
    config: ScalerConfig,
    ln_offset: f64,
    ln_saturation: f64,
}

impl DistanceScaler {
    /// Create a scaler from validated constants
    pub fn new(config: ScalerConfig) -> Self {
        Self {
            config,
            ln_offset: libm::log(config.offset),
            ln_saturation: libm::log(config.saturation),
        }
    }

    /// Scale a distance into [0, 1]
    ///
    /// Negative or undefined distances are treated as zero. Distances at
    /// or beyond saturation return exactly 1.0.
    pub fn scale(&self, distance: f64) -> f64 {
        if !(distance > 0.0) {
            return 0.0;
        }
        if distance >= self.config.saturation {
            return 1.0;
        }

        let raw = libm::log(self.config.steepness * distance + self.config.offset);
        ((raw - self.ln_offset) / self.ln_saturation).clamp(0.0, 1.0)
    }

    /// Constants this scaler was built from
    pub fn config(&self) -> &ScalerConfig {
        &self.config
    }
}

impl Default for DistanceScaler {
    fn default() -> Self {
        Self::new(ScalerConfig::default())
    }
}
