//! Climate and light readings supplied by the host world

use serde::{Deserialize, Serialize};

/// Climate reading at one position
///
/// Hosts hand these out as `Option<ClimateSample>`; a missing sample means
/// "unknown", and anything driven by climate does nothing for that tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClimateSample {
    /// Temperature in host units (melt formulas assume ~0..40)
    pub temperature: f32,
    /// Rainfall, 0.0 (arid) to 1.0 (wet)
    pub rainfall: f32,
}

impl ClimateSample {
    pub fn new(temperature: f32, rainfall: f32) -> Self {
        Self {
            temperature,
            rainfall,
        }
    }

    /// Rainfall clamped into [0, 1]; NaN reads as dry
    pub fn clamped_rainfall(&self) -> f32 {
        if self.rainfall.is_nan() {
            0.0
        } else {
            self.rainfall.clamp(0.0, 1.0)
        }
    }
}

/// Which climate reading to take
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClimateMode {
    /// Weather right now
    #[default]
    Current,
    /// Long-run average for the season
    SeasonalAverage,
}

/// Which light reading to take
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightMode {
    /// Light at this moment (night is dark)
    Current,
    /// Light the position would receive at midday
    #[default]
    Daylight,
}
