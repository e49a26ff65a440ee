use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::DEFAULT_ARC_HEIGHT_RATIO;
use crate::models::ChapterLocation;

pub const DEFAULT_FLIGHT_DURATION_MS: f64 = 3500.0;
pub const DEFAULT_ZOOM_OUT_FRACTION: f64 = 0.2;
pub const DEFAULT_DRAW_FRACTION: f64 = 0.6;
pub const DEFAULT_ARC_SAMPLES: usize = 50;

/// Flight pacing. Phase three gets whatever `zoom_out_fraction + draw_fraction`
/// leaves of the total duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlightConfig {
    pub duration_ms: f64,
    pub zoom_out_fraction: f64,
    pub draw_fraction: f64,
    pub arc_samples: usize,
    pub arc_height_ratio: f64,
    /// Abort a running flight when a new chapter arrives instead of ignoring the request.
    pub interrupt_in_flight: bool,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_FLIGHT_DURATION_MS,
            zoom_out_fraction: DEFAULT_ZOOM_OUT_FRACTION,
            draw_fraction: DEFAULT_DRAW_FRACTION,
            arc_samples: DEFAULT_ARC_SAMPLES,
            arc_height_ratio: DEFAULT_ARC_HEIGHT_RATIO,
            interrupt_in_flight: false,
        }
    }
}

impl FlightConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.duration_ms.is_finite() && self.duration_ms > 0.0) {
            return Err(ConfigError::Duration(self.duration_ms));
        }
        let in_unit = |f: f64| f.is_finite() && f > 0.0 && f < 1.0;
        if !in_unit(self.zoom_out_fraction)
            || !in_unit(self.draw_fraction)
            || self.zoom_out_fraction + self.draw_fraction >= 1.0
        {
            return Err(ConfigError::PhaseSplit {
                zoom_out: self.zoom_out_fraction,
                draw: self.draw_fraction,
            });
        }
        if self.arc_samples == 0 {
            return Err(ConfigError::ArcSamples);
        }
        if !self.arc_height_ratio.is_finite() {
            return Err(ConfigError::ArcHeight(self.arc_height_ratio));
        }
        Ok(())
    }

    /// Fraction of the flight at which the zoom-in phase begins.
    pub fn zoom_in_start(&self) -> f64 {
        self.zoom_out_fraction + self.draw_fraction
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrossfadeConfig {
    pub duration_ms: f64,
    pub step_ms: f64,
    pub volume: f64,
}

impl Default for CrossfadeConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000.0,
            step_ms: 50.0,
            volume: 0.6,
        }
    }
}

impl CrossfadeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = self.step_ms.is_finite()
            && self.duration_ms.is_finite()
            && self.step_ms > 0.0
            && self.step_ms <= self.duration_ms;
        if !ok {
            return Err(ConfigError::Crossfade {
                duration_ms: self.duration_ms,
                step_ms: self.step_ms,
            });
        }
        Ok(())
    }
}

/// Everything the story page needs that is not stored with the chapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoryConfig {
    pub intro_view: ChapterLocation,
    pub flight: FlightConfig,
    pub crossfade: CrossfadeConfig,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            // Western Europe overview.
            intro_view: ChapterLocation::new(48.5, 4.0, 4.5),
            flight: FlightConfig::default(),
            crossfade: CrossfadeConfig::default(),
        }
    }
}

impl StoryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.intro_view.validate()?;
        self.flight.validate()?;
        self.crossfade.validate()
    }

    /// Parse and validate a JSON config document. Missing fields take defaults.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: StoryConfig =
            serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
