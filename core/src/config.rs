//! Generation and rendering parameters.
//!
//! Every field has a default, so a TOML file only needs to name the values it
//! overrides:
//!
//! ```toml
//! stride = 6
//! octaves = 4
//! iso_range = [0.25, 0.75]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TopoError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Pixels between grid samples.
    pub stride: u32,
    /// Number of noise layers summed by fbm.
    pub octaves: u32,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
    /// Amplitude multiplier per octave.
    pub persistence: f64,
    /// Domain warp strength in pixels.
    pub warp_amount: f64,
    /// Number of contour lines drawn.
    pub num_levels: u32,
    /// Iso-values are spread over `[min, max)`.
    pub iso_range: (f64, f64),
    /// Every n-th level is drawn with the major stroke.
    pub major_every: u32,
    pub major_stroke: f32,
    pub minor_stroke: f32,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            width: 480,
            height: 800,
            stride: 4,
            octaves: 3,
            lacunarity: 2.0,
            persistence: 0.4,
            warp_amount: 70.0,
            num_levels: 12,
            iso_range: (0.30, 0.70),
            major_every: 5,
            major_stroke: 1.5,
            minor_stroke: 0.75,
        }
    }
}

impl ContourConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ContourConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject parameters that would yield an empty or meaningless field.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(TopoError::invalid("width", "must be positive"));
        }
        if self.height == 0 {
            return Err(TopoError::invalid("height", "must be positive"));
        }
        if self.stride == 0 {
            return Err(TopoError::invalid("stride", "must be positive"));
        }
        if self.octaves == 0 {
            return Err(TopoError::invalid("octaves", "at least one octave is required"));
        }
        positive("lacunarity", self.lacunarity)?;
        positive("persistence", self.persistence)?;
        if !self.warp_amount.is_finite() || self.warp_amount < 0.0 {
            return Err(TopoError::invalid(
                "warp_amount",
                format!("must be finite and non-negative, got {}", self.warp_amount),
            ));
        }
        if self.num_levels == 0 {
            return Err(TopoError::invalid("num_levels", "must be positive"));
        }
        let (lo, hi) = self.iso_range;
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(TopoError::invalid(
                "iso_range",
                format!("expected finite min < max, got [{}, {}]", lo, hi),
            ));
        }
        if self.major_every == 0 {
            return Err(TopoError::invalid("major_every", "must be positive"));
        }
        positive("major_stroke", self.major_stroke as f64)?;
        positive("minor_stroke", self.minor_stroke as f64)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TopoError::invalid(
            field,
            format!("must be finite and positive, got {}", value),
        ))
    }
}
