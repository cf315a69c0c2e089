//! Generator configuration, loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::layer::LayerKind;
use crate::noise_source::{CoherentNoise, NoiseKind};

/// Zoom and detail of one layer relative to the map scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerParams {
    /// Multiplier applied to the map scale (larger = smoother).
    pub scale_factor: f64,
    /// Number of fractal passes.
    pub octaves: u32,
}

impl LayerParams {
    pub const fn new(scale_factor: f64, octaves: u32) -> Self {
        Self { scale_factor, octaves }
    }

    pub fn defaults_for(kind: LayerKind) -> Self {
        match kind {
            LayerKind::Peaks => Self::new(4.0, 8),
            LayerKind::Continentalness => Self::new(8.0, 3),
            LayerKind::Temperature => Self::new(32.0, 3),
            LayerKind::Humidity => Self::new(16.0, 3),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub width: usize,
    pub height: usize,
    /// Map zoom; smaller values show more detailed, zoomed-in terrain.
    pub scale: f64,
    /// Master seed; a random one is picked when absent.
    pub seed: Option<u64>,
    pub noise: NoiseKind,
    /// Override for the noise primitive's output bound.
    pub amplitude_bound: Option<f64>,
    pub peaks: LayerParams,
    pub continentalness: LayerParams,
    pub temperature: LayerParams,
    pub humidity: LayerParams,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            scale: 0.5,
            seed: None,
            noise: NoiseKind::default(),
            amplitude_bound: None,
            peaks: LayerParams::defaults_for(LayerKind::Peaks),
            continentalness: LayerParams::defaults_for(LayerKind::Continentalness),
            temperature: LayerParams::defaults_for(LayerKind::Temperature),
            humidity: LayerParams::defaults_for(LayerKind::Humidity),
        }
    }
}

impl GeneratorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn layer(&self, kind: LayerKind) -> LayerParams {
        match kind {
            LayerKind::Peaks => self.peaks,
            LayerKind::Continentalness => self.continentalness,
            LayerKind::Temperature => self.temperature,
            LayerKind::Humidity => self.humidity,
        }
    }

    pub fn noise_source(&self) -> CoherentNoise {
        let source = CoherentNoise::new(self.noise);
        match self.amplitude_bound {
            Some(bound) => source.with_bound(bound),
            None => source,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MapError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(MapError::InvalidScale(self.scale));
        }
        if let Some(bound) = self.amplitude_bound {
            if !bound.is_finite() || bound <= 0.0 {
                return Err(MapError::InvalidScale(bound));
            }
        }
        for &kind in LayerKind::all() {
            let params = self.layer(kind);
            if params.octaves == 0 {
                return Err(MapError::InvalidOctaves(kind.name()));
            }
            let layer_scale = self.scale * params.scale_factor;
            if !layer_scale.is_finite() || layer_scale <= 0.0 {
                return Err(MapError::InvalidScale(layer_scale));
            }
        }
        Ok(())
    }
}
