//! Map compositing
//!
//! Combines four noise layers (peaks, continentalness, temperature, humidity)
//! into a colored terrain map:
//! 1. Low continentalness becomes ocean, banded into ridge steps
//! 2. A periodic function of climate and peaks carves river bands
//! 3. Everything else is land, colored by biome and shaded by height

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::biome::Biome;
use crate::color::Color;
use crate::config::GeneratorConfig;
use crate::error::{MapError, Result};
use crate::layer::{LayerKind, NoiseLayer};
use crate::noise_source::NoiseSource;
use crate::raster::PixelBuffer;
use crate::seeds::LayerSeeds;

// =============================================================================
// COMPOSITING CONSTANTS
// =============================================================================

/// Continentalness below this is ocean.
pub const SEA_LEVEL: f64 = 0.4;
/// Number of brightness steps across the ocean range.
const OCEAN_RIDGE_COUNT: f64 = 4.0;
const OCEAN_COLOR: Color = Color::new(0.24, 0.28, 0.97);

/// Period of the riverness function.
const RIVER_PERIOD: f64 = 0.4;
/// Riverness below this, or at/above `RIVER_PERIOD - RIVER_WIDTH`, is river.
const RIVER_WIDTH: f64 = 0.01;
const RIVER_COLOR: Color = Color::new(0.30, 0.34, 0.98);

// =============================================================================
// PER-PIXEL CLASSIFICATION
// =============================================================================

/// The four layer values at one pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainSample {
    pub peak: f64,
    pub continentalness: f64,
    pub temperature: f64,
    pub humidity: f64,
}

/// What a pixel turned out to be, with the data needed to shade it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Terrain {
    /// `ridge` is the continentalness band in `{0, 0.25, 0.5, 0.75}`.
    Ocean { ridge: f64 },
    River,
    Land { biome: Biome, height: f64 },
}

impl Terrain {
    pub fn classify(sample: &TerrainSample) -> Self {
        if sample.continentalness < SEA_LEVEL {
            let ridge = (sample.continentalness / SEA_LEVEL * OCEAN_RIDGE_COUNT).floor()
                / OCEAN_RIDGE_COUNT;
            return Terrain::Ocean { ridge };
        }

        let riverness = riverness(sample);
        if riverness < RIVER_WIDTH || riverness >= RIVER_PERIOD - RIVER_WIDTH {
            return Terrain::River;
        }

        let continental_height = (sample.continentalness - SEA_LEVEL) / (1.0 - SEA_LEVEL);
        // negative heights would make the fractional power NaN
        let height = continental_height * 0.6
            + sample.peak * continental_height.max(0.0).powf(0.3) * 0.4;
        Terrain::Land {
            biome: Biome::classify(sample.temperature, sample.humidity),
            height,
        }
    }

    pub fn brightness(&self) -> f64 {
        match *self {
            Terrain::Ocean { ridge } => 0.5 + ridge * 0.5,
            Terrain::River => 1.0,
            Terrain::Land { height, .. } => 0.75 + height * 0.4,
        }
    }

    pub fn base_color(&self) -> Color {
        match *self {
            Terrain::Ocean { .. } => OCEAN_COLOR,
            Terrain::River => RIVER_COLOR,
            Terrain::Land { biome, .. } => biome.base_color(),
        }
    }

    /// Final, shaded color.
    pub fn color(&self) -> Color {
        self.base_color() * self.brightness()
    }
}

pub fn riverness(sample: &TerrainSample) -> f64 {
    (sample.temperature + sample.humidity + sample.peak * 0.25).rem_euclid(RIVER_PERIOD)
}

// =============================================================================
// LAYER SET
// =============================================================================

/// The four generated layers, all sharing one size.
#[derive(Clone, Debug)]
pub struct TerrainLayers {
    pub peaks: NoiseLayer,
    pub continentalness: NoiseLayer,
    pub temperature: NoiseLayer,
    pub humidity: NoiseLayer,
}

impl TerrainLayers {
    pub fn layer(&self, kind: LayerKind) -> &NoiseLayer {
        match kind {
            LayerKind::Peaks => &self.peaks,
            LayerKind::Continentalness => &self.continentalness,
            LayerKind::Temperature => &self.temperature,
            LayerKind::Humidity => &self.humidity,
        }
    }

    pub fn width(&self) -> usize {
        self.peaks.width
    }

    pub fn height(&self) -> usize {
        self.peaks.height
    }

    fn check_sizes(&self) -> Result<()> {
        let (width, height) = (self.width(), self.height());
        for &kind in LayerKind::all() {
            let layer = self.layer(kind);
            if layer.width != width || layer.height != height {
                return Err(MapError::InvalidDimensions {
                    width: layer.width,
                    height: layer.height,
                });
            }
        }
        Ok(())
    }

    pub fn sample(&self, x: usize, y: usize) -> Result<TerrainSample> {
        Ok(TerrainSample {
            peak: self.peaks.get(x, y)?,
            continentalness: self.continentalness.get(x, y)?,
            temperature: self.temperature.get(x, y)?,
            humidity: self.humidity.get(x, y)?,
        })
    }

    /// Sample by row-major index; the caller guarantees it is in range.
    fn sample_index(&self, idx: usize) -> TerrainSample {
        TerrainSample {
            peak: self.peaks.values()[idx],
            continentalness: self.continentalness.values()[idx],
            temperature: self.temperature.values()[idx],
            humidity: self.humidity.values()[idx],
        }
    }
}

// =============================================================================
// COMPOSITOR
// =============================================================================

/// Terrain class and biome counts over a whole map.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TerrainStats {
    pub ocean: usize,
    pub river: usize,
    pub land: usize,
    pub biomes: BTreeMap<Biome, usize>,
}

impl TerrainStats {
    pub fn total(&self) -> usize {
        self.ocean + self.river + self.land
    }

    fn percent(&self, count: usize) -> f64 {
        match self.total() {
            0 => 0.0,
            total => 100.0 * count as f64 / total as f64,
        }
    }

    pub fn ocean_percent(&self) -> f64 {
        self.percent(self.ocean)
    }

    pub fn river_percent(&self) -> f64 {
        self.percent(self.river)
    }

    pub fn land_percent(&self) -> f64 {
        self.percent(self.land)
    }
}

/// Builds the terrain layers and renders them to pixels.
///
/// Rendering is only possible after [`MapCompositor::generate`] (or one of its
/// variants) has populated the layers; earlier calls return
/// [`MapError::NotGenerated`].
pub struct MapCompositor {
    config: GeneratorConfig,
    layers: Option<TerrainLayers>,
    seeds: Option<LayerSeeds>,
}

impl MapCompositor {
    /// Compositor with the default layer settings.
    pub fn new(width: usize, height: usize, scale: f64) -> Result<Self> {
        Self::from_config(GeneratorConfig {
            width,
            height,
            scale,
            ..Default::default()
        })
    }

    pub fn from_config(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            layers: None,
            seeds: None,
        })
    }

    /// Compositor over layers built elsewhere.
    pub fn with_layers(scale: f64, layers: TerrainLayers) -> Result<Self> {
        layers.check_sizes()?;
        let mut compositor = Self::new(layers.width(), layers.height(), scale)?;
        compositor.layers = Some(layers);
        Ok(compositor)
    }

    pub fn width(&self) -> usize {
        self.config.width
    }

    pub fn height(&self) -> usize {
        self.config.height
    }

    pub fn scale(&self) -> f64 {
        self.config.scale
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn is_generated(&self) -> bool {
        self.layers.is_some()
    }

    /// Seeds used by the last generation, if any.
    pub fn seeds(&self) -> Option<&LayerSeeds> {
        self.seeds.as_ref()
    }

    pub fn layers(&self) -> Result<&TerrainLayers> {
        self.layers.as_ref().ok_or(MapError::NotGenerated)
    }

    /// Generate with the configured noise primitive and seed (random when unset).
    pub fn generate(&mut self) -> Result<LayerSeeds> {
        let seeds = match self.config.seed {
            Some(seed) => LayerSeeds::from_master(seed),
            None => LayerSeeds::default(),
        };
        let source = self.config.noise_source();
        self.generate_with(&source, &seeds)?;
        Ok(seeds)
    }

    /// Generate all four layers from `source`. The layers are independent and
    /// are built concurrently.
    pub fn generate_with<S: NoiseSource>(&mut self, source: &S, seeds: &LayerSeeds) -> Result<()> {
        info!(
            width = self.width(),
            height = self.height(),
            scale = self.scale(),
            master_seed = seeds.master,
            "generating layers"
        );

        let build = |kind: LayerKind| -> Result<NoiseLayer> {
            let params = self.config.layer(kind);
            let mut layer = NoiseLayer::new(
                self.config.width,
                self.config.height,
                self.config.scale * params.scale_factor,
                params.octaves,
            )?;
            layer.generate(source, seeds.for_layer(kind));
            let (min, max) = layer.min_max();
            debug!(layer = %kind, min, max, "layer generated");
            Ok(layer)
        };

        let ((peaks, continentalness), (temperature, humidity)) = rayon::join(
            || rayon::join(|| build(LayerKind::Peaks), || build(LayerKind::Continentalness)),
            || rayon::join(|| build(LayerKind::Temperature), || build(LayerKind::Humidity)),
        );

        self.layers = Some(TerrainLayers {
            peaks: peaks?,
            continentalness: continentalness?,
            temperature: temperature?,
            humidity: humidity?,
        });
        self.seeds = Some(*seeds);
        info!("layers generated");
        Ok(())
    }

    /// Classify one pixel.
    pub fn terrain_at(&self, x: usize, y: usize) -> Result<Terrain> {
        let sample = self.layers()?.sample(x, y)?;
        Ok(Terrain::classify(&sample))
    }

    /// The composited color map.
    pub fn render(&self) -> Result<PixelBuffer> {
        let layers = self.layers()?;
        let width = self.width();
        let buffer = PixelBuffer::render(width, self.height(), |x, y| {
            Terrain::classify(&layers.sample_index(y * width + x)).color()
        });
        debug!("rendered composite map");
        Ok(buffer)
    }

    /// A single layer's raw values as grayscale.
    pub fn render_layer(&self, kind: LayerKind) -> Result<PixelBuffer> {
        let values = self.layers()?.layer(kind).values();
        let width = self.width();
        Ok(PixelBuffer::render(width, self.height(), |x, y| {
            Color::gray(values[y * width + x])
        }))
    }

    pub fn render_peaks(&self) -> Result<PixelBuffer> {
        self.render_layer(LayerKind::Peaks)
    }

    pub fn render_continentalness(&self) -> Result<PixelBuffer> {
        self.render_layer(LayerKind::Continentalness)
    }

    pub fn render_temperature(&self) -> Result<PixelBuffer> {
        self.render_layer(LayerKind::Temperature)
    }

    pub fn render_humidity(&self) -> Result<PixelBuffer> {
        self.render_layer(LayerKind::Humidity)
    }

    pub fn stats(&self) -> Result<TerrainStats> {
        let layers = self.layers()?;
        let mut stats = TerrainStats::default();
        for idx in 0..self.width() * self.height() {
            match Terrain::classify(&layers.sample_index(idx)) {
                Terrain::Ocean { .. } => stats.ocean += 1,
                Terrain::River => stats.river += 1,
                Terrain::Land { biome, .. } => {
                    stats.land += 1;
                    *stats.biomes.entry(biome).or_insert(0) += 1;
                }
            }
        }
        Ok(stats)
    }
}
