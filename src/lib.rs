//! Terrain map generation library
//!
//! Synthesizes layered fractal noise, classifies it into ocean, river and
//! biome-colored land, and rasterizes the result. Re-exports modules for use
//! by the binary and tools.

pub mod biome;
pub mod color;
pub mod compositor;
pub mod config;
pub mod error;
pub mod export;
pub mod layer;
pub mod noise_source;
pub mod raster;
pub mod seeds;
pub mod tilemap;

pub use biome::Biome;
pub use color::Color;
pub use compositor::{MapCompositor, Terrain, TerrainLayers, TerrainSample, TerrainStats};
pub use config::{GeneratorConfig, LayerParams};
pub use error::MapError;
pub use layer::{LayerKind, NoiseLayer};
pub use noise_source::{CoherentNoise, NoiseKind, NoiseSource};
pub use raster::PixelBuffer;
pub use seeds::LayerSeeds;
