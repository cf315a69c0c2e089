//! Fractal noise layers.
//!
//! A layer is a grid of values in `[0, 1]` built by summing octaves of
//! coherent noise. Each octave samples its own independently seeded field at
//! twice the previous frequency and half the previous amplitude, so the result
//! is a blend of decorrelated detail passes rather than classic single-field fBm.

use noise::NoiseFn;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{MapError, Result};
use crate::noise_source::NoiseSource;
use crate::seeds::octave_seeds;
use crate::tilemap::Tilemap;

/// Size in pixels of one base noise cell before the layer scale is applied.
pub const BASE_CELL_SIZE: f64 = 16.0;

/// The physical quantities the compositor samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Peaks,
    Continentalness,
    Temperature,
    Humidity,
}

impl LayerKind {
    pub fn all() -> &'static [Self] {
        &[Self::Peaks, Self::Continentalness, Self::Temperature, Self::Humidity]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Peaks => "peaks",
            Self::Continentalness => "continentalness",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug)]
pub struct NoiseLayer {
    pub width: usize,
    pub height: usize,
    /// Spatial zoom; larger values give smoother, zoomed-out terrain.
    pub scale: f64,
    /// Number of fractal detail passes.
    pub octaves: u32,
    data: Tilemap<f64>,
}

impl NoiseLayer {
    /// An empty (all zero) layer.
    pub fn new(width: usize, height: usize, scale: f64, octaves: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MapError::InvalidDimensions { width, height });
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(MapError::InvalidScale(scale));
        }
        if octaves == 0 {
            return Err(MapError::InvalidOctaves("layer"));
        }
        Ok(Self {
            width,
            height,
            scale,
            octaves,
            data: Tilemap::new_with(width, height, 0.0),
        })
    }

    /// Sum of the octave weights `1/2^i`, i.e. `2 - 0.5^(octaves - 1)`.
    pub fn total_weight(&self) -> f64 {
        2.0 - 0.5f64.powi(self.octaves as i32 - 1)
    }

    /// Accumulate every octave into the grid.
    ///
    /// Octave seeds come from `layer_seed`, so the output is reproducible for a
    /// given source and seed no matter how rows are scheduled across threads.
    pub fn generate<S: NoiseSource>(&mut self, source: &S, layer_seed: u64) {
        let total_weight = self.total_weight();
        let bound = source.amplitude_bound();
        let width = self.width;
        let scale = self.scale;

        for (octave, seed) in octave_seeds(layer_seed, self.octaves).into_iter().enumerate() {
            debug!(octave, seed, "sampling octave");
            let field = source.field(seed);
            let freq_scale = 2.0f64.powi(octave as i32);
            let amplitude = 1.0 / freq_scale;

            self.data
                .as_mut_slice()
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, cell) in row.iter_mut().enumerate() {
                        let nx = x as f64 / BASE_CELL_SIZE / scale * freq_scale;
                        let ny = y as f64 / BASE_CELL_SIZE / scale * freq_scale;
                        let value = normalized_sample(&field, nx, ny, bound);
                        *cell += value * amplitude / total_weight;
                    }
                });
        }
    }

    pub fn is_valid_at(&self, x: usize, y: usize) -> bool {
        self.data.is_valid_at(x, y)
    }

    pub fn get(&self, x: usize, y: usize) -> Result<f64> {
        self.data.get(x, y).copied()
    }

    pub fn set(&mut self, x: usize, y: usize, value: f64) -> Result<()> {
        self.data.set(x, y, value)
    }

    /// Overwrite every cell, mostly useful for building fixtures.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    pub fn values(&self) -> &[f64] {
        self.data.as_slice()
    }

    /// Smallest and largest cell values.
    pub fn min_max(&self) -> (f64, f64) {
        self.values()
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}

/// Sample `field` and map it from `[-bound, bound]` onto `[0, 1]`.
fn normalized_sample<F: NoiseFn<f64, 2>>(field: &F, x: f64, y: f64, bound: f64) -> f64 {
    let normalized = field.get([x, y]) / bound;
    (normalized * 0.5 + 0.5).clamp(0.0, 1.0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::noise_source::{CoherentNoise, REFERENCE_AMPLITUDE_BOUND};

    /// Deterministic stand-in for a coherent noise field.
    #[derive(Clone, Copy)]
    pub(crate) struct SinCosField {
        offset: f64,
    }

    impl NoiseFn<f64, 2> for SinCosField {
        fn get(&self, point: [f64; 2]) -> f64 {
            (point[0] + self.offset).sin() * point[1].cos() * 0.5
        }
    }

    pub(crate) struct SinCosSource;

    impl NoiseSource for SinCosSource {
        type Field = SinCosField;

        fn field(&self, seed: u32) -> SinCosField {
            SinCosField { offset: (seed % 1000) as f64 * 0.01 }
        }

        fn amplitude_bound(&self) -> f64 {
            REFERENCE_AMPLITUDE_BOUND
        }
    }

    /// Always returns the same sample.
    struct ConstantSource(f64);

    impl NoiseSource for ConstantSource {
        type Field = noise::Constant;

        fn field(&self, _seed: u32) -> noise::Constant {
            noise::Constant::new(self.0)
        }

        fn amplitude_bound(&self) -> f64 {
            1.0
        }
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(matches!(NoiseLayer::new(0, 4, 1.0, 1), Err(MapError::InvalidDimensions { .. })));
        assert!(matches!(NoiseLayer::new(4, 4, 0.0, 1), Err(MapError::InvalidScale(_))));
        assert!(matches!(NoiseLayer::new(4, 4, f64::NAN, 1), Err(MapError::InvalidScale(_))));
        assert!(matches!(NoiseLayer::new(4, 4, 1.0, 0), Err(MapError::InvalidOctaves(_))));
    }

    #[test]
    fn test_starts_zeroed() {
        let layer = NoiseLayer::new(5, 3, 1.0, 2).unwrap();
        assert_eq!(layer.values().len(), 15);
        assert!(layer.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_bounds() {
        let mut layer = NoiseLayer::new(5, 3, 1.0, 1).unwrap();
        for y in 0..3 {
            for x in 0..5 {
                assert!(layer.set(x, y, 0.25).is_ok());
                assert_eq!(layer.get(x, y).unwrap(), 0.25);
            }
        }
        assert!(matches!(layer.get(5, 0), Err(MapError::OutOfBounds { .. })));
        assert!(matches!(layer.get(0, 3), Err(MapError::OutOfBounds { .. })));
        assert!(matches!(layer.set(7, 9, 1.0), Err(MapError::OutOfBounds { .. })));
        assert!(!layer.is_valid_at(5, 3));
    }

    #[test]
    fn test_total_weight() {
        assert_eq!(NoiseLayer::new(1, 1, 1.0, 1).unwrap().total_weight(), 1.0);
        assert_eq!(NoiseLayer::new(1, 1, 1.0, 3).unwrap().total_weight(), 1.75);
        assert_eq!(NoiseLayer::new(1, 1, 1.0, 8).unwrap().total_weight(), 2.0 - 0.5f64.powi(7));
    }

    #[test]
    fn test_weights_sum_to_one() {
        // A constant mid-range sample must accumulate back to itself.
        let mut layer = NoiseLayer::new(8, 8, 1.0, 8).unwrap();
        layer.generate(&ConstantSource(0.0), 1);
        for &v in layer.values() {
            assert!((v - 0.5).abs() < 1e-12, "got {}", v);
        }
    }

    #[test]
    fn test_out_of_range_samples_are_clamped() {
        let mut layer = NoiseLayer::new(4, 4, 1.0, 3).unwrap();
        layer.generate(&ConstantSource(5.0), 1);
        for &v in layer.values() {
            assert!((v - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_values_stay_in_unit_range() {
        let mut layer = NoiseLayer::new(64, 48, 0.5, 8).unwrap();
        layer.generate(&CoherentNoise::default(), 2024);
        for &v in layer.values() {
            assert!((0.0..=1.0 + 1e-12).contains(&v), "value {} out of range", v);
        }
        let (lo, hi) = layer.min_max();
        assert!(hi > lo);
    }

    #[test]
    fn test_deterministic_with_stub() {
        let mut a = NoiseLayer::new(32, 16, 2.0, 3).unwrap();
        let mut b = NoiseLayer::new(32, 16, 2.0, 3).unwrap();
        a.generate(&SinCosSource, 77);
        b.generate(&SinCosSource, 77);
        assert_eq!(a.values(), b.values());

        let mut c = NoiseLayer::new(32, 16, 2.0, 3).unwrap();
        c.generate(&SinCosSource, 78);
        assert_ne!(a.values(), c.values());
    }

    #[test]
    fn test_single_octave_matches_formula() {
        let mut layer = NoiseLayer::new(6, 4, 0.5, 1).unwrap();
        layer.generate(&SinCosSource, 5);
        let seed = octave_seeds(5, 1)[0];
        let field = SinCosSource.field(seed);
        for y in 0..4 {
            for x in 0..6 {
                let nx = x as f64 / 16.0 / 0.5;
                let ny = y as f64 / 16.0 / 0.5;
                let raw = field.get([nx, ny]) / REFERENCE_AMPLITUDE_BOUND;
                let expected = (raw * 0.5 + 0.5).clamp(0.0, 1.0);
                assert_eq!(layer.get(x, y).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_octaves_double_frequency_and_halve_amplitude() {
        let scale = 0.75;
        let mut layer = NoiseLayer::new(9, 7, scale, 3).unwrap();
        layer.generate(&SinCosSource, 31);

        let fields: Vec<SinCosField> =
            octave_seeds(31, 3).into_iter().map(|seed| SinCosSource.field(seed)).collect();
        for y in 0..7 {
            for x in 0..9 {
                let mut expected = 0.0;
                for (octave, field) in fields.iter().enumerate() {
                    let freq_scale = 2.0f64.powi(octave as i32);
                    let nx = x as f64 / 16.0 / scale * freq_scale;
                    let ny = y as f64 / 16.0 / scale * freq_scale;
                    let raw = field.get([nx, ny]) / REFERENCE_AMPLITUDE_BOUND;
                    let value = (raw * 0.5 + 0.5).clamp(0.0, 1.0);
                    expected += value * (1.0 / freq_scale) / 1.75;
                }
                assert_eq!(layer.get(x, y).unwrap(), expected, "cell ({}, {})", x, y);
            }
        }
    }
}
