//! Seed management for map generation
//!
//! Every layer gets its own seed derived from a master seed, and every octave
//! of a layer draws its noise-field seed from a ChaCha stream keyed by that
//! layer seed. The resulting fields depend only on `(master, layer, octave)`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::layer::LayerKind;

/// Seeds for the four noise layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    pub peaks: u64,
    pub continentalness: u64,
    pub temperature: u64,
    pub humidity: u64,
}

impl LayerSeeds {
    /// Create seeds from a master seed, deriving all layer seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            peaks: derive_seed(master, LayerKind::Peaks.name()),
            continentalness: derive_seed(master, LayerKind::Continentalness.name()),
            temperature: derive_seed(master, LayerKind::Temperature.name()),
            humidity: derive_seed(master, LayerKind::Humidity.name()),
        }
    }

    pub fn for_layer(&self, kind: LayerKind) -> u64 {
        match kind {
            LayerKind::Peaks => self.peaks,
            LayerKind::Continentalness => self.continentalness,
            LayerKind::Temperature => self.temperature,
            LayerKind::Humidity => self.humidity,
        }
    }
}

impl Default for LayerSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Noise-field seeds for `octaves` passes of a layer, in octave order.
pub fn octave_seeds(layer_seed: u64, octaves: u32) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(layer_seed);
    (0..octaves).map(|_| rng.gen::<u32>()).collect()
}

/// Derive a sub-seed from a master seed and a layer name.
fn derive_seed(master: u64, layer: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    layer.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for LayerSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LayerSeeds {{ master: {}, peaks: {}, continentalness: {}, temperature: {}, humidity: {} }}",
            self.master, self.peaks, self.continentalness, self.temperature, self.humidity,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_derivation() {
        let seeds1 = LayerSeeds::from_master(12345);
        let seeds2 = LayerSeeds::from_master(12345);
        assert_eq!(seeds1, seeds2);
    }

    #[test]
    fn test_different_layers_get_different_seeds() {
        let seeds = LayerSeeds::from_master(12345);

        assert_ne!(seeds.peaks, seeds.continentalness);
        assert_ne!(seeds.continentalness, seeds.temperature);
        assert_ne!(seeds.temperature, seeds.humidity);
    }

    #[test]
    fn test_octave_seeds_are_a_stable_prefix() {
        let three = octave_seeds(99, 3);
        let eight = octave_seeds(99, 8);
        assert_eq!(three.len(), 3);
        assert_eq!(&eight[..3], &three[..]);
        assert_ne!(eight[0], eight[1]);
    }
}
