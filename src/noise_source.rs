//! Coherent noise primitives used by the layer generator.
//!
//! A [`NoiseSource`] hands out independent, seeded noise fields. Each octave of
//! a [`crate::layer::NoiseLayer`] asks for a fresh field instead of reseeding a
//! shared global generator.

use std::fmt;
use std::str::FromStr;

use noise::{NoiseFn, OpenSimplex, Perlin, Simplex};
use serde::{Deserialize, Serialize};

/// Output bound of the OpenSimplex primitive the map colors were tuned against.
pub const REFERENCE_AMPLITUDE_BOUND: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Factory for seeded 2D noise fields.
pub trait NoiseSource: Sync {
    type Field: NoiseFn<f64, 2> + Send + Sync;

    /// A new field, fully determined by `seed`.
    fn field(&self, seed: u32) -> Self::Field;

    /// Largest absolute value `field().get()` can return. Samples are divided
    /// by this before being mapped to `[0, 1]`.
    fn amplitude_bound(&self) -> f64;
}

/// The coherent noise algorithms available from the `noise` crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    #[default]
    OpenSimplex,
    Simplex,
    Perlin,
}

impl fmt::Display for NoiseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenSimplex => write!(f, "opensimplex"),
            Self::Simplex => write!(f, "simplex"),
            Self::Perlin => write!(f, "perlin"),
        }
    }
}

impl FromStr for NoiseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "opensimplex" | "open-simplex" => Ok(Self::OpenSimplex),
            "simplex" => Ok(Self::Simplex),
            "perlin" => Ok(Self::Perlin),
            other => Err(format!(
                "unknown noise kind '{}' (expected opensimplex, simplex or perlin)",
                other
            )),
        }
    }
}

/// A field from one of the `noise` crate primitives.
#[derive(Clone)]
pub enum CoherentField {
    OpenSimplex(OpenSimplex),
    Simplex(Simplex),
    Perlin(Perlin),
}

impl NoiseFn<f64, 2> for CoherentField {
    fn get(&self, point: [f64; 2]) -> f64 {
        match self {
            Self::OpenSimplex(n) => n.get(point),
            Self::Simplex(n) => n.get(point),
            Self::Perlin(n) => n.get(point),
        }
    }
}

/// [`NoiseSource`] backed by the `noise` crate.
///
/// The crate normalizes its primitives to roughly `[-1, 1]`, so the default
/// bound is `1.0`. Override it when swapping in a primitive with another range.
#[derive(Clone, Copy, Debug)]
pub struct CoherentNoise {
    pub kind: NoiseKind,
    pub bound: f64,
}

impl CoherentNoise {
    pub fn new(kind: NoiseKind) -> Self {
        Self { kind, bound: 1.0 }
    }

    pub fn with_bound(mut self, bound: f64) -> Self {
        self.bound = bound;
        self
    }
}

impl Default for CoherentNoise {
    fn default() -> Self {
        Self::new(NoiseKind::default())
    }
}

impl NoiseSource for CoherentNoise {
    type Field = CoherentField;

    fn field(&self, seed: u32) -> CoherentField {
        match self.kind {
            NoiseKind::OpenSimplex => CoherentField::OpenSimplex(OpenSimplex::new(seed)),
            NoiseKind::Simplex => CoherentField::Simplex(Simplex::new(seed)),
            NoiseKind::Perlin => CoherentField::Perlin(Perlin::new(seed)),
        }
    }

    fn amplitude_bound(&self) -> f64 {
        self.bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_field() {
        let source = CoherentNoise::default();
        let a = source.field(7);
        let b = source.field(7);
        for i in 0..16 {
            let p = [i as f64 * 0.37, i as f64 * 0.11];
            assert_eq!(a.get(p), b.get(p));
        }
    }

    #[test]
    fn test_default_bound_matches_primitive_range() {
        for kind in [NoiseKind::OpenSimplex, NoiseKind::Simplex, NoiseKind::Perlin] {
            let source = CoherentNoise::new(kind);
            let bound = source.amplitude_bound();
            let mut peak = 0.0f64;
            for seed in [1u32, 99, 4096] {
                let field = source.field(seed);
                for j in 0..64 {
                    for i in 0..64 {
                        let v = field.get([i as f64 * 0.173, j as f64 * 0.211]);
                        // float slack only
                        assert!(v.abs() <= bound + 1e-3, "{} sample {} exceeds bound {}", kind, v, bound);
                        peak = peak.max(v.abs());
                    }
                }
            }
            // a bound far above the real range would flatten layers toward 0.5
            assert!(peak > 0.25 * bound, "{} peaked at {} for bound {}", kind, peak, bound);
        }
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("OpenSimplex".parse::<NoiseKind>(), Ok(NoiseKind::OpenSimplex));
        assert_eq!("perlin".parse::<NoiseKind>(), Ok(NoiseKind::Perlin));
        assert!("value".parse::<NoiseKind>().is_err());
        assert_eq!(NoiseKind::Simplex.to_string(), "simplex");
    }
}
