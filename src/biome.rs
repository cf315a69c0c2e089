//! Biome classification from temperature and humidity.

use serde::{Deserialize, Serialize};

use crate::color::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Biome {
    SnowyTundra,
    SnowyTaiga,
    Plains,
    Forest,
    Taiga,
    GiantSpruceTaiga,
    BirchForest,
    DarkForest,
    Savanna,
    Jungle,
    Desert,
    JungleEdge,
}

/// Number of temperature (and humidity) buckets in [`BIOME_TABLE`].
pub const BUCKETS: usize = 5;

/// Rows are humidity buckets, columns temperature buckets, both low to high.
const BIOME_TABLE: [[Biome; BUCKETS]; BUCKETS] = {
    use Biome::*;
    [
        [SnowyTundra, Plains, Plains, Savanna, Desert],
        [SnowyTundra, Plains, Plains, Savanna, Desert],
        [SnowyTundra, Forest, Forest, Forest, Desert],
        [SnowyTaiga, Taiga, BirchForest, Jungle, JungleEdge],
        [SnowyTaiga, GiantSpruceTaiga, DarkForest, Jungle, Jungle],
    ]
};

/// Base colors, indexed by `Biome as usize`.
const BIOME_COLORS: [Color; 12] = [
    Color::new(1.0, 1.0, 1.0),       // SnowyTundra
    Color::new(0.192, 0.333, 0.29),  // SnowyTaiga
    Color::new(0.553, 0.702, 0.376), // Plains
    Color::new(0.02, 0.4, 0.129),    // Forest
    Color::new(0.043, 0.4, 0.349),   // Taiga
    Color::new(0.506, 0.557, 0.475), // GiantSpruceTaiga
    Color::new(0.188, 0.455, 0.267), // BirchForest
    Color::new(0.408, 0.475, 0.259), // DarkForest
    Color::new(0.741, 0.698, 0.373), // Savanna
    Color::new(0.325, 0.482, 0.035), // Jungle
    Color::new(0.98, 0.58, 0.094),   // Desert
    Color::new(0.384, 0.545, 0.09),  // JungleEdge
];

impl Biome {
    pub fn all() -> &'static [Self] {
        &[
            Self::SnowyTundra,
            Self::SnowyTaiga,
            Self::Plains,
            Self::Forest,
            Self::Taiga,
            Self::GiantSpruceTaiga,
            Self::BirchForest,
            Self::DarkForest,
            Self::Savanna,
            Self::Jungle,
            Self::Desert,
            Self::JungleEdge,
        ]
    }

    /// Look up the biome for a temperature/humidity pair in `[0, 1]`.
    /// Values outside that range fall into the nearest edge bucket.
    pub fn classify(temperature: f64, humidity: f64) -> Self {
        BIOME_TABLE[bucket(humidity)][bucket(temperature)]
    }

    pub fn base_color(self) -> Color {
        BIOME_COLORS[self as usize]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SnowyTundra => "Snowy Tundra",
            Self::SnowyTaiga => "Snowy Taiga",
            Self::Plains => "Plains",
            Self::Forest => "Forest",
            Self::Taiga => "Taiga",
            Self::GiantSpruceTaiga => "Giant Spruce Taiga",
            Self::BirchForest => "Birch Forest",
            Self::DarkForest => "Dark Forest",
            Self::Savanna => "Savanna",
            Self::Jungle => "Jungle",
            Self::Desert => "Desert",
            Self::JungleEdge => "Jungle Edge",
        }
    }
}

impl std::fmt::Display for Biome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

fn bucket(value: f64) -> usize {
    let scaled = (value * BUCKETS as f64).floor();
    // NaN lands in bucket 0
    if scaled >= 0.0 {
        (scaled as usize).min(BUCKETS - 1)
    } else {
        0
    }
}
