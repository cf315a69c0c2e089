use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use biome_map::export::{export_map_images, export_summary};
use biome_map::{Biome, GeneratorConfig, MapCompositor, NoiseKind};

#[derive(Parser, Debug)]
#[command(name = "biome_map")]
#[command(about = "Generate a biome-colored terrain map from layered noise")]
struct Args {
    /// Width of the map in pixels
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the map in pixels
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Zoom factor (smaller = more zoomed-in terrain)
    #[arg(short, long)]
    scale: Option<f64>,

    /// Random seed (uses random seed if not specified)
    #[arg(long)]
    seed: Option<u64>,

    /// Noise primitive: opensimplex, simplex or perlin
    #[arg(long)]
    noise: Option<NoiseKind>,

    /// JSON config file; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the images are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Skip the per-layer grayscale images
    #[arg(long)]
    no_diagnostics: bool,

    /// Write a JSON summary of seed, config and terrain statistics
    #[arg(long)]
    summary: Option<PathBuf>,
}

impl Args {
    fn to_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GeneratorConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(noise) = self.noise {
            config.noise = noise;
        }
        config.seed = self.seed.or(config.seed).or_else(|| Some(rand::random()));
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("biome_map=info".parse()?))
        .init();

    let args = Args::parse();
    let config = args.to_config()?;

    info!(seed = ?config.seed, noise = %config.noise, "starting");
    info!("Map size: {}x{} at scale {}", config.width, config.height, config.scale);

    let mut compositor = MapCompositor::from_config(config)?;

    let start = Instant::now();
    let seeds = compositor.generate()?;
    info!("Generated layers in {:.2?} ({})", start.elapsed(), seeds);

    let stats = compositor.stats()?;
    info!(
        "Terrain: {:.1}% ocean, {:.1}% river, {:.1}% land",
        stats.ocean_percent(),
        stats.river_percent(),
        stats.land_percent()
    );
    for biome in Biome::all() {
        let count = stats.biomes.get(biome).copied().unwrap_or(0);
        info!("  {:<20} {:>8} px", biome.to_string(), count);
    }

    let written = export_map_images(&compositor, &args.output_dir, !args.no_diagnostics)
        .with_context(|| format!("writing images to {}", args.output_dir.display()))?;
    info!("Wrote {} image(s)", written.len());

    if let Some(path) = &args.summary {
        export_summary(&compositor, &stats, path)
            .with_context(|| format!("writing summary {}", path.display()))?;
        info!("Wrote summary to {}", path.display());
    }

    Ok(())
}
