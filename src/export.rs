//! Image and summary export for generated maps.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::compositor::{MapCompositor, TerrainStats};
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::layer::LayerKind;
use crate::raster::PixelBuffer;

/// File name of the composited map.
pub const MAP_FILE: &str = "map.png";

/// File name of a single-layer diagnostic image, e.g. `map-peaks.png`.
pub fn layer_file_name(kind: LayerKind) -> String {
    format!("map-{}.png", kind.name())
}

/// Export a pixel buffer as an image; the format follows the path extension.
pub fn export_pixels(pixels: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    let img = pixels.to_rgb_image()?;
    img.save(path.as_ref())?;
    Ok(())
}

/// Write the composited map and, if requested, one grayscale image per layer
/// into `dir`. Returns the written paths.
pub fn export_map_images(
    compositor: &MapCompositor,
    dir: impl AsRef<Path>,
    diagnostics: bool,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();

    let path = dir.join(MAP_FILE);
    export_pixels(&compositor.render()?, &path)?;
    info!(path = %path.display(), "wrote map");
    written.push(path);

    if diagnostics {
        for &kind in LayerKind::all() {
            let path = dir.join(layer_file_name(kind));
            export_pixels(&compositor.render_layer(kind)?, &path)?;
            info!(path = %path.display(), "wrote layer");
            written.push(path);
        }
    }

    Ok(written)
}

#[derive(Serialize)]
struct Summary<'a> {
    master_seed: Option<u64>,
    config: &'a GeneratorConfig,
    stats: &'a TerrainStats,
}

/// Write a JSON summary of the configuration, seed, and terrain statistics.
pub fn export_summary(
    compositor: &MapCompositor,
    stats: &TerrainStats,
    path: impl AsRef<Path>,
) -> Result<()> {
    let summary = Summary {
        master_seed: compositor.seeds().map(|s| s.master),
        config: compositor.config(),
        stats,
    };
    let json = serde_json::to_string_pretty(&summary)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::tests::SinCosSource;
    use crate::seeds::LayerSeeds;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("biome_map_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn generated(width: usize, height: usize) -> MapCompositor {
        let mut compositor = MapCompositor::new(width, height, 0.5).unwrap();
        compositor.generate_with(&SinCosSource, &LayerSeeds::from_master(5)).unwrap();
        compositor
    }

    #[test]
    fn test_layer_file_names() {
        assert_eq!(layer_file_name(LayerKind::Peaks), "map-peaks.png");
        assert_eq!(layer_file_name(LayerKind::Continentalness), "map-continentalness.png");
    }

    #[test]
    fn test_export_bundle() {
        let dir = scratch_dir("bundle");
        let compositor = generated(16, 12);

        let written = export_map_images(&compositor, &dir, true).unwrap();
        assert_eq!(written.len(), 5);
        for path in &written {
            assert!(path.exists(), "{} missing", path.display());
        }

        let img = image::open(dir.join(MAP_FILE)).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (16, 12));
        assert_eq!(img.as_raw(), compositor.render().unwrap().as_bytes());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_export_without_diagnostics() {
        let dir = scratch_dir("plain");
        let written = export_map_images(&generated(8, 8), &dir, false).unwrap();
        assert_eq!(written, vec![dir.join(MAP_FILE)]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_export_summary() {
        let dir = scratch_dir("summary");
        fs::create_dir_all(&dir).unwrap();
        let compositor = generated(8, 8);
        let stats = compositor.stats().unwrap();
        let path = dir.join("summary.json");

        export_summary(&compositor, &stats, &path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["master_seed"], 5);
        assert_eq!(value["config"]["width"], 8);
        assert_eq!(value["stats"]["ocean"].as_u64().unwrap() as usize, stats.ocean);

        let _ = fs::remove_dir_all(&dir);
    }
}
