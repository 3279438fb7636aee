/// Export manifest describing how a heightmap file was produced.
use crate::error::ConvertResult;
use crate::export::ExportFormat;
use crate::range::ElevationRange;
use crate::settings::{ConversionSettings, JsonLayout, ResizeTarget};
use constants::export::MANIFEST_SUFFIX;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Sidecar written next to an exported heightmap.
#[derive(Debug, Serialize, Deserialize)]
pub struct HeightmapManifest {
    /// Image the heightmap was derived from.
    pub source_image: Option<String>,
    /// Exported grid file name.
    pub output: String,
    pub format: ExportFormat,
    /// Only meaningful for JSON exports.
    pub json_layout: Option<JsonLayout>,
    pub width: usize,
    pub height: usize,
    pub scale: f64,
    pub offset: f64,
    pub tile_size: u32,
    pub export_chunk_rows: usize,
    pub resize: Option<ResizeTarget>,
    pub elevation: ElevationSummary,
}

/// Elevation statistics over the exported grid.
#[derive(Debug, Serialize, Deserialize)]
pub struct ElevationSummary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl From<&ElevationRange> for ElevationSummary {
    fn from(range: &ElevationRange) -> Self {
        let populated = !range.is_empty();
        Self {
            min: populated.then_some(range.min),
            max: populated.then_some(range.max),
            mean: range.mean(),
        }
    }
}

impl HeightmapManifest {
    pub fn new(
        source_image: Option<&Path>,
        output: &Path,
        format: ExportFormat,
        settings: &ConversionSettings,
        dimensions: (usize, usize),
        range: &ElevationRange,
    ) -> Self {
        Self {
            source_image: source_image.map(|p| p.display().to_string()),
            output: output
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default(),
            format,
            json_layout: (format == ExportFormat::Json).then_some(settings.json_layout),
            width: dimensions.0,
            height: dimensions.1,
            scale: settings.scale,
            offset: settings.offset,
            tile_size: settings.tile_size,
            export_chunk_rows: settings.export_chunk_rows,
            resize: settings.resize,
            elevation: ElevationSummary::from(range),
        }
    }

    /// Path of the sidecar for an export written to `output`.
    pub fn path_for(output: &Path) -> PathBuf {
        let mut name = output.as_os_str().to_owned();
        name.push(MANIFEST_SUFFIX);
        PathBuf::from(name)
    }

    /// Write the manifest as pretty JSON next to `output`.
    pub fn write_for(&self, output: &Path) -> ConvertResult<PathBuf> {
        let manifest_path = Self::path_for(output);
        let manifest_json = serde_json::to_string_pretty(self)?;
        fs::write(&manifest_path, manifest_json)?;

        println!("Generated manifest: {}", manifest_path.display());
        self.print_summary();
        Ok(manifest_path)
    }

    fn print_summary(&self) {
        println!("Manifest Summary:");
        println!("  Grid: {}x{} ({})", self.width, self.height, self.format.name());
        println!("  Scale/offset: {} / {}", self.scale, self.offset);
        if let (Some(min), Some(max)) = (self.elevation.min, self.elevation.max) {
            println!("  Elevation: {:.3} to {:.3}", min, max);
        } else {
            println!("  Elevation: empty grid");
        }
    }
}
