/// Heightmap preview rendering with a colour scale strip
use crate::error::ConvertResult;
use crate::range::ElevationRange;
use crate::transform::Heightmap;
use constants::preview::{
    COLOUR_SCALE_GAP, COLOUR_SCALE_WIDTH, PREVIEW_BACKGROUND, TERRAIN_STOPS,
};
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Gray,
    Terrain,
}

impl Colormap {
    /// Colour for a normalised height in 0-1.
    pub fn colour(&self, t: f64) -> [u8; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Colormap::Gray => {
                let v = (t * 255.0).round() as u8;
                [v, v, v]
            }
            Colormap::Terrain => interpolate_stops(t, TERRAIN_STOPS),
        }
    }
}

fn interpolate_stops(t: f64, stops: &[(f64, [u8; 3])]) -> [u8; 3] {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return [0, 0, 0],
    };
    if t <= first.0 {
        return first.1;
    }
    if t >= last.0 {
        return last.1;
    }

    for pair in stops.windows(2) {
        let (v0, c0) = pair[0];
        let (v1, c1) = pair[1];
        if t >= v0 && t <= v1 {
            let f = if v1 > v0 { (t - v0) / (v1 - v0) } else { 0.0 };
            let mut out = [0u8; 3];
            for (channel, slot) in out.iter_mut().enumerate() {
                let a = c0[channel] as f64;
                let b = c1[channel] as f64;
                *slot = (a + (b - a) * f).round() as u8;
            }
            return out;
        }
    }
    last.1
}

/// Render the grid next to a vertical colour scale (max at top).
pub fn render_preview(heightmap: &Heightmap, range: &ElevationRange, colormap: Colormap) -> RgbImage {
    let width = heightmap.width() as u32;
    let height = (heightmap.height() as u32).max(1);
    let canvas_width = width + COLOUR_SCALE_GAP + COLOUR_SCALE_WIDTH;

    let mut canvas = RgbImage::from_pixel(canvas_width, height, Rgb(PREVIEW_BACKGROUND));

    for (y, row) in heightmap.rows().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            let colour = colormap.colour(range.normalize(value));
            canvas.put_pixel(x as u32, y as u32, Rgb(colour));
        }
    }

    let scale_left = width + COLOUR_SCALE_GAP;
    for y in 0..height {
        let t = if height > 1 {
            1.0 - y as f64 / (height - 1) as f64
        } else {
            1.0
        };
        let colour = Rgb(colormap.colour(t));
        for x in scale_left..canvas_width {
            canvas.put_pixel(x, y, colour);
        }
    }

    canvas
}

/// Render and save a PNG preview, returning the range used for the scale.
pub fn save_preview(
    heightmap: &Heightmap,
    path: &Path,
    colormap: Colormap,
) -> ConvertResult<ElevationRange> {
    let range = ElevationRange::of(heightmap);
    let canvas = render_preview(heightmap, &range, colormap);
    canvas.save(path)?;

    log::info!(
        "Heightmap preview saved to {} (scale {:.3} to {:.3})",
        path.display(),
        range.min,
        range.max
    );
    Ok(range)
}
