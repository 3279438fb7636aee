/// Tiled intensity-to-elevation transform
use crate::progress::{Progress, fraction_percent};
use constants::conversion::MAX_INTENSITY;
use image::GrayImage;

/// Row-major grid of elevation values.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Heightmap {
    /// Zero-filled grid of the given shape.
    pub fn zeroed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// Build from rows; all rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }
        Some(Self {
            width,
            height,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.width + x]
    }

    pub fn row(&self, y: usize) -> &[f64] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.height).map(move |y| self.row(y))
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }

    fn row_mut(&mut self, y: usize) -> &mut [f64] {
        &mut self.data[y * self.width..(y + 1) * self.width]
    }
}

/// Half-open pixel rectangle `[left, right) x [upper, lower)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub left: u32,
    pub upper: u32,
    pub right: u32,
    pub lower: u32,
}

/// Row-major tiling of a `width x height` extent, edge tiles clipped.
pub fn tiles(width: u32, height: u32, tile_size: u32) -> impl Iterator<Item = Tile> {
    let tiles_x = width.div_ceil(tile_size);
    let tiles_y = height.div_ceil(tile_size);

    (0..tiles_y).flat_map(move |i| {
        (0..tiles_x).map(move |j| Tile {
            left: j * tile_size,
            upper: i * tile_size,
            right: ((j + 1) * tile_size).min(width),
            lower: ((i + 1) * tile_size).min(height),
        })
    })
}

/// Map one 8-bit intensity to an elevation value.
#[inline]
pub fn elevation(intensity: u8, scale: f64, offset: f64) -> f64 {
    intensity as f64 / MAX_INTENSITY * scale + offset
}

/// Transform an intensity image into a heightmap of the same shape,
/// one tile at a time. Progress is reported after every tile.
pub fn image_to_heightmap(
    image: &GrayImage,
    scale: f64,
    offset: f64,
    tile_size: u32,
    progress: &mut dyn Progress,
) -> Heightmap {
    let (width, height) = image.dimensions();
    let tile_size = tile_size.max(1);
    let total = (width.div_ceil(tile_size) * height.div_ceil(tile_size)) as usize;

    let mut heightmap = Heightmap::zeroed(width as usize, height as usize);
    progress.set_percent(0.0);

    for (done, tile) in tiles(width, height, tile_size).enumerate() {
        log::debug!(
            "Processing chunk: ({}, {}) to ({}, {})",
            tile.left,
            tile.upper,
            tile.right,
            tile.lower
        );

        for y in tile.upper..tile.lower {
            let row = heightmap.row_mut(y as usize);
            for x in tile.left..tile.right {
                row[x as usize] = elevation(image.get_pixel(x, y).0[0], scale, offset);
            }
        }

        progress.set_percent(fraction_percent(done + 1, total));
    }

    progress.set_percent(100.0);
    heightmap
}
