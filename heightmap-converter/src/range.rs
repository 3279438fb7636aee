/// Elevation range tracking and normalisation
use crate::transform::Heightmap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Values summed per parallel chunk.
const RANGE_CHUNK: usize = 25_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationRange {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: usize,
}

impl ElevationRange {
    /// Create new range initialised to infinity values
    pub fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.0,
            count: 0,
        }
    }

    /// Range of every value in `heightmap`, computed in parallel chunks
    pub fn of(heightmap: &Heightmap) -> Self {
        heightmap
            .values()
            .par_chunks(RANGE_CHUNK)
            .map(|chunk| {
                let mut local = ElevationRange::new();
                for &value in chunk {
                    local.update(value);
                }
                local
            })
            .reduce_with(ElevationRange::merge)
            .unwrap_or_else(ElevationRange::new)
    }

    pub fn update(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    pub fn merge(mut self, other: Self) -> Self {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Normalise a value to 0-1; a flat range maps everything to 0
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        if !(span > 0.0) {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

impl Default for ElevationRange {
    fn default() -> Self {
        Self::new()
    }
}
