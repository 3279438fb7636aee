/// Height scale applied to normalised intensity (0..1)
pub const DEFAULT_SCALE: f64 = 100.0;

/// Height offset added after scaling
pub const DEFAULT_OFFSET: f64 = 0.0;

/// Square tile edge used when transforming the image (pixels)
pub const DEFAULT_TILE_SIZE: u32 = 500;

/// Full-scale 8-bit intensity
pub const MAX_INTENSITY: f64 = 255.0;

/// Preprocessing is on unless explicitly disabled
pub const DEFAULT_PREPROCESS_ENABLED: bool = true;

/// Default resize target per axis, in pixels
pub const DEFAULT_PREPROCESS_SIZE: f64 = 500.0;

/// Largest image (in pixels) the loader will decode
pub const MAX_IMAGE_PIXELS: u64 = 933_120_000;
