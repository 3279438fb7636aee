//! Grayscale image to heightmap conversion.
//!
//! Stages: decode an image to 8-bit intensity, optionally resize it, map each
//! pixel to `intensity / 255 * scale + offset` tile by tile, then export the
//! grid in row chunks as Lua, CSV or JSON, or render a PNG preview.
pub mod converter;
pub mod error;
pub mod export;
pub mod image_source;
pub mod manifest;
pub mod preprocess;
pub mod preview;
pub mod progress;
pub mod range;
pub mod settings;
pub mod transform;

pub use converter::HeightmapConverter;
pub use error::{ConvertError, ConvertResult};
pub use export::ExportFormat;
pub use preview::Colormap;
pub use settings::{ConversionSettings, JsonLayout, SettingsInput};
pub use transform::Heightmap;
