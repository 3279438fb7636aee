/// Conversion settings and validation of raw user input
use crate::error::{ConvertError, ConvertResult};
use constants::conversion::{
    DEFAULT_OFFSET, DEFAULT_PREPROCESS_ENABLED, DEFAULT_PREPROCESS_SIZE, DEFAULT_SCALE,
    DEFAULT_TILE_SIZE, MAX_IMAGE_PIXELS,
};
use constants::export::DEFAULT_EXPORT_CHUNK_ROWS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Unit a resize value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeUnit {
    #[serde(rename = "px")]
    Pixels,
    #[serde(rename = "%")]
    Percent,
}

impl FromStr for SizeUnit {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "px" | "" => Ok(SizeUnit::Pixels),
            "%" => Ok(SizeUnit::Percent),
            other => Err(ConvertError::InvalidUnit(other.to_string())),
        }
    }
}

/// One axis of a resize request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeDimension {
    pub value: f64,
    pub unit: SizeUnit,
}

impl ResizeDimension {
    pub fn pixels(value: f64) -> Self {
        Self {
            value,
            unit: SizeUnit::Pixels,
        }
    }

    pub fn percent(value: f64) -> Self {
        Self {
            value,
            unit: SizeUnit::Percent,
        }
    }

    /// Parse a raw value such as `"50%"`, `"500px"` or `"500"`.
    /// A suffix on the value wins over `unit`; otherwise `unit` is parsed.
    pub fn parse(field: &'static str, raw: &str, unit: Option<&str>) -> ConvertResult<Self> {
        let trimmed = raw.trim();
        let (number, suffix_unit) = if let Some(stripped) = trimmed.strip_suffix('%') {
            (stripped, Some(SizeUnit::Percent))
        } else if let Some(stripped) = trimmed.strip_suffix("px") {
            (stripped, Some(SizeUnit::Pixels))
        } else {
            (trimmed, None)
        };

        let value = parse_number(field, number)?;
        let unit = match suffix_unit {
            Some(unit) => unit,
            None => unit.map(SizeUnit::from_str).transpose()?.unwrap_or(SizeUnit::Pixels),
        };

        Ok(Self { value, unit })
    }

    /// Resolve to a whole pixel count against the current extent.
    /// Fractions are truncated, negatives clamp to zero. The result is not
    /// bounded above; `ResizeTarget::target_dimensions` checks it.
    pub fn resolve(&self, current: u32) -> f64 {
        let target = match self.unit {
            SizeUnit::Percent => current as f64 * (self.value / 100.0),
            SizeUnit::Pixels => self.value,
        };
        target.floor().max(0.0)
    }
}

/// Requested output size of the preprocessing resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeTarget {
    pub width: ResizeDimension,
    pub height: ResizeDimension,
}

impl Default for ResizeTarget {
    fn default() -> Self {
        Self {
            width: ResizeDimension::pixels(DEFAULT_PREPROCESS_SIZE),
            height: ResizeDimension::pixels(DEFAULT_PREPROCESS_SIZE),
        }
    }
}

impl ResizeTarget {
    /// Integer target dimensions for an image of `(width, height)`.
    /// Empty targets and targets above the decode pixel limit are refused.
    pub fn target_dimensions(&self, current: (u32, u32)) -> ConvertResult<(u32, u32)> {
        let width = self.width.resolve(current.0);
        let height = self.height.resolve(current.1);
        if width < 1.0 || height < 1.0 {
            return Err(ConvertError::InvalidDimensions {
                width: width as u32,
                height: height as u32,
            });
        }
        if width * height > MAX_IMAGE_PIXELS as f64 {
            return Err(ConvertError::ResizeTooLarge {
                width,
                height,
                limit: MAX_IMAGE_PIXELS,
            });
        }

        // Both axes are at least 1 and their product is under the limit.
        Ok((width as u32, height as u32))
    }
}

/// Layout of JSON exports spanning more than one row chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum JsonLayout {
    /// A single well-formed array of row arrays
    #[default]
    Document,
    /// One array per row chunk, concatenated without separators
    Fragments,
}

/// Validated parameters for one conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    pub scale: f64,
    pub offset: f64,
    pub tile_size: u32,
    pub export_chunk_rows: usize,
    pub resize: Option<ResizeTarget>,
    pub json_layout: JsonLayout,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            offset: DEFAULT_OFFSET,
            tile_size: DEFAULT_TILE_SIZE,
            export_chunk_rows: DEFAULT_EXPORT_CHUNK_ROWS,
            resize: DEFAULT_PREPROCESS_ENABLED.then(ResizeTarget::default),
            json_layout: JsonLayout::default(),
        }
    }
}

impl ConversionSettings {
    /// Load settings from a JSON file; absent fields take their defaults.
    pub fn from_json_file(path: &Path) -> ConvertResult<Self> {
        let raw = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> ConvertResult<()> {
        if !self.scale.is_finite() {
            return Err(ConvertError::InvalidNumber {
                field: "Scale",
                value: self.scale.to_string(),
            });
        }
        if !self.offset.is_finite() {
            return Err(ConvertError::InvalidNumber {
                field: "Offset",
                value: self.offset.to_string(),
            });
        }
        if !(self.scale.abs() + self.offset.abs()).is_finite() {
            return Err(ConvertError::InvalidSetting(format!(
                "scale {} with offset {} overflows the elevation range",
                self.scale, self.offset
            )));
        }
        if self.tile_size == 0 {
            return Err(ConvertError::InvalidSetting(
                "tile size must be at least 1 pixel".into(),
            ));
        }
        if self.export_chunk_rows == 0 {
            return Err(ConvertError::InvalidSetting(
                "export chunk must hold at least 1 row".into(),
            ));
        }
        Ok(())
    }
}

/// Raw textual input as typed by the user. `None` keeps the base value.
#[derive(Debug, Clone, Default)]
pub struct SettingsInput {
    pub scale: Option<String>,
    pub offset: Option<String>,
    pub preprocess: Option<bool>,
    pub width: Option<String>,
    pub width_unit: Option<String>,
    pub height: Option<String>,
    pub height_unit: Option<String>,
    pub tile_size: Option<u32>,
    pub export_chunk_rows: Option<usize>,
    pub json_layout: Option<JsonLayout>,
}

impl SettingsInput {
    /// Validate the input on top of `base`, returning new settings.
    pub fn apply_to(&self, base: &ConversionSettings) -> ConvertResult<ConversionSettings> {
        let mut settings = base.clone();

        // Scale and offset are checked before anything else is touched.
        if let Some(raw) = &self.scale {
            settings.scale = parse_number("Scale", raw)?;
        }
        if let Some(raw) = &self.offset {
            settings.offset = parse_number("Offset", raw)?;
        }

        let resize_requested = self.width.is_some() || self.height.is_some();
        match self.preprocess {
            Some(false) => settings.resize = None,
            Some(true) if settings.resize.is_none() => {
                settings.resize = Some(ResizeTarget::default())
            }
            None if resize_requested && settings.resize.is_none() => {
                settings.resize = Some(ResizeTarget::default())
            }
            _ => {}
        }

        if let Some(target) = settings.resize.as_mut() {
            if let Some(raw) = &self.width {
                target.width =
                    ResizeDimension::parse("Preprocessing width", raw, self.width_unit.as_deref())?;
            } else if let Some(unit) = &self.width_unit {
                target.width.unit = unit.parse()?;
            }
            if let Some(raw) = &self.height {
                target.height = ResizeDimension::parse(
                    "Preprocessing height",
                    raw,
                    self.height_unit.as_deref(),
                )?;
            } else if let Some(unit) = &self.height_unit {
                target.height.unit = unit.parse()?;
            }
        }

        if let Some(tile_size) = self.tile_size {
            settings.tile_size = tile_size;
        }
        if let Some(rows) = self.export_chunk_rows {
            settings.export_chunk_rows = rows;
        }
        if let Some(layout) = self.json_layout {
            settings.json_layout = layout;
        }

        settings.validate()?;
        Ok(settings)
    }
}

/// Parse a finite floating-point number typed by the user.
pub fn parse_number(field: &'static str, raw: &str) -> ConvertResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConvertError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_resolves_with_floor() {
        assert_eq!(ResizeDimension::percent(50.0).resolve(200), 100.0);
        assert_eq!(ResizeDimension::percent(33.0).resolve(10), 3.0);
        assert_eq!(ResizeDimension::percent(99.9).resolve(7), 6.0);
        assert_eq!(ResizeDimension::percent(-20.0).resolve(7), 0.0);
    }

    #[test]
    fn pixels_resolve_to_given_integer() {
        assert_eq!(ResizeDimension::pixels(320.0).resolve(9999), 320.0);
        assert_eq!(ResizeDimension::pixels(320.7).resolve(1), 320.0);
    }

    #[test]
    fn parse_accepts_suffixes_and_units() {
        let d = ResizeDimension::parse("w", "50%", None).unwrap();
        assert_eq!(d, ResizeDimension::percent(50.0));

        let d = ResizeDimension::parse("w", " 640px ", Some("%")).unwrap();
        assert_eq!(d, ResizeDimension::pixels(640.0));

        let d = ResizeDimension::parse("w", "25", Some("%")).unwrap();
        assert_eq!(d, ResizeDimension::percent(25.0));

        assert!(matches!(
            ResizeDimension::parse("w", "25", Some("cm")),
            Err(ConvertError::InvalidUnit(_))
        ));
    }

    #[test]
    fn zero_target_is_rejected() {
        let target = ResizeTarget {
            width: ResizeDimension::percent(0.4),
            height: ResizeDimension::pixels(10.0),
        };
        assert!(matches!(
            target.target_dimensions((100, 100)),
            Err(ConvertError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn oversized_target_is_rejected() {
        let input = SettingsInput {
            width: Some("1e12".into()),
            height: Some("1e12%".into()),
            ..Default::default()
        };
        let target = input
            .apply_to(&ConversionSettings::default())
            .unwrap()
            .resize
            .unwrap();
        assert!(matches!(
            target.target_dimensions((10, 10)),
            Err(ConvertError::ResizeTooLarge { .. })
        ));

        // each axis fits in u32 but the area is above the limit
        let wide = ResizeTarget {
            width: ResizeDimension::pixels(100_000.0),
            height: ResizeDimension::pixels(100_000.0),
        };
        assert!(matches!(
            wide.target_dimensions((10, 10)),
            Err(ConvertError::ResizeTooLarge {
                limit: MAX_IMAGE_PIXELS,
                ..
            })
        ));

        let at_limit = ResizeTarget {
            width: ResizeDimension::pixels(30_000.0),
            height: ResizeDimension::pixels(31_104.0),
        };
        assert_eq!(at_limit.target_dimensions((10, 10)).unwrap(), (30_000, 31_104));
    }

    #[test]
    fn non_numeric_scale_is_reported() {
        let input = SettingsInput {
            scale: Some("tall".into()),
            ..Default::default()
        };
        let err = input.apply_to(&ConversionSettings::default()).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidNumber { field: "Scale", .. }));
        assert_eq!(err.to_string(), "Scale must be a number, got 'tall'");
    }

    #[test]
    fn non_numeric_resize_is_reported() {
        let input = SettingsInput {
            width: Some("wide%".into()),
            ..Default::default()
        };
        let err = input.apply_to(&ConversionSettings::default()).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::InvalidNumber {
                field: "Preprocessing width",
                ..
            }
        ));
    }

    #[test]
    fn preprocess_toggle_controls_resize() {
        let base = ConversionSettings::default();
        assert!(base.resize.is_some());

        let off = SettingsInput {
            preprocess: Some(false),
            width: Some("10%".into()),
            ..Default::default()
        };
        assert_eq!(off.apply_to(&base).unwrap().resize, None);

        let no_resize = ConversionSettings {
            resize: None,
            ..Default::default()
        };
        let width_only = SettingsInput {
            width: Some("50%".into()),
            ..Default::default()
        };
        let resize = width_only.apply_to(&no_resize).unwrap().resize.unwrap();
        assert_eq!(resize.width, ResizeDimension::percent(50.0));
        assert_eq!(resize.height, ResizeDimension::pixels(500.0));
    }

    #[test]
    fn zero_tile_size_is_invalid() {
        let input = SettingsInput {
            tile_size: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            input.apply_to(&ConversionSettings::default()),
            Err(ConvertError::InvalidSetting(_))
        ));
    }

    #[test]
    fn overflowing_elevation_is_invalid() {
        let input = SettingsInput {
            scale: Some("1e308".into()),
            offset: Some("1e308".into()),
            ..Default::default()
        };
        let err = input.apply_to(&ConversionSettings::default()).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidSetting(_)));

        let settings = ConversionSettings {
            scale: f64::MAX,
            offset: -f64::MAX,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let negative_scale = SettingsInput {
            scale: Some("-1e300".into()),
            offset: Some("1e300".into()),
            ..Default::default()
        };
        assert!(negative_scale.apply_to(&ConversionSettings::default()).is_ok());
    }

    #[test]
    fn settings_json_fills_missing_fields() {
        let settings: ConversionSettings =
            serde_json::from_str(r#"{"scale": 2.5, "resize": null, "json_layout": "fragments"}"#)
                .unwrap();
        assert_eq!(settings.scale, 2.5);
        assert_eq!(settings.offset, DEFAULT_OFFSET);
        assert_eq!(settings.resize, None);
        assert_eq!(settings.json_layout, JsonLayout::Fragments);
        assert_eq!(settings.tile_size, DEFAULT_TILE_SIZE);
    }
}
