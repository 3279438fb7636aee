/// Conversion session carrying state between load, process, save and preview.
use crate::error::{ConvertError, ConvertResult};
use crate::export::{ExportFormat, ExportOptions, export_to_path};
use crate::image_source::load_grayscale;
use crate::manifest::HeightmapManifest;
use crate::preprocess;
use crate::preview::{Colormap, save_preview};
use crate::progress::Progress;
use crate::range::ElevationRange;
use crate::settings::{ConversionSettings, SettingsInput};
use crate::transform::{Heightmap, image_to_heightmap};
use std::path::{Path, PathBuf};

/// One user's conversion session.
/// Every operation may be retried after a reported error.
pub struct HeightmapConverter {
    /// Image selected by the user, decoded lazily on `process`.
    image_path: Option<PathBuf>,
    /// Validated parameters for the next `process` / `save`.
    settings: ConversionSettings,
    /// Grid from the last successful `process`.
    heightmap: Option<Heightmap>,
    /// In-app message log, oldest first.
    messages: Vec<String>,
}

impl HeightmapConverter {
    pub fn new(settings: ConversionSettings) -> Self {
        Self {
            image_path: None,
            settings,
            heightmap: None,
            messages: Vec::new(),
        }
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    pub fn heightmap(&self) -> Option<&Heightmap> {
        self.heightmap.as_ref()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Select the source image. The file is only decoded by `process`.
    pub fn load_image(&mut self, path: &Path) -> ConvertResult<()> {
        if !path.is_file() {
            return self.report(Err(ConvertError::ImageNotFound(
                path.display().to_string(),
            )));
        }

        self.image_path = Some(path.to_path_buf());
        self.log(format!("Loaded image: {}", path.display()));
        Ok(())
    }

    /// Validate raw user input and adopt it as the current settings.
    pub fn apply_inputs(&mut self, input: &SettingsInput) -> ConvertResult<()> {
        let result = input.apply_to(&self.settings);
        let settings = self.report(result)?;
        self.settings = settings;
        Ok(())
    }

    /// Decode, optionally resize, and transform the loaded image.
    /// The previous grid is kept if anything fails.
    pub fn process(&mut self, progress: &mut dyn Progress) -> ConvertResult<&Heightmap> {
        let result = self.build_heightmap(progress);
        let heightmap = self.report(result)?;

        self.log(format!(
            "Image processed successfully ({}x{})",
            heightmap.width(),
            heightmap.height()
        ));
        progress.finish("Image processed");
        Ok(self.heightmap.insert(heightmap))
    }

    fn build_heightmap(&mut self, progress: &mut dyn Progress) -> ConvertResult<Heightmap> {
        let path = self.image_path.clone().ok_or(ConvertError::MissingImage)?;
        self.settings.validate()?;

        let mut image = load_grayscale(&path)?;
        if let Some(target) = self.settings.resize {
            let (width, height) = target.target_dimensions(image.dimensions())?;
            self.log(format!("Resizing image to ({}, {})", width, height));
            image = preprocess::resize(image, &target)?;
        }

        Ok(image_to_heightmap(
            &image,
            self.settings.scale,
            self.settings.offset,
            self.settings.tile_size,
            progress,
        ))
    }

    /// Export the current grid; the format follows the path's extension.
    pub fn save(&mut self, path: &Path, progress: &mut dyn Progress) -> ConvertResult<ExportFormat> {
        let options = ExportOptions {
            chunk_rows: self.settings.export_chunk_rows,
            json_layout: self.settings.json_layout,
        };
        let result = match &self.heightmap {
            Some(heightmap) => export_to_path(heightmap, path, options, progress),
            None => Err(ConvertError::MissingHeightmap),
        };
        let format = self.report(result)?;

        self.log(format!("Heightmap saved to {}", path.display()));
        progress.finish("Heightmap saved");
        Ok(format)
    }

    /// Write a manifest sidecar for an export already written to `output`.
    pub fn write_manifest(&mut self, output: &Path, format: ExportFormat) -> ConvertResult<PathBuf> {
        let result = match &self.heightmap {
            Some(heightmap) => HeightmapManifest::new(
                self.image_path.as_deref(),
                output,
                format,
                &self.settings,
                (heightmap.width(), heightmap.height()),
                &ElevationRange::of(heightmap),
            )
            .write_for(output),
            None => Err(ConvertError::MissingHeightmap),
        };
        let manifest_path = self.report(result)?;
        self.log(format!("Manifest saved to {}", manifest_path.display()));
        Ok(manifest_path)
    }

    /// Render the current grid to a PNG preview.
    pub fn preview(&mut self, path: &Path, colormap: Colormap) -> ConvertResult<ElevationRange> {
        let result = match &self.heightmap {
            Some(heightmap) => save_preview(heightmap, path, colormap),
            None => Err(ConvertError::MissingHeightmap),
        };
        let range = self.report(result)?;

        self.log(format!(
            "Heightmap preview saved to {} (range {} to {})",
            path.display(),
            range.min,
            range.max
        ));
        Ok(range)
    }

    fn log(&mut self, message: String) {
        log::info!("{}", message);
        self.messages.push(message);
    }

    /// Record a failed result in the message log before returning it.
    fn report<T>(&mut self, result: ConvertResult<T>) -> ConvertResult<T> {
        if let Err(err) = &result {
            if err.is_recoverable() {
                log::warn!("{}", err);
            } else {
                log::error!("{}", err);
            }
            self.messages.push(format!("Error: {}", err));
        }
        result
    }
}

impl Default for HeightmapConverter {
    fn default() -> Self {
        Self::new(ConversionSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;

    #[test]
    fn process_without_image_reports_precondition() {
        let mut session = HeightmapConverter::default();
        let err = session.process(&mut NoProgress).unwrap_err();

        assert!(matches!(err, ConvertError::MissingImage));
        assert!(session.heightmap().is_none());
        assert_eq!(
            session.messages().last().map(String::as_str),
            Some("Error: Please load an image first")
        );
    }

    #[test]
    fn save_and_preview_require_a_grid() {
        let mut session = HeightmapConverter::default();
        let dir = tempfile::tempdir().unwrap();

        let err = session
            .save(&dir.path().join("out.csv"), &mut NoProgress)
            .unwrap_err();
        assert!(matches!(err, ConvertError::MissingHeightmap));

        let err = session
            .preview(&dir.path().join("out.png"), Colormap::Gray)
            .unwrap_err();
        assert!(matches!(err, ConvertError::MissingHeightmap));
        assert!(!dir.path().join("out.csv").exists());
        assert_eq!(session.messages().len(), 2);
    }

    #[test]
    fn invalid_inputs_keep_previous_settings() {
        let mut session = HeightmapConverter::default();
        let before = session.settings().clone();

        let input = SettingsInput {
            scale: Some("2".into()),
            offset: Some("low".into()),
            ..Default::default()
        };
        assert!(session.apply_inputs(&input).is_err());
        assert_eq!(session.settings(), &before);

        let input = SettingsInput {
            scale: Some("2".into()),
            offset: Some("-1".into()),
            ..Default::default()
        };
        session.apply_inputs(&input).unwrap();
        assert_eq!(session.settings().scale, 2.0);
        assert_eq!(session.settings().offset, -1.0);
    }

    #[test]
    fn loading_missing_file_is_reported() {
        let mut session = HeightmapConverter::default();
        assert!(session.load_image(Path::new("nope/missing.png")).is_err());
        assert!(session.image_path().is_none());
        assert_eq!(session.messages().len(), 1);
    }
}
