/// Optional resize applied before the tile transform
use crate::error::ConvertResult;
use crate::settings::ResizeTarget;
use image::GrayImage;
use image::imageops::{self, FilterType};

/// Resize `image` to the requested target with Lanczos resampling.
/// Returns the input unchanged when it already has the target size.
pub fn resize(image: GrayImage, target: &ResizeTarget) -> ConvertResult<GrayImage> {
    let (width, height) = target.target_dimensions(image.dimensions())?;

    if (width, height) == image.dimensions() {
        log::debug!("Image already {}x{}, skipping resize", width, height);
        return Ok(image);
    }

    log::debug!(
        "Lanczos resample {:?} -> ({}, {})",
        image.dimensions(),
        width,
        height
    );
    Ok(imageops::resize(&image, width, height, FilterType::Lanczos3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use crate::settings::ResizeDimension;
    use image::Luma;

    #[test]
    fn percent_target_halves_width() {
        let image = GrayImage::from_pixel(200, 80, Luma([90]));
        let target = ResizeTarget {
            width: ResizeDimension::percent(50.0),
            height: ResizeDimension::pixels(30.0),
        };
        let resized = resize(image, &target).unwrap();
        assert_eq!(resized.dimensions(), (100, 30));
    }

    #[test]
    fn uniform_image_stays_uniform() {
        let image = GrayImage::from_pixel(64, 64, Luma([128]));
        let target = ResizeTarget {
            width: ResizeDimension::pixels(16.0),
            height: ResizeDimension::pixels(16.0),
        };
        let resized = resize(image, &target).unwrap();
        assert!(resized.pixels().all(|p| p.0[0] == 128));
    }

    #[test]
    fn zero_target_fails_without_resizing() {
        let image = GrayImage::new(10, 10);
        let target = ResizeTarget {
            width: ResizeDimension::percent(5.0),
            height: ResizeDimension::percent(100.0),
        };
        assert!(matches!(
            resize(image, &target),
            Err(ConvertError::InvalidDimensions { .. })
        ));
    }
}
