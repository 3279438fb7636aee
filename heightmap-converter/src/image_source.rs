/// Source image decoding to 8-bit intensity
use crate::error::{ConvertError, ConvertResult};
use constants::conversion::MAX_IMAGE_PIXELS;
use image::GrayImage;
use image::io::{Limits, Reader};
use std::path::Path;

/// Decode an image file and convert it to single-channel luma.
/// Images above the pixel limit are refused before any pixel data is read.
pub fn load_grayscale(path: &Path) -> ConvertResult<GrayImage> {
    if !path.is_file() {
        return Err(ConvertError::ImageNotFound(path.display().to_string()));
    }

    let (width, height) = image::image_dimensions(path)?;
    let pixels = width as u64 * height as u64;
    if pixels > MAX_IMAGE_PIXELS {
        return Err(ConvertError::ImageTooLarge {
            pixels,
            limit: MAX_IMAGE_PIXELS,
        });
    }

    let mut reader = Reader::open(path)?.with_guessed_format()?;
    reader.limits(Limits::no_limits());
    let image = reader.decode()?.into_luma8();

    log::info!(
        "Decoded {} ({}x{}, {} pixels)",
        path.display(),
        image.width(),
        image.height(),
        pixels
    );
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};
    use std::fs;

    fn crc32(bytes: &[u8]) -> u32 {
        let mut crc = 0xFFFF_FFFFu32;
        for &byte in bytes {
            crc ^= byte as u32;
            for _ in 0..8 {
                crc = if crc & 1 != 0 {
                    (crc >> 1) ^ 0xEDB8_8320
                } else {
                    crc >> 1
                };
            }
        }
        !crc
    }

    fn push_chunk(png: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
        let mut body = kind.to_vec();
        body.extend_from_slice(data);
        png.extend_from_slice(&(data.len() as u32).to_be_bytes());
        png.extend_from_slice(&body);
        png.extend_from_slice(&crc32(&body).to_be_bytes());
    }

    /// 8-bit grayscale PNG that declares `width`x`height` but carries no pixels.
    fn header_only_png(width: u32, height: u32) -> Vec<u8> {
        let mut ihdr = Vec::new();
        ihdr.extend_from_slice(&width.to_be_bytes());
        ihdr.extend_from_slice(&height.to_be_bytes());
        ihdr.extend_from_slice(&[8, 0, 0, 0, 0]);

        let mut png = b"\x89PNG\r\n\x1a\n".to_vec();
        push_chunk(&mut png, b"IHDR", &ihdr);
        push_chunk(&mut png, b"IDAT", &[]);
        push_chunk(&mut png, b"IEND", &[]);
        png
    }

    #[test]
    fn colour_png_is_converted_to_luma() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        let mut rgb = RgbImage::new(3, 2);
        rgb.put_pixel(0, 0, Rgb([255, 255, 255]));
        rgb.put_pixel(2, 1, Rgb([0, 0, 0]));
        rgb.save(&path).unwrap();

        let gray = load_grayscale(&path).unwrap();
        assert_eq!(gray.dimensions(), (3, 2));
        assert_eq!(*gray.get_pixel(0, 0), Luma([255]));
        assert_eq!(*gray.get_pixel(2, 1), Luma([0]));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_grayscale(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, ConvertError::ImageNotFound(_)));
    }

    #[test]
    fn oversized_header_is_refused_before_decoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.png");
        fs::write(&path, header_only_png(40_000, 40_000)).unwrap();

        assert_eq!(image::image_dimensions(&path).unwrap(), (40_000, 40_000));
        let err = load_grayscale(&path).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::ImageTooLarge {
                pixels: 1_600_000_000,
                limit: MAX_IMAGE_PIXELS,
            }
        ));
        assert!(err.is_recoverable());
    }
}
