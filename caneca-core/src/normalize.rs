//! Decoding and preparation of uploaded photos for inference.

use std::io::{Cursor, Seek, Write};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageError, ImageFormat, RgbImage};
use tracing::debug;

use crate::error::RecyclingError;

/// Longest edge, in pixels, an image may have after normalization.
pub const MAX_EDGE: u32 = 800;
/// JPEG quality used when handing the bitmap to the model.
pub const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, PartialEq)]
/// Decoded RGB bitmap whose longer edge is at most [`MAX_EDGE`].
pub struct NormalizedImage {
    pixels: RgbImage,
}

impl NormalizedImage {
    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Underlying RGB buffer.
    #[must_use]
    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Encode as JPEG into memory.
    ///
    /// # Errors
    ///
    /// Returns the encoder error if the bitmap cannot be written.
    pub fn encode_jpeg(&self) -> Result<Vec<u8>, ImageError> {
        let mut buffer = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY).encode_image(&self.pixels)?;
        Ok(buffer.into_inner())
    }

    /// Write as JPEG with the encoder defaults into `writer`, e.g. an open file.
    ///
    /// # Errors
    ///
    /// Returns the encoder or I/O error if the data cannot be written.
    pub fn write_jpeg<W: Write + Seek>(&self, writer: &mut W) -> Result<(), ImageError> {
        self.pixels.write_to(writer, ImageFormat::Jpeg)
    }
}

/// Decode `bytes`, convert to RGB and shrink so the longer edge fits [`MAX_EDGE`].
///
/// Smaller images are never upscaled.
///
/// # Errors
///
/// [`RecyclingError::EmptyInput`] for a zero-length buffer and
/// [`RecyclingError::UndecodableImage`] when the bytes are not a supported image.
pub fn normalize(bytes: &[u8]) -> Result<NormalizedImage, RecyclingError> {
    if bytes.is_empty() {
        return Err(RecyclingError::EmptyInput);
    }

    let decoded = image::load_from_memory(bytes).map_err(RecyclingError::UndecodableImage)?;
    debug!(
        width = decoded.width(),
        height = decoded.height(),
        color = ?decoded.color(),
        "decoded upload"
    );

    let rgb = match decoded {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    };

    let (width, height) = rgb.dimensions();
    let pixels = match target_dimensions(width, height) {
        Some((new_width, new_height)) => {
            debug!(width, height, new_width, new_height, "downscaling upload");
            imageops::resize(&rgb, new_width, new_height, FilterType::Lanczos3)
        }
        None => rgb,
    };

    Ok(NormalizedImage { pixels })
}

/// Dimensions after downscaling, or `None` when the image already fits.
fn target_dimensions(width: u32, height: u32) -> Option<(u32, u32)> {
    let longer = width.max(height);
    if longer <= MAX_EDGE {
        return None;
    }

    let scale = |edge: u32| {
        let scaled =
            (u64::from(edge) * u64::from(MAX_EDGE) + u64::from(longer) / 2) / u64::from(longer);
        u32::try_from(scaled).unwrap_or(MAX_EDGE).max(1)
    };

    if width >= height {
        Some((MAX_EDGE, scale(height)))
    } else {
        Some((scale(width), MAX_EDGE))
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;

    fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, ImageFormat::Png)
            .expect("encode test image");
        buffer.into_inner()
    }

    #[test]
    fn large_image_is_downscaled_preserving_aspect() {
        let bytes = png_bytes(&DynamicImage::new_rgb8(1600, 1200));
        let normalized = normalize(&bytes).expect("normalize");

        assert_eq!((normalized.width(), normalized.height()), (800, 600));
    }

    #[test]
    fn portrait_image_is_capped_on_height() {
        let bytes = png_bytes(&DynamicImage::new_rgb8(900, 1800));
        let normalized = normalize(&bytes).expect("normalize");

        assert_eq!((normalized.width(), normalized.height()), (400, 800));
    }

    #[test]
    fn small_image_is_not_upscaled() {
        let bytes = png_bytes(&DynamicImage::new_rgb8(400, 300));
        let normalized = normalize(&bytes).expect("normalize");

        assert_eq!((normalized.width(), normalized.height()), (400, 300));
    }

    #[test]
    fn exactly_at_cap_is_left_alone() {
        assert_eq!(target_dimensions(800, 500), None);
        assert_eq!(target_dimensions(801, 1), Some((800, 1)));
    }

    #[test]
    fn alpha_channel_is_dropped() {
        let rgba = RgbaImage::from_pixel(10, 10, Rgba([200, 100, 50, 128]));
        let bytes = png_bytes(&DynamicImage::ImageRgba8(rgba));
        let normalized = normalize(&bytes).expect("normalize");

        assert_eq!(normalized.pixels().get_pixel(0, 0).0, [200, 100, 50]);
    }

    #[test]
    fn empty_buffer_is_rejected() {
        assert!(matches!(normalize(&[]), Err(RecyclingError::EmptyInput)));
    }

    #[test]
    fn garbage_is_undecodable() {
        let result = normalize(b"definitely not an image");
        assert!(matches!(result, Err(RecyclingError::UndecodableImage(_))));
    }

    #[test]
    fn normalized_image_reencodes_as_jpeg() {
        let bytes = png_bytes(&DynamicImage::new_rgb8(64, 48));
        let normalized = normalize(&bytes).expect("normalize");
        let jpeg = normalized.encode_jpeg().expect("encode");

        let format = image::guess_format(&jpeg).expect("guess format");
        assert_eq!(format, ImageFormat::Jpeg);
    }
}
