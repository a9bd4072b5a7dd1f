//! Upload normalization for artwork images.
//!
//! Any decodable raster image is bounded to [`MAX_DIMENSION`] on its longest
//! edge, keeping the aspect ratio, and re-encoded as JPEG at
//! [`JPEG_QUALITY`] before it goes over the network.
//!
//! # Usage
//!
//! ```no_run
//! use nydart_core::compress::{ImageNormalizer, SourceImage};
//!
//! let source = SourceImage::from_path("painting.png").unwrap();
//! let compressed = ImageNormalizer::default().normalize(&source).unwrap();
//! assert!(compressed.width.max(compressed.height) <= 1200);
//! ```

use std::io::Cursor;
use std::path::Path;

use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

use crate::error::{AdvisorError, Result};

/// Longest edge of a normalized image, in pixels.
pub const MAX_DIMENSION: u32 = 1200;

/// JPEG quality factor (0.8 on a 0..1 scale).
pub const JPEG_QUALITY: u8 = 80;

/// MIME type of every normalized image.
pub const COMPRESSED_MIME: &str = "image/jpeg";

/// A user-selected image, held in memory until submitted or discarded.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SourceImage {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mime_type = image::guess_format(&bytes)
            .ok()
            .map(|f| f.to_mime_type().to_string());
        Self {
            file_name: file_name.into(),
            mime_type,
            bytes,
        }
    }

    /// Read an image file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("artwork.jpg")
            .to_string();
        Ok(Self::new(file_name, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// A bounded, re-encoded image ready for upload.
#[derive(Debug, Clone)]
pub struct CompressedImage {
    /// Carried over unchanged from the source image.
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Refreshed at compression time.
    pub last_modified: DateTime<Utc>,
}

impl CompressedImage {
    pub fn mime_type(&self) -> &'static str {
        COMPRESSED_MIME
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Compute the output dimensions for a `width` x `height` image.
///
/// Images already within bounds are left alone. Otherwise the longest edge
/// becomes `max` and the shorter edge is scaled and rounded, never below 1.
pub fn target_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }

    let scale = |short: u32, long: u32| -> u32 {
        let scaled = (f64::from(short) / f64::from(long)) * f64::from(max);
        (scaled.round() as u32).max(1)
    };

    if width > height {
        (max, scale(height, width))
    } else {
        (scale(width, height), max)
    }
}

/// Bounds and re-encodes images for upload.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    max_dimension: u32,
    quality: u8,
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self {
            max_dimension: MAX_DIMENSION,
            quality: JPEG_QUALITY,
        }
    }
}

impl ImageNormalizer {
    /// Decode, bound and re-encode a source image.
    ///
    /// Fails with [`AdvisorError::Processing`] when the bytes are not a
    /// decodable image. No network access.
    pub fn normalize(&self, source: &SourceImage) -> Result<CompressedImage> {
        let decoded = image::load_from_memory(&source.bytes).map_err(|e| {
            AdvisorError::Processing(format!("Failed to decode {}: {e}", source.file_name))
        })?;

        let (width, height) = decoded.dimensions();
        let (target_w, target_h) = target_dimensions(width, height, self.max_dimension);

        let resized = if (target_w, target_h) == (width, height) {
            decoded
        } else {
            decoded.resize_exact(target_w, target_h, FilterType::Triangle)
        };

        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

        let mut buffer = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| AdvisorError::Processing(format!("Failed to encode JPEG: {e}")))?;
        let bytes = buffer.into_inner();

        debug!(
            file = %source.file_name,
            original_bytes = source.size(),
            compressed_bytes = bytes.len(),
            width = target_w,
            height = target_h,
            "Normalized image"
        );

        Ok(CompressedImage {
            file_name: source.file_name.clone(),
            bytes,
            width: target_w,
            height: target_h,
            last_modified: Utc::now(),
        })
    }
}
