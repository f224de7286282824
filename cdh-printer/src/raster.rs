//! Raster bit image encoding (GS v 0)
//!
//! Converts RGBA pixel buffers into the ESC/POS raster command:
//!
//! ```text
//! 1D 76 30 00  xL xH  yL yH  d1 ... dk
//! ```
//!
//! where `x` is the row width in bytes (`ceil(width / 8)`), `y` is the height in
//! dots and `k = x * y`. Each data byte packs eight horizontal pixels, most
//! significant bit first; a set bit is printed (black).

use crate::error::{PrintError, PrintResult};
use tracing::instrument;

/// Default luminance cut: channel sums below this value are printed.
pub const DEFAULT_THRESHOLD: u16 = 382;

/// Largest possible channel sum (255 * 3).
pub const MAX_THRESHOLD: u16 = 765;

/// GS v 0 with normal density (m = 0)
const RASTER_HEADER: [u8; 4] = [0x1D, 0x76, 0x30, 0x00];

const MAX_FIELD: u32 = u16::MAX as u32;

/// Row width in bytes for an image `width` dots wide.
pub fn width_bytes(width: u32) -> u32 {
    width.div_ceil(8)
}

/// Read-only view over an RGBA image.
///
/// Each pixel occupies 4 bytes in red, green, blue, alpha order.
/// The alpha channel is never read.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> PixelBuffer<'a> {
    /// Wrap `data` as a `width` x `height` RGBA image.
    ///
    /// Fails with [`PrintError::InvalidImage`] if either dimension is zero or
    /// `data.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> PrintResult<Self> {
        if width == 0 || height == 0 {
            return Err(PrintError::InvalidImage(format!(
                "dimensions must be positive, got {}x{}",
                width, height
            )));
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                PrintError::InvalidImage(format!("{}x{} overflows buffer size", width, height))
            })?;

        if data.len() != expected {
            return Err(PrintError::InvalidImage(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Borrow an [`image::RgbaImage`] as a pixel buffer
    #[cfg(feature = "image")]
    pub fn from_rgba(img: &'a image::RgbaImage) -> PrintResult<Self> {
        Self::new(img.width(), img.height(), img.as_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Row width of the encoded image in bytes
    pub fn width_bytes(&self) -> u32 {
        width_bytes(self.width)
    }

    /// Sum of the red, green and blue channels at (x, y), in 0..=765.
    ///
    /// Callers must keep `x < width` and `y < height`.
    fn channel_sum(&self, x: u32, y: u32) -> u16 {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.data[idx..idx + 3];
        px[0] as u16 + px[1] as u16 + px[2] as u16
    }
}

/// Raster encoder with a configurable threshold
#[derive(Debug, Clone, Copy)]
pub struct RasterEncoder {
    threshold: u16,
}

impl RasterEncoder {
    /// Create an encoder with the default threshold (382)
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Create an encoder with a custom threshold in `0..=765`
    pub fn with_threshold(threshold: u16) -> PrintResult<Self> {
        if threshold > MAX_THRESHOLD {
            return Err(PrintError::InvalidConfig(format!(
                "threshold {} outside 0..={}",
                threshold, MAX_THRESHOLD
            )));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    /// Encode `buffer` as a GS v 0 raster command.
    ///
    /// A pixel is printed iff `r + g + b < threshold`. Transparent pixels are
    /// treated like opaque ones of the same colour.
    #[instrument(skip(self, buffer), fields(width = buffer.width(), height = buffer.height()))]
    pub fn encode(&self, buffer: &PixelBuffer<'_>) -> PrintResult<Vec<u8>> {
        let x_bytes = buffer.width_bytes();
        let height = buffer.height();

        if x_bytes > MAX_FIELD || height > MAX_FIELD {
            return Err(PrintError::SizeOverflow {
                width_bytes: x_bytes,
                height,
            });
        }

        let mut data = Vec::with_capacity(8 + x_bytes as usize * height as usize);
        data.extend_from_slice(&RASTER_HEADER);
        data.push((x_bytes % 256) as u8);
        data.push((x_bytes / 256) as u8);
        data.push((height % 256) as u8);
        data.push((height / 256) as u8);

        let width = buffer.width();
        for y in 0..height {
            for x_byte in 0..x_bytes {
                let mut byte = 0u8;
                for bit in 0..8 {
                    let x = x_byte * 8 + bit;
                    // Padding past the right edge stays white
                    if x >= width {
                        break;
                    }
                    if buffer.channel_sum(x, y) < self.threshold {
                        byte |= 0x80 >> bit;
                    }
                }
                data.push(byte);
            }
        }

        Ok(data)
    }
}

impl Default for RasterEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode `buffer` with the given threshold.
///
/// Shorthand for `RasterEncoder::with_threshold(threshold)?.encode(buffer)`.
pub fn encode(buffer: &PixelBuffer<'_>, threshold: u16) -> PrintResult<Vec<u8>> {
    RasterEncoder::with_threshold(threshold)?.encode(buffer)
}

/// Open an image file and scale it down to at most `max_width` dots.
///
/// Images narrower than `max_width` are left at their original size. Common
/// print head widths are 384 dots (58mm) and 576 dots (80mm).
#[cfg(feature = "image")]
#[instrument]
pub fn load_image(path: &str, max_width: u32) -> PrintResult<image::RgbaImage> {
    use image::GenericImageView;
    use tracing::info;

    let img = image::open(path)?;
    let (w, h) = img.dimensions();
    info!(dimensions = ?(w, h), "image opened");

    if w <= max_width || max_width == 0 {
        return Ok(img.to_rgba8());
    }

    let new_h = ((h as u64 * max_width as u64) / w as u64).max(1) as u32;
    let resized = img.resize_exact(max_width, new_h, image::imageops::FilterType::Nearest);
    Ok(resized.to_rgba8())
}
