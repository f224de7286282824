//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Pixel buffer dimensions do not match its data
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Image does not fit the 16-bit size fields of the raster command
    #[error("Image too large: {width_bytes} bytes wide, {height} rows high (max 65535 each)")]
    SizeOverflow { width_bytes: u32, height: u32 },

    /// Invalid encoder configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Image file could not be opened or decoded
    #[cfg(feature = "image")]
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
