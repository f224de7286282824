//! # cdh-printer
//!
//! ESC/POS thermal printer library - command building and raster images.
//!
//! ## Scope
//!
//! This crate produces the bytes a receipt printer understands:
//! - ESC/POS command building
//! - Text encoding (UTF-8, GBK, Windows-1252)
//! - Raster bit images (GS v 0) from RGBA pixel buffers
//! - Image file loading and downscaling (optional)
//!
//! Delivering the bytes to a printer is the job of `cdh-client`.
//!
//! ## Example
//!
//! ```ignore
//! use cdh_printer::{EscPosBuilder, PixelBuffer};
//!
//! let logo = PixelBuffer::new(width, height, &rgba)?;
//!
//! let mut builder = EscPosBuilder::new(48);
//! builder.init().center();
//! builder.image(&logo)?;
//! builder.line("Thank you!").feed(3).cut();
//!
//! let bytes = builder.build();
//! ```

mod encoding;
mod error;
mod escpos;
pub mod raster;

// Re-exports
pub use encoding::TextEncoding;
pub use error::{PrintError, PrintResult};
pub use escpos::{Align, EscPosBuilder, MAX_QR_DATA};
pub use raster::{DEFAULT_THRESHOLD, MAX_THRESHOLD, PixelBuffer, RasterEncoder, encode};

#[cfg(feature = "image")]
pub use raster::load_image;
