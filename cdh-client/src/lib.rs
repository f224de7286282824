//! CDH Client - delivers ESC/POS jobs through the local driver service
//!
//! The driver listens on one port of `localhost:9123..=9130`. The client
//! finds it, verifies its identity, and keeps the endpoint cached until it
//! stops answering.

pub mod config;
pub mod discovery;
pub mod error;
pub mod http;
pub mod session;
pub mod types;

pub use config::{ClientConfig, DiscoveryConfig};
pub use discovery::{DiscoveryState, DriverDiscovery, HealthProbe};
pub use error::{ClientError, ClientResult};
pub use http::DriverHttp;
pub use session::PrintSession;
pub use types::{HealthReport, PrinterInfo, filter_by_usb_id};

// Re-export printer types for convenience
pub use cdh_printer::{EscPosBuilder, PixelBuffer, RasterEncoder};
