//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// No port in the candidate range answered as the driver service
    #[error("Driver service not found")]
    DriverNotFound,

    /// The verified driver rejected or failed a print or enumeration request
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    /// Response did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid client configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Command building or image encoding failed
    #[error("Print error: {0}")]
    Print(#[from] cdh_printer::PrintError),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
