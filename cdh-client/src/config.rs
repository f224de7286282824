//! Client configuration

use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// First port probed for the driver service
pub const DEFAULT_PORT_LOW: u16 = 9123;
/// Last port probed for the driver service (inclusive)
pub const DEFAULT_PORT_HIGH: u16 = 9130;
/// Identity the driver reports in its health response
pub const DEFAULT_SIGNATURE: &str = "CDH-Driver";
/// Per-probe timeout during discovery
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_millis(100);

/// Where and how to look for the driver service
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Host the candidate ports are probed on
    pub host: String,

    /// First candidate port
    pub port_low: u16,

    /// Last candidate port (inclusive)
    pub port_high: u16,

    /// Expected `service` field of the health response
    pub signature: String,

    /// Timeout applied to each health probe
    pub health_timeout: Duration,

    /// Fixed endpoint that replaces port scanning
    pub endpoint_override: Option<String>,
}

impl DiscoveryConfig {
    /// Defaults: `localhost:9123..=9130`, signature `CDH-Driver`, 100ms per probe
    pub fn new() -> Self {
        Self {
            host: "localhost".to_string(),
            port_low: DEFAULT_PORT_LOW,
            port_high: DEFAULT_PORT_HIGH,
            signature: DEFAULT_SIGNATURE.to_string(),
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
            endpoint_override: None,
        }
    }

    /// Set the host candidate ports are probed on
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the inclusive candidate port range
    pub fn with_port_range(mut self, low: u16, high: u16) -> Self {
        self.port_low = low;
        self.port_high = high;
        self
    }

    /// Set the expected service signature
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    /// Set the per-probe timeout
    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    /// Use a fixed endpoint instead of scanning
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.endpoint_override = Some(endpoint.trim_end_matches('/').to_string());
        self
    }

    /// Base URLs to probe, in ascending port order
    pub fn candidates(&self) -> impl Iterator<Item = String> + '_ {
        (self.port_low..=self.port_high).map(move |port| format!("http://{}:{}", self.host, port))
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client configuration for talking to the driver service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Discovery settings
    pub discovery: DiscoveryConfig,

    /// Timeout in seconds for print and enumeration requests
    pub timeout: u64,

    /// Paper width in characters for the session's command builder
    pub paper_width: usize,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            discovery: DiscoveryConfig::new(),
            timeout: 30,
            paper_width: 48,
        }
    }

    /// Read overrides from the environment
    ///
    /// - `CDH_DRIVER_URL`: fixed driver endpoint, disables scanning
    /// - `CDH_REQUEST_TIMEOUT`: request timeout in seconds
    pub fn from_env() -> ClientResult<Self> {
        let mut config = Self::new();

        if let Ok(url) = std::env::var("CDH_DRIVER_URL")
            && !url.is_empty()
        {
            config.discovery = config.discovery.with_endpoint(url);
        }

        if let Ok(timeout) = std::env::var("CDH_REQUEST_TIMEOUT") {
            let seconds = timeout.parse().map_err(|_| {
                ClientError::InvalidConfig(format!("CDH_REQUEST_TIMEOUT: {}", timeout))
            })?;
            config.timeout = seconds;
        }

        Ok(config)
    }

    /// Set the discovery settings
    pub fn with_discovery(mut self, discovery: DiscoveryConfig) -> Self {
        self.discovery = discovery;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the paper width in characters
    pub fn with_paper_width(mut self, width: usize) -> Self {
        self.paper_width = width;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
