//! Driver service discovery
//!
//! The driver listens on one port of a small, fixed range. [`DriverDiscovery`]
//! finds it by probing each candidate's health endpoint in ascending order,
//! accepts the first one that reports the expected service signature, and
//! caches that endpoint. A cached endpoint is re-checked on every
//! [`locate`](DriverDiscovery::locate); if the check fails the cache is dropped
//! and the range is scanned again.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, trace, warn};

use crate::config::DiscoveryConfig;
use crate::error::{ClientError, ClientResult};
use crate::types::HealthReport;

/// One health request against a candidate base URL
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Fetch `{base_url}/health`. Non-success statuses are errors.
    async fn health(&self, base_url: &str) -> ClientResult<HealthReport>;
}

/// Whether a verified endpoint is cached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    Unresolved,
    Verified,
}

/// Locates and caches the driver endpoint
///
/// Calls to [`locate`](Self::locate) on one instance are serialized; the lock
/// is held for the whole liveness check or scan.
pub struct DriverDiscovery<P> {
    probe: P,
    config: DiscoveryConfig,
    cached: Mutex<Option<String>>,
}

impl<P: HealthProbe> DriverDiscovery<P> {
    pub fn new(probe: P, config: DiscoveryConfig) -> Self {
        Self {
            probe,
            config,
            cached: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub async fn state(&self) -> DiscoveryState {
        if self.cached.lock().await.is_some() {
            DiscoveryState::Verified
        } else {
            DiscoveryState::Unresolved
        }
    }

    /// Endpoint verified by the last successful [`locate`](Self::locate), if any
    pub async fn cached_endpoint(&self) -> Option<String> {
        self.cached.lock().await.clone()
    }

    /// Forget the cached endpoint
    pub async fn invalidate(&self) {
        self.cached.lock().await.take();
    }

    /// Make sure a verified driver endpoint is known.
    ///
    /// Returns `false` if no candidate answered with the expected signature.
    pub async fn locate(&self) -> bool {
        let mut cached = self.cached.lock().await;
        self.locate_locked(&mut cached).await
    }

    /// Locate the driver and return its endpoint, or
    /// [`ClientError::DriverNotFound`]
    pub async fn endpoint(&self) -> ClientResult<String> {
        let mut cached = self.cached.lock().await;
        if self.locate_locked(&mut cached).await
            && let Some(endpoint) = cached.as_deref()
        {
            return Ok(endpoint.to_string());
        }
        Err(ClientError::DriverNotFound)
    }

    #[instrument(skip(self, cached))]
    async fn locate_locked(&self, cached: &mut Option<String>) -> bool {
        if let Some(endpoint) = cached.as_deref() {
            if self.is_driver(endpoint).await {
                trace!(endpoint, "cached driver alive");
                return true;
            }
            warn!(endpoint, "cached driver lost, rescanning");
            *cached = None;
        }

        if let Some(endpoint) = &self.config.endpoint_override {
            if self.is_driver(endpoint).await {
                info!(endpoint = %endpoint, "driver verified at configured endpoint");
                *cached = Some(endpoint.clone());
                return true;
            }
            warn!(endpoint = %endpoint, "configured driver endpoint not available");
            return false;
        }

        debug!(
            host = %self.config.host,
            low = self.config.port_low,
            high = self.config.port_high,
            "scanning for driver"
        );

        for candidate in self.config.candidates() {
            if self.is_driver(&candidate).await {
                info!(endpoint = %candidate, "driver found");
                *cached = Some(candidate);
                return true;
            }
        }

        warn!("no driver found in port range");
        false
    }

    /// Health probe that also checks the service signature
    async fn is_driver(&self, base_url: &str) -> bool {
        match self.probe_once(base_url).await {
            Some(report) if report.service == self.config.signature => true,
            Some(report) => {
                trace!(base_url, service = %report.service, "foreign service, skipping");
                false
            }
            None => false,
        }
    }

    /// One health probe bounded by the configured timeout; `None` on any miss
    async fn probe_once(&self, base_url: &str) -> Option<HealthReport> {
        match tokio::time::timeout(self.config.health_timeout, self.probe.health(base_url)).await {
            Ok(Ok(report)) => Some(report),
            Ok(Err(e)) => {
                trace!(base_url, error = %e, "no driver");
                None
            }
            Err(_) => {
                trace!(base_url, "health probe timed out");
                None
            }
        }
    }
}
