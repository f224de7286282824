//! HTTP calls against the driver service

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{info, instrument};

use crate::discovery::HealthProbe;
use crate::types::{HealthReport, PrinterInfo};
use crate::{ClientConfig, ClientError, ClientResult};

/// Path the driver answers identity and liveness probes on
pub const HEALTH_PATH: &str = "/health";

/// HTTP client for the driver service
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct DriverHttp {
    client: Client,
}

impl DriverHttp {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        // Driver is on loopback
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .no_proxy()
            .build()?;
        Ok(Self { client })
    }

    fn url(endpoint: &str, path: &str) -> String {
        format!("{}{}", endpoint.trim_end_matches('/'), path)
    }

    /// Submit raw command bytes to `printer` through the driver at `endpoint`
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub async fn submit(&self, endpoint: &str, printer: &str, data: Vec<u8>) -> ClientResult<()> {
        let response = self
            .client
            .post(Self::url(endpoint, "/print"))
            .query(&[("printer", printer)])
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .send()
            .await
            .map_err(|e| ClientError::DeliveryFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::DeliveryFailed(format!("{}: {}", status, text)));
        }

        info!("Print job accepted by driver");
        Ok(())
    }

    /// List the printers known to the driver at `endpoint`
    #[instrument(skip(self))]
    pub async fn printers(&self, endpoint: &str) -> ClientResult<Vec<PrinterInfo>> {
        let response = self
            .client
            .get(Self::url(endpoint, "/printers"))
            .send()
            .await
            .map_err(|e| ClientError::DeliveryFailed(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::DeliveryFailed(e.to_string()))?;
        if !status.is_success() {
            return Err(ClientError::DeliveryFailed(format!("{}: {}", status, text)));
        }

        serde_json::from_str(&text)
            .map_err(|e| ClientError::DeliveryFailed(format!("malformed printer list: {}", e)))
    }
}

#[async_trait]
impl HealthProbe for DriverHttp {
    async fn health(&self, base_url: &str) -> ClientResult<HealthReport> {
        let response = self.client.get(Self::url(base_url, HEALTH_PATH)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::InvalidResponse(format!(
                "health check returned {}",
                status
            )));
        }

        Ok(response.json().await?)
    }
}
