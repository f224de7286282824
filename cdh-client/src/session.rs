//! Print session: command buffer plus delivery through the driver

use cdh_printer::EscPosBuilder;
use tracing::{instrument, warn};

use crate::config::ClientConfig;
use crate::discovery::{DriverDiscovery, HealthProbe};
use crate::error::ClientResult;
use crate::http::DriverHttp;
use crate::types::{PrinterInfo, filter_by_usb_id};

/// Builds a job and delivers it to a printer through the local driver
///
/// The command buffer is only cleared after the driver accepts a job, so a
/// failed [`print`](Self::print) can be retried without rebuilding it.
///
/// ```ignore
/// let mut session = PrintSession::new(&ClientConfig::default())?;
/// session.builder().init().line("Hello").cut();
/// session.print("Kitchen").await?;
/// ```
pub struct PrintSession<P = DriverHttp> {
    http: DriverHttp,
    discovery: DriverDiscovery<P>,
    builder: EscPosBuilder,
}

impl PrintSession<DriverHttp> {
    /// Session that discovers the driver over HTTP
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = DriverHttp::new(config)?;
        Ok(Self::with_probe(config, http.clone(), http))
    }
}

impl<P: HealthProbe> PrintSession<P> {
    /// Session with a custom health probe for discovery
    pub fn with_probe(config: &ClientConfig, http: DriverHttp, probe: P) -> Self {
        Self {
            http,
            discovery: DriverDiscovery::new(probe, config.discovery.clone()),
            builder: EscPosBuilder::new(config.paper_width),
        }
    }

    /// Command buffer for the next job
    pub fn builder(&mut self) -> &mut EscPosBuilder {
        &mut self.builder
    }

    /// Bytes of the pending job
    pub fn buffer(&self) -> &[u8] {
        self.builder.as_bytes()
    }

    pub fn discovery(&self) -> &DriverDiscovery<P> {
        &self.discovery
    }

    /// Send the pending job to `printer`
    ///
    /// Fails with `DriverNotFound` when no driver can be located and
    /// `DeliveryFailed` when the driver does not accept the job. The buffer is
    /// kept in both cases.
    #[instrument(skip(self), fields(bytes = self.builder.len()))]
    pub async fn print(&mut self, printer: &str) -> ClientResult<()> {
        let endpoint = self.discovery.endpoint().await?;

        if let Err(e) = self
            .http
            .submit(&endpoint, printer, self.builder.as_bytes().to_vec())
            .await
        {
            warn!(error = %e, "print job not delivered, buffer kept");
            return Err(e);
        }

        self.builder.clear();
        Ok(())
    }

    /// Printers known to the driver
    pub async fn printers(&self) -> ClientResult<Vec<PrinterInfo>> {
        let endpoint = self.discovery.endpoint().await?;
        self.http.printers(&endpoint).await
    }

    /// Printers with USB vendor id `vid` and, if given, product id `pid`
    pub async fn find_printers(&self, vid: u16, pid: Option<u16>) -> ClientResult<Vec<PrinterInfo>> {
        let printers = self.printers().await?;
        Ok(filter_by_usb_id(&printers, vid, pid)
            .into_iter()
            .cloned()
            .collect())
    }
}
