// cdh-client/examples/print_receipt.rs
// Builds a small receipt with a raster banner and prints it through the local driver.
//
// Usage: print_receipt [printer-name]
// Environment: CDH_DRIVER_URL to skip discovery, RUST_LOG for log level.

use cdh_client::{ClientConfig, ClientError, PixelBuffer, PrintSession};
use tracing_subscriber::EnvFilter;

/// Checkerboard banner, 384 dots wide
fn banner(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = if (x / 16 + y / 16) % 2 == 0 { 0 } else { 255 };
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    data
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let printer = std::env::args().nth(1).unwrap_or_else(|| "POS-80".to_string());
    let config = ClientConfig::from_env()?;
    let mut session = PrintSession::new(&config)?;

    match session.printers().await {
        Ok(printers) => {
            for p in &printers {
                tracing::info!(name = %p.name, port = %p.port, status = %p.status_text, "printer");
            }
        }
        Err(ClientError::DriverNotFound) => {
            tracing::error!("Driver service is not running on localhost:9123-9130");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    let pixels = banner(384, 48);
    let image = PixelBuffer::new(384, 48, &pixels)?;

    session
        .builder()
        .init()
        .center()
        .image(&image)?
        .double_size()
        .line("RECEIPT")
        .reset_size()
        .left()
        .separator('-')
        .line_lr("Coffee", "2.50")
        .line_lr("Croissant", "1.80")
        .separator('-')
        .bold(true)
        .line_lr("TOTAL", "4.30")
        .bold(false)
        .feed(3)
        .cut();

    session.print(&printer).await?;
    tracing::info!(printer = %printer, "Receipt printed");
    Ok(())
}
