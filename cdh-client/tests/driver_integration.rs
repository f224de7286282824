// cdh-client/tests/driver_integration.rs
// Runs a stand-in driver service on a loopback port and talks to it over HTTP.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use cdh_client::{
    ClientConfig, ClientError, DiscoveryConfig, HealthReport, PixelBuffer, PrintSession,
    PrinterInfo,
};
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Driver {
    signature: String,
    reject: AtomicBool,
    jobs: Mutex<Vec<(String, Vec<u8>)>>,
}

#[derive(Deserialize)]
struct PrintQuery {
    printer: String,
}

async fn health(State(driver): State<Arc<Driver>>) -> Json<HealthReport> {
    Json(HealthReport {
        service: driver.signature.clone(),
        version: Some("1.0.0".to_string()),
    })
}

async fn print(
    State(driver): State<Arc<Driver>>,
    Query(query): Query<PrintQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if driver.reject.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    if headers.get(header::CONTENT_TYPE).map(|v| v.as_bytes()) != Some(&b"application/octet-stream"[..]) {
        return StatusCode::UNSUPPORTED_MEDIA_TYPE;
    }
    driver
        .jobs
        .lock()
        .unwrap()
        .push((query.printer, body.to_vec()));
    StatusCode::OK
}

async fn printers() -> Json<Vec<PrinterInfo>> {
    Json(vec![
        PrinterInfo {
            name: "Kitchen".to_string(),
            driver: "escpos".to_string(),
            port: "USB001".to_string(),
            status_text: "Ready".to_string(),
            vid: Some(0x0416),
            pid: Some(0x5011),
        },
        PrinterInfo {
            name: "Bar".to_string(),
            driver: "escpos".to_string(),
            port: "USB002".to_string(),
            status_text: "Ready".to_string(),
            vid: Some(0x0416),
            pid: Some(0x5012),
        },
        PrinterInfo {
            name: "Office".to_string(),
            driver: "Generic".to_string(),
            port: "IP_192.168.1.30".to_string(),
            status_text: "Offline".to_string(),
            vid: None,
            pid: None,
        },
    ])
}

/// Start a driver on an ephemeral port, returning the port
async fn spawn_driver(signature: &str) -> (u16, Arc<Driver>) {
    let driver = Arc::new(Driver {
        signature: signature.to_string(),
        ..Default::default()
    });

    let app = Router::new()
        .route("/health", get(health))
        .route("/print", post(print))
        .route("/printers", get(printers))
        .with_state(driver.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (port, driver)
}

fn config_for(port: u16) -> ClientConfig {
    ClientConfig::new().with_timeout(5).with_discovery(
        DiscoveryConfig::new()
            .with_host("127.0.0.1")
            .with_port_range(port, port)
            .with_health_timeout(Duration::from_millis(500)),
    )
}

#[tokio::test]
async fn test_discover_and_print() {
    let (port, driver) = spawn_driver("CDH-Driver").await;
    let mut session = PrintSession::new(&config_for(port)).unwrap();

    let black = [0u8, 0, 0, 255].repeat(8);
    let logo = PixelBuffer::new(8, 1, &black).unwrap();
    session.builder().init().center().image(&logo).unwrap().line("Table 7").cut();
    let sent = session.buffer().to_vec();

    session.print("Kitchen Printer").await.unwrap();

    assert!(session.buffer().is_empty());
    assert_eq!(
        session.discovery().cached_endpoint().await,
        Some(format!("http://127.0.0.1:{}", port))
    );

    let jobs = driver.jobs.lock().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].0, "Kitchen Printer");
    assert_eq!(jobs[0].1, sent);
}

#[tokio::test]
async fn test_rejected_job_can_be_retried() {
    let (port, driver) = spawn_driver("CDH-Driver").await;
    let mut session = PrintSession::new(&config_for(port)).unwrap();
    session.builder().init().line("retry me").cut();
    let sent = session.buffer().to_vec();

    driver.reject.store(true, Ordering::SeqCst);
    let err = session.print("Bar").await.unwrap_err();
    assert!(matches!(err, ClientError::DeliveryFailed(_)));
    assert_eq!(session.buffer(), sent.as_slice());

    driver.reject.store(false, Ordering::SeqCst);
    session.print("Bar").await.unwrap();
    assert!(session.buffer().is_empty());
    assert_eq!(driver.jobs.lock().unwrap()[0].1, sent);
}

#[tokio::test]
async fn test_foreign_service_is_not_used() {
    let (port, driver) = spawn_driver("Some-Other-Service").await;
    let mut session = PrintSession::new(&config_for(port)).unwrap();
    session.builder().line("nope");

    assert!(!session.discovery().locate().await);
    assert!(matches!(
        session.print("Kitchen").await,
        Err(ClientError::DriverNotFound)
    ));
    assert!(driver.jobs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_and_filter_printers() {
    let (port, _driver) = spawn_driver("CDH-Driver").await;
    let session = PrintSession::new(&config_for(port)).unwrap();

    let all = session.printers().await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].vid, None);

    let bar = session.find_printers(0x0416, Some(0x5012)).await.unwrap();
    assert_eq!(bar.len(), 1);
    assert_eq!(bar[0].name, "Bar");

    assert_eq!(session.find_printers(0x0416, None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_malformed_printer_list() {
    let app = Router::new()
        .route(
            "/health",
            get(|| async { Json(HealthReport { service: "CDH-Driver".to_string(), version: None }) }),
        )
        .route("/printers", get(|| async { "<html>not a list</html>" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let session = PrintSession::new(&config_for(port)).unwrap();
    assert!(matches!(
        session.printers().await,
        Err(ClientError::DeliveryFailed(_))
    ));
}

#[tokio::test]
async fn test_configured_endpoint() {
    let (port, _driver) = spawn_driver("CDH-Driver").await;
    let config = ClientConfig::new().with_discovery(
        DiscoveryConfig::new()
            .with_port_range(1, 0)
            .with_endpoint(format!("http://127.0.0.1:{}/", port))
            .with_health_timeout(Duration::from_millis(500)),
    );
    let session = PrintSession::new(&config).unwrap();

    assert_eq!(
        session.discovery().endpoint().await.unwrap(),
        format!("http://127.0.0.1:{}", port)
    );
}
