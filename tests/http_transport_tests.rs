use forecast_chart::api::{
    ForecastClientConfig, ForecastOrchestrator, ForecastRequestBody, ForecastTransport,
    HttpTransport, RequestState,
};
use forecast_chart::{FailureKind, ForecastError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Serves exactly one canned HTTP response and returns the raw request text.
async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        let _ = socket.shutdown().await;
        request
    });
    (format!("http://{addr}"), handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.expect("read request");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn transport_for(base_url: &str) -> HttpTransport {
    let config = ForecastClientConfig::default()
        .with_base_url(base_url)
        .with_timeout_secs(5)
        .validate()
        .expect("valid config");
    HttpTransport::new(&config).expect("http client")
}

#[tokio::test]
async fn posts_days_as_json_to_forecast_path() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"prediction":[100.5,101.0,99.0],"days_predicted":3,"status":"success"}"#,
    )
    .await;
    let transport = transport_for(&base_url);

    let response = transport
        .post_forecast(ForecastRequestBody { days: 3 })
        .await
        .expect("exchange completes");
    assert_eq!(response.status, 200);

    let request = server.await.expect("server task");
    assert!(request.starts_with("POST /predict_trend HTTP/1.1"));
    assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
    assert!(request.ends_with(r#"{"days":3}"#));
}

#[tokio::test]
async fn end_to_end_success_over_http() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"prediction":[6000,7000,8000],"days_predicted":3,"status":"success"}"#,
    )
    .await;
    let orchestrator = ForecastOrchestrator::new(transport_for(&base_url));

    let chart = orchestrator.submit(3).await.expect("forecast succeeds");
    server.await.expect("server task");

    assert_eq!(chart.series.len(), 3);
    assert!(chart.axis.max_y > 8_000.0);
    assert_eq!(orchestrator.request_state(), RequestState::Success);
}

#[tokio::test]
async fn server_error_body_is_reported_over_http() {
    let (base_url, server) = serve_once(
        "500 Internal Server Error",
        r#"{"error":"model unavailable"}"#,
    )
    .await;
    let orchestrator = ForecastOrchestrator::new(transport_for(&base_url));

    let err = orchestrator.submit(7).await.expect_err("service failure");
    server.await.expect("server task");

    assert_eq!(err.kind(), FailureKind::Service);
    let state = orchestrator.view_state();
    assert_eq!(state.request_state, RequestState::Failed);
    assert!(state.status_text.contains("model unavailable"));
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let orchestrator = ForecastOrchestrator::new(transport_for(&format!("http://{addr}")));
    let err = orchestrator.submit(7).await.expect_err("nothing listens");

    assert!(matches!(err, ForecastError::Network(_)));
    assert!(orchestrator.view_state().status_text.starts_with("Network error:"));
}

#[tokio::test]
async fn health_probe_reads_model_flags() {
    let (base_url, server) = serve_once(
        "200 OK",
        concat!(
            r#"{"status":"healthy","trend_model_loaded":true,"#,
            r#""scaler_loaded":false,"image_model_loaded":true}"#
        ),
    )
    .await;
    let transport = transport_for(&base_url);

    let health = transport.health().await.expect("health payload");
    let request = server.await.expect("server task");

    assert!(request.starts_with("GET /health HTTP/1.1"));
    assert_eq!(health.status, "healthy");
    assert!(health.trend_model_loaded);
    assert!(!health.is_ready());
}
