use async_trait::async_trait;
use tracing::{debug, trace};

use crate::error::{ForecastError, ForecastResult};

use super::{ForecastClientConfig, ForecastRequestBody, ServiceHealth, decode_health_response};

/// Completed HTTP exchange: status code plus the raw body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability that performs the single outbound forecast call.
///
/// Implementations report connectivity, timeout and IO problems as
/// [`ForecastError::Network`] and hand every completed exchange back as a
/// [`TransportResponse`], whatever its status. Classification happens upstream.
#[async_trait]
pub trait ForecastTransport: Send + Sync {
    async fn post_forecast(&self, body: ForecastRequestBody) -> ForecastResult<TransportResponse>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    forecast_url: String,
    health_url: String,
}

impl HttpTransport {
    pub fn new(config: &ForecastClientConfig) -> ForecastResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ForecastError::Network(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            forecast_url: config.forecast_url(),
            health_url: config.health_url(),
        })
    }

    #[must_use]
    pub fn forecast_url(&self) -> &str {
        &self.forecast_url
    }

    /// Queries the service health endpoint.
    pub async fn health(&self) -> ForecastResult<ServiceHealth> {
        debug!(url = %self.health_url, "probing forecast service health");
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(network_error)?;
        let response = read_response(response).await?;
        decode_health_response(&response)
    }
}

#[async_trait]
impl ForecastTransport for HttpTransport {
    async fn post_forecast(&self, body: ForecastRequestBody) -> ForecastResult<TransportResponse> {
        trace!(url = %self.forecast_url, days = body.days, "sending forecast request");
        let response = self
            .client
            .post(&self.forecast_url)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;
        read_response(response).await
    }
}

async fn read_response(response: reqwest::Response) -> ForecastResult<TransportResponse> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(network_error)?;
    trace!(status, body_len = body.len(), "received forecast service response");
    Ok(TransportResponse { status, body })
}

fn network_error(err: reqwest::Error) -> ForecastError {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    ForecastError::Network(format!("{kind}: {err}"))
}
