//! JSON bodies exchanged with the forecast service.

use serde::{Deserialize, Serialize};

use crate::core::HorizonRequest;
use crate::error::{ForecastError, ForecastResult};

use super::TransportResponse;

/// Outbound `POST` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequestBody {
    pub days: u32,
}

impl From<HorizonRequest> for ForecastRequestBody {
    fn from(request: HorizonRequest) -> Self {
        Self {
            days: request.days(),
        }
    }
}

/// Success payload. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponseBody {
    pub prediction: Vec<f64>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_predicted: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Payload of the service health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub trend_model_loaded: bool,
    #[serde(default)]
    pub scaler_loaded: bool,
}

impl ServiceHealth {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.trend_model_loaded && self.scaler_loaded
    }
}

/// Classifies a completed HTTP exchange into a payload or a failure.
pub fn decode_forecast_response(
    response: &TransportResponse,
) -> ForecastResult<ForecastResponseBody> {
    if !response.is_success() {
        return Err(ForecastError::Service {
            status: response.status,
            message: extract_error_message(&response.body),
        });
    }

    serde_json::from_str::<ForecastResponseBody>(&response.body)
        .map_err(|e| ForecastError::MalformedResponse(format!("invalid forecast payload: {e}")))
}

pub fn decode_health_response(response: &TransportResponse) -> ForecastResult<ServiceHealth> {
    if !response.is_success() {
        return Err(ForecastError::Service {
            status: response.status,
            message: extract_error_message(&response.body),
        });
    }

    serde_json::from_str::<ServiceHealth>(&response.body)
        .map_err(|e| ForecastError::MalformedResponse(format!("invalid health payload: {e}")))
}

/// Returns the `error` string of an error body, if the body is JSON and has one.
#[must_use]
pub fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|payload| payload.error)
        .filter(|message| !message.trim().is_empty())
}
