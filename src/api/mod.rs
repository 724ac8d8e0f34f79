//! Request orchestration, wire contract and transport of the forecast client.

mod chart_model;
mod config;
mod orchestrator;
mod transport;
mod wire;

pub use chart_model::{
    CHART_MODEL_JSON_SCHEMA_V1, ChartModel, ChartModelJsonContractV1, success_status_text,
};
pub use config::{BASE_URL_ENV, ForecastClientConfig, TIMEOUT_SECS_ENV};
pub use orchestrator::{
    ForecastOrchestrator, LOADING_STATUS_TEXT, RequestState, ViewState,
};
pub use transport::{ForecastTransport, HttpTransport, TransportResponse};
pub use wire::{
    ForecastRequestBody, ForecastResponseBody, ServiceHealth, decode_forecast_response,
    decode_health_response, extract_error_message,
};
