use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

pub type ForecastResult<T> = Result<T, ForecastError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Coarse failure class used by the view layer to pick a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    Validation,
    Network,
    Service,
    MalformedResponse,
    Superseded,
}

/// Terminal outcome of a failed forecast submission.
///
/// Every variant ends the current cycle; nothing here is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ForecastError {
    #[error("invalid horizon `{input}`: days must be an integer in 1..=60")]
    InvalidHorizon { input: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("{}", service_message(.status, .message))]
    Service {
        status: u16,
        message: Option<String>,
    },

    #[error("malformed response from forecast service: {0}")]
    MalformedResponse(String),

    #[error("request {request_id} was superseded by a newer submission")]
    Superseded { request_id: u64 },
}

impl ForecastError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidHorizon { .. } => FailureKind::Validation,
            Self::Network(_) => FailureKind::Network,
            Self::Service { .. } => FailureKind::Service,
            Self::MalformedResponse(_) => FailureKind::MalformedResponse,
            Self::Superseded { .. } => FailureKind::Superseded,
        }
    }

    /// Text shown in the result box after a failed cycle.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidHorizon { .. } => "Enter a valid number of days (1-60)".to_owned(),
            Self::Network(message) => format!("Network error: {message}"),
            Self::Service {
                status,
                message: Some(message),
            } => format!("Failed: {status} ({message})"),
            Self::Service {
                status,
                message: None,
            } => format!("Failed: {status}"),
            Self::MalformedResponse(detail) => format!("Error: {detail}"),
            Self::Superseded { .. } => "Superseded by a newer request".to_owned(),
        }
    }
}

fn service_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => format!("forecast service returned status {status}: {message}"),
        None => format!("forecast service returned status {status}"),
    }
}
