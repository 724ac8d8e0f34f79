//! forecast-chart: request a multi-day forecast and turn it into a chart model.
//!
//! The pipeline is split the same way at every level: `core` holds the pure
//! math (series transform, least-squares trend, axis and viewport fitting),
//! `api` owns the request lifecycle and wire format, and `render` turns a
//! finished [`api::ChartModel`] into backend-agnostic draw commands.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{ChartModel, ForecastOrchestrator, HttpTransport, RequestState, ViewState};
pub use error::{ChartError, ChartResult, FailureKind, ForecastError, ForecastResult};
