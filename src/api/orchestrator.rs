use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::core::{HorizonRequest, ViewportTuning};
use crate::error::{ChartResult, ForecastError, ForecastResult};

use super::{ChartModel, ForecastTransport, decode_forecast_response};

pub const LOADING_STATUS_TEXT: &str = "Processing prediction...";

/// Lifecycle of the most recent submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

/// Snapshot the view layer renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub request_state: RequestState,
    pub inputs_enabled: bool,
    pub loading_indicator: bool,
    pub status_text: String,
    pub chart: Option<ChartModel>,
    pub last_error: Option<ForecastError>,
    /// Id of the submission whose result is still awaited, if any.
    pub active_request: Option<u64>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            request_state: RequestState::Idle,
            inputs_enabled: true,
            loading_indicator: false,
            status_text: String::new(),
            chart: None,
            last_error: None,
            active_request: None,
        }
    }
}

/// Drives submit -> request -> classify -> chart assembly and owns the view state.
///
/// Overlapping submissions are allowed. Each one gets a monotonically
/// increasing id and only the latest id may commit its outcome; anything that
/// arrives for an older id is dropped.
pub struct ForecastOrchestrator<T: ForecastTransport> {
    transport: T,
    tuning: ViewportTuning,
    next_request_id: AtomicU64,
    state: watch::Sender<ViewState>,
}

impl<T: ForecastTransport> ForecastOrchestrator<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            tuning: ViewportTuning::default(),
            next_request_id: AtomicU64::new(0),
            state: watch::Sender::new(ViewState::default()),
        }
    }

    pub fn with_tuning(transport: T, tuning: ViewportTuning) -> ChartResult<Self> {
        let tuning = tuning.validate()?;
        let mut orchestrator = Self::new(transport);
        orchestrator.tuning = tuning;
        Ok(orchestrator)
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn view_state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn request_state(&self) -> RequestState {
        self.state.borrow().request_state
    }

    /// Submits raw horizon text as typed by the user.
    pub async fn submit_text(&self, input: &str) -> ForecastResult<ChartModel> {
        let horizon = HorizonRequest::parse(input).inspect_err(|err| {
            debug!(error = %err, "rejected horizon text before submission");
        })?;
        self.run(horizon).await
    }

    /// Requests a forecast for `days` and commits the outcome to the view state.
    ///
    /// Out-of-range values fail with [`ForecastError::InvalidHorizon`] without
    /// touching the state or the network. A result that lost to a newer
    /// submission is returned as [`ForecastError::Superseded`] and not applied.
    pub async fn submit(&self, days: i64) -> ForecastResult<ChartModel> {
        let horizon = HorizonRequest::new(days).inspect_err(|err| {
            debug!(error = %err, "rejected horizon before submission");
        })?;
        self.run(horizon).await
    }

    async fn run(&self, horizon: HorizonRequest) -> ForecastResult<ChartModel> {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.begin(request_id, horizon);
        let pending = PendingRequest {
            state: &self.state,
            request_id,
            settled: false,
        };
        let outcome = self.fetch(horizon).await;
        pending.settle();
        self.commit(request_id, outcome)
    }

    fn begin(&self, request_id: u64, horizon: HorizonRequest) {
        debug!(request_id, days = horizon.days(), "forecast request started");
        self.state.send_modify(|state| {
            state.request_state = RequestState::Loading;
            state.inputs_enabled = false;
            state.loading_indicator = true;
            state.status_text = LOADING_STATUS_TEXT.to_owned();
            state.chart = None;
            state.last_error = None;
            state.active_request = Some(request_id);
        });
    }

    async fn fetch(&self, horizon: HorizonRequest) -> ForecastResult<ChartModel> {
        let response = self.transport.post_forecast(horizon.into()).await?;
        let body = decode_forecast_response(&response)?;

        if let Some(days_predicted) = body.days_predicted {
            if days_predicted as usize != body.prediction.len() {
                warn!(
                    days_predicted,
                    points = body.prediction.len(),
                    "days_predicted disagrees with prediction length"
                );
            }
        }
        if body.prediction.len() != horizon.days() as usize {
            warn!(
                requested = horizon.days(),
                points = body.prediction.len(),
                "prediction length differs from requested horizon"
            );
        }

        Ok(ChartModel::assemble(horizon, &body, self.tuning))
    }

    fn commit(
        &self,
        request_id: u64,
        outcome: ForecastResult<ChartModel>,
    ) -> ForecastResult<ChartModel> {
        let applied = self.state.send_if_modified(|state| {
            if state.active_request != Some(request_id) {
                return false;
            }

            state.active_request = None;
            state.inputs_enabled = true;
            state.loading_indicator = false;
            match &outcome {
                Ok(chart) => {
                    state.request_state = RequestState::Success;
                    state.status_text = chart.status_text.clone();
                    state.chart = Some(chart.clone());
                    state.last_error = None;
                }
                Err(err) => {
                    state.request_state = RequestState::Failed;
                    state.status_text = err.user_message();
                    state.last_error = Some(err.clone());
                }
            }
            true
        });

        if !applied {
            debug!(request_id, "dropping result of superseded forecast request");
            return Err(ForecastError::Superseded { request_id });
        }

        match &outcome {
            Ok(chart) => info!(
                request_id,
                points = chart.series.len(),
                status = %chart.service_status,
                "forecast request succeeded"
            ),
            Err(err) => warn!(
                request_id,
                kind = ?err.kind(),
                error = %err,
                "forecast request failed"
            ),
        }
        outcome
    }
}

/// Returns the view to `Idle` if a submission is dropped before it commits.
///
/// A newer submission that already took over the view is left untouched.
struct PendingRequest<'a> {
    state: &'a watch::Sender<ViewState>,
    request_id: u64,
    settled: bool,
}

impl PendingRequest<'_> {
    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for PendingRequest<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let request_id = self.request_id;
        let released = self.state.send_if_modified(|state| {
            if state.active_request != Some(request_id) {
                return false;
            }

            state.active_request = None;
            state.request_state = RequestState::Idle;
            state.inputs_enabled = true;
            state.loading_indicator = false;
            state.status_text.clear();
            true
        });
        if released {
            debug!(request_id, "forecast request abandoned before completion");
        }
    }
}
