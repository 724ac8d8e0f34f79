#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use forecast_chart::ForecastError;
use forecast_chart::api::{ForecastRequestBody, ForecastTransport, TransportResponse};
use forecast_chart::error::ForecastResult;
use tokio::sync::oneshot;

pub fn json_response(status: u16, body: &str) -> ForecastResult<TransportResponse> {
    Ok(TransportResponse {
        status,
        body: body.to_owned(),
    })
}

pub fn prediction_body(values: &[f64], status: &str) -> String {
    serde_json::json!({
        "prediction": values,
        "days_predicted": values.len(),
        "status": status,
    })
    .to_string()
}

/// Replays canned outcomes in order and records every request it receives.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<ForecastResult<TransportResponse>>>,
    calls: Mutex<Vec<u32>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<ForecastResult<TransportResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl ForecastTransport for ScriptedTransport {
    async fn post_forecast(&self, body: ForecastRequestBody) -> ForecastResult<TransportResponse> {
        self.calls.lock().expect("calls lock").push(body.days);
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Err(ForecastError::Network("no scripted response".to_owned())))
    }
}

/// Holds each request open until the test releases the response for its horizon.
#[derive(Default)]
pub struct GatedTransport {
    gates: Mutex<HashMap<u32, oneshot::Receiver<ForecastResult<TransportResponse>>>>,
    calls: Mutex<Vec<u32>>,
}

impl GatedTransport {
    /// Registers a gate for `days` and returns the sender that releases it.
    pub fn gate(&self, days: u32) -> oneshot::Sender<ForecastResult<TransportResponse>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().expect("gates lock").insert(days, rx);
        tx
    }

    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl ForecastTransport for GatedTransport {
    async fn post_forecast(&self, body: ForecastRequestBody) -> ForecastResult<TransportResponse> {
        self.calls.lock().expect("calls lock").push(body.days);
        let gate = self.gates.lock().expect("gates lock").remove(&body.days);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ForecastError::Network("gate dropped".to_owned()))),
            None => Err(ForecastError::Network(format!(
                "no gate registered for {} days",
                body.days
            ))),
        }
    }
}
