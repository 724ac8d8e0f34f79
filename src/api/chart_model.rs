use serde::{Deserialize, Serialize};

use crate::core::viewport::fit_validated;
use crate::core::{
    AxisSpec, HorizonRequest, Series, TrendLine, ViewportSpec, ViewportTuning, VisibleWindow,
    fit_linear_trend,
};
use crate::error::{ChartError, ChartResult};

use super::ForecastResponseBody;

pub const CHART_MODEL_JSON_SCHEMA_V1: u32 = 1;

/// Everything the view layer needs to draw one forecast.
///
/// Produced once per successful request and replaced wholesale by the next
/// one; nothing in here is mutated after assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartModel {
    pub horizon: u32,
    pub series: Series,
    pub trend: TrendLine,
    pub axis: AxisSpec,
    pub viewport: ViewportSpec,
    pub service_status: String,
    pub status_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartModelJsonContractV1 {
    pub schema_version: u32,
    pub chart: ChartModel,
}

impl ChartModel {
    /// Runs series transform, trend fit and viewport scaling over a decoded payload.
    pub fn from_response(
        horizon: HorizonRequest,
        response: &ForecastResponseBody,
        tuning: ViewportTuning,
    ) -> ChartResult<Self> {
        let tuning = tuning.validate()?;
        Ok(Self::assemble(horizon, response, tuning))
    }

    pub(crate) fn assemble(
        horizon: HorizonRequest,
        response: &ForecastResponseBody,
        tuning: ViewportTuning,
    ) -> Self {
        let series = Series::from_predictions(&response.prediction);
        let trend = fit_linear_trend(&series);
        let (axis, viewport) = fit_validated(&series, tuning);
        Self {
            horizon: horizon.days(),
            status_text: success_status_text(horizon.days(), &response.status),
            service_status: response.status.clone(),
            series,
            trend,
            axis,
            viewport,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Default pan/zoom window for this chart.
    #[must_use]
    pub fn visible_window(&self) -> VisibleWindow {
        VisibleWindow::from_spec(self.axis, self.viewport)
    }

    /// Checks the structural invariants of a model loaded from outside.
    pub fn validate(&self) -> ChartResult<()> {
        if self.series.points().len() != self.series.labels().len() {
            return Err(ChartError::InvalidData(
                "series points and labels must have equal length".to_owned(),
            ));
        }
        if !self.trend.is_empty() && self.trend.len() != self.series.len() {
            return Err(ChartError::InvalidData(
                "trend line must be empty or match the series length".to_owned(),
            ));
        }
        if !self.axis.max_y.is_finite() || self.axis.max_y <= self.axis.min_y {
            return Err(ChartError::InvalidData(
                "value axis must be finite with max > min".to_owned(),
            ));
        }
        if self.viewport.visible_range_min > self.viewport.visible_range_max {
            return Err(ChartError::InvalidData(
                "visible range min must not exceed visible range max".to_owned(),
            ));
        }
        Ok(())
    }

    /// Serializes the model wrapped in the v1 contract.
    ///
    /// JSON has no NaN or infinity, so a model whose series or trend holds a
    /// non-finite value is rejected instead of being written as `null`.
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let non_finite = self
            .series
            .points()
            .iter()
            .chain(self.trend.points())
            .find(|point| !point.value.is_finite());
        if let Some(point) = non_finite {
            return Err(ChartError::InvalidData(format!(
                "chart model holds non-finite value {} at day index {}",
                point.value, point.index
            )));
        }

        let payload = ChartModelJsonContractV1 {
            schema_version: CHART_MODEL_JSON_SCHEMA_V1,
            chart: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize chart model contract v1: {e}"))
        })
    }

    /// Accepts either a bare model or the versioned wrapper.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(chart) = serde_json::from_str::<ChartModel>(input) {
            chart.validate()?;
            return Ok(chart);
        }
        let payload: ChartModelJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse chart model json payload: {e}"))
        })?;
        if payload.schema_version != CHART_MODEL_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported chart model schema version: {}",
                payload.schema_version
            )));
        }
        payload.chart.validate()?;
        Ok(payload.chart)
    }
}

#[must_use]
pub fn success_status_text(days: u32, service_status: &str) -> String {
    format!("Prediction succeeded!\nHorizon: {days} days\nStatus: {service_status}")
}
