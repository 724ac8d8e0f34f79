use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::ViewportTuning;
use crate::error::{ChartError, ChartResult};

pub const BASE_URL_ENV: &str = "FORECAST_BASE_URL";
pub const TIMEOUT_SECS_ENV: &str = "FORECAST_TIMEOUT_SECS";

/// Client bootstrap configuration.
///
/// Serializable so hosts can keep it next to their own settings; every field
/// has a default so partial JSON documents load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_forecast_path")]
    pub forecast_path: String,
    #[serde(default = "default_health_path")]
    pub health_path: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
    #[serde(default = "default_write_timeout_secs")]
    pub write_timeout_secs: u64,
    #[serde(default)]
    pub viewport_tuning: ViewportTuning,
}

impl Default for ForecastClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            forecast_path: default_forecast_path(),
            health_path: default_health_path(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            write_timeout_secs: default_write_timeout_secs(),
            viewport_tuning: ViewportTuning::default(),
        }
    }
}

impl ForecastClientConfig {
    /// Defaults overridden by `FORECAST_BASE_URL` / `FORECAST_TIMEOUT_SECS`.
    ///
    /// An unparsable timeout is logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        if let Ok(raw) = std::env::var(TIMEOUT_SECS_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config = config.with_timeout_secs(secs),
                Err(err) => warn!(
                    value = %raw,
                    error = %err,
                    "ignoring invalid {}",
                    TIMEOUT_SECS_ENV
                ),
            }
        }
        config
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse client config json: {e}"))
        })?;
        config.validate()
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Applies one timeout to the connect, read and write phases.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self.read_timeout_secs = secs;
        self.write_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn with_viewport_tuning(mut self, tuning: ViewportTuning) -> Self {
        self.viewport_tuning = tuning;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ChartError::InvalidData(format!(
                "base url must start with http:// or https://, got `{}`",
                self.base_url
            )));
        }
        for (name, path) in [
            ("forecast_path", &self.forecast_path),
            ("health_path", &self.health_path),
        ] {
            if !path.starts_with('/') {
                return Err(ChartError::InvalidData(format!(
                    "{name} must start with `/`, got `{path}`"
                )));
            }
        }
        if self.connect_timeout_secs == 0
            || self.read_timeout_secs == 0
            || self.write_timeout_secs == 0
        {
            return Err(ChartError::InvalidData(
                "timeouts must be > 0 seconds".to_owned(),
            ));
        }
        self.viewport_tuning.validate()?;
        Ok(self)
    }

    #[must_use]
    pub fn forecast_url(&self) -> String {
        join_url(&self.base_url, &self.forecast_path)
    }

    #[must_use]
    pub fn health_url(&self) -> String {
        join_url(&self.base_url, &self.health_path)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Whole-request budget: the HTTP client has no dedicated write timeout, so
    /// the write phase is bounded by the sum of all three phases.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connect_timeout_secs
                .saturating_add(self.read_timeout_secs)
                .saturating_add(self.write_timeout_secs),
        )
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

fn default_base_url() -> String {
    "http://10.0.2.2:5000".to_owned()
}

fn default_forecast_path() -> String {
    "/predict_trend".to_owned()
}

fn default_health_path() -> String {
    "/health".to_owned()
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_read_timeout_secs() -> u64 {
    30
}

fn default_write_timeout_secs() -> u64 {
    30
}
