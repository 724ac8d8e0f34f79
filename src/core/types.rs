use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};

/// Pixel size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One predicted value at a zero-based day offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub index: u32,
    pub value: f64,
}

impl Point {
    #[must_use]
    pub fn new(index: u32, value: f64) -> Self {
        Self { index, value }
    }

    #[must_use]
    pub fn x(self) -> f64 {
        f64::from(self.index)
    }
}

/// Validated number of future days to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct HorizonRequest {
    days: u32,
}

impl HorizonRequest {
    pub const MIN_DAYS: u32 = 1;
    pub const MAX_DAYS: u32 = 60;

    pub fn new(days: i64) -> ForecastResult<Self> {
        match u32::try_from(days) {
            Ok(days) if (Self::MIN_DAYS..=Self::MAX_DAYS).contains(&days) => Ok(Self { days }),
            _ => Err(ForecastError::InvalidHorizon {
                input: days.to_string(),
            }),
        }
    }

    /// Parses raw input text the way a numeric text field delivers it.
    pub fn parse(input: &str) -> ForecastResult<Self> {
        let trimmed = input.trim();
        let days = trimmed
            .parse::<i64>()
            .map_err(|_| ForecastError::InvalidHorizon {
                input: trimmed.to_owned(),
            })?;
        Self::new(days)
    }

    #[must_use]
    pub fn days(self) -> u32 {
        self.days
    }
}

impl TryFrom<i64> for HorizonRequest {
    type Error = ForecastError;

    fn try_from(days: i64) -> ForecastResult<Self> {
        Self::new(days)
    }
}

impl From<HorizonRequest> for u32 {
    fn from(request: HorizonRequest) -> Self {
        request.days
    }
}
