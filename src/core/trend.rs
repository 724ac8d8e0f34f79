use serde::{Deserialize, Serialize};

use crate::core::{Point, Series};

/// Relative slope (slope / mean) beyond which a trend counts as rising or falling.
pub const TREND_DIRECTION_THRESHOLD: f64 = 0.05;

/// Ordinary least-squares coefficients of `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    #[must_use]
    pub fn value_at(self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Rising,
    Falling,
    Flat,
}

/// Fitted line sampled at every x of the source series.
///
/// Empty (and without a fit) when the source has fewer than two points or the
/// fit is degenerate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    points: Vec<Point>,
    fit: Option<LinearFit>,
}

impl TrendLine {
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn fit(&self) -> Option<LinearFit> {
        self.fit
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Classifies the slope relative to the mean fitted value.
    ///
    /// Returns `None` when there is no fit. A zero or non-finite mean reads
    /// as flat.
    #[must_use]
    pub fn direction(&self) -> Option<TrendDirection> {
        let fit = self.fit?;
        let n = self.points.len() as f64;
        let mean = self.points.iter().map(|point| point.value).sum::<f64>() / n;
        if !mean.is_finite() || mean.abs() < f64::EPSILON {
            return Some(TrendDirection::Flat);
        }

        let relative_slope = fit.slope / mean.abs();
        Some(if relative_slope > TREND_DIRECTION_THRESHOLD {
            TrendDirection::Rising
        } else if relative_slope < -TREND_DIRECTION_THRESHOLD {
            TrendDirection::Falling
        } else {
            TrendDirection::Flat
        })
    }
}

/// Fits a least-squares line over `(index, value)` pairs in one pass.
#[must_use]
pub fn fit_linear_trend(series: &Series) -> TrendLine {
    let points = series.points();
    let Some(fit) = least_squares(points) else {
        return TrendLine::default();
    };

    TrendLine {
        points: points
            .iter()
            .map(|point| Point::new(point.index, fit.value_at(point.x())))
            .collect(),
        fit: Some(fit),
    }
}

fn least_squares(points: &[Point]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    for point in points {
        let x = point.x();
        let y = point.value;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    // Dense 0..n-1 indices never produce a zero denominator.
    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some(LinearFit { slope, intercept })
}
