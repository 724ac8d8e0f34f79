use serde::{Deserialize, Serialize};

use crate::core::Point;

/// Predicted points with one display label per point.
///
/// `points` and `labels` always have the same length. An empty series is a
/// valid "nothing to plot" state, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    points: Vec<Point>,
    labels: Vec<String>,
}

impl Series {
    /// Builds a series from raw predictions, one point per value in input order.
    ///
    /// Values are taken as-is: NaN and infinities are not filtered here.
    #[must_use]
    pub fn from_predictions(values: &[f64]) -> Self {
        let mut points = Vec::with_capacity(values.len());
        let mut labels = Vec::with_capacity(values.len());
        for (index, value) in (0u32..).zip(values.iter().copied()) {
            points.push(Point::new(index, value));
            labels.push(day_label(index));
        }
        Self { points, labels }
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest and largest finite values, or `None` when no value is finite.
    #[must_use]
    pub fn finite_value_range(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .map(|point| point.value)
            .filter(|value| value.is_finite())
            .fold(None, |range, value| match range {
                None => Some((value, value)),
                Some((min, max)) => Some((min.min(value), max.max(value))),
            })
    }
}

/// Label for a zero-based day offset (`0` -> `"Day 1"`).
#[must_use]
pub fn day_label(index: u32) -> String {
    format!("Day {}", u64::from(index) + 1)
}
