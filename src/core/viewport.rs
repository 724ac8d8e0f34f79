use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::core::Series;
use crate::error::{ChartError, ChartResult};

/// Tuning constants for axis and viewport fitting.
///
/// The defaults are product-level values: a value axis that never shows less
/// than `0..5000`, ten x labels, a 15-day default window and a 60-day pan cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTuning {
    pub value_axis_floor: f64,
    pub padding_ratio: f64,
    pub flat_padding: f64,
    pub label_count_y: u32,
    pub max_label_count_x: u32,
    pub default_visible_points: u32,
    pub min_visible_points: u32,
    pub max_pannable_width: u32,
}

impl Default for ViewportTuning {
    fn default() -> Self {
        Self {
            value_axis_floor: 5_000.0,
            padding_ratio: 0.10,
            flat_padding: 1.0,
            label_count_y: 6,
            max_label_count_x: 10,
            default_visible_points: 15,
            min_visible_points: 5,
            max_pannable_width: 60,
        }
    }
}

impl ViewportTuning {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.value_axis_floor.is_finite() || self.value_axis_floor <= 0.0 {
            return Err(ChartError::InvalidData(
                "value axis floor must be finite and > 0".to_owned(),
            ));
        }

        if !self.padding_ratio.is_finite()
            || !self.flat_padding.is_finite()
            || self.padding_ratio < 0.0
            || self.flat_padding < 0.0
        {
            return Err(ChartError::InvalidData(
                "axis padding must be finite and >= 0".to_owned(),
            ));
        }

        if self.label_count_y < 2 || self.max_label_count_x == 0 {
            return Err(ChartError::InvalidData(
                "label counts must be >= 2 on the value axis and >= 1 on the day axis".to_owned(),
            ));
        }

        if self.default_visible_points == 0
            || self.min_visible_points == 0
            || self.max_pannable_width == 0
        {
            return Err(ChartError::InvalidData(
                "visible window sizes must be > 0".to_owned(),
            ));
        }

        Ok(self)
    }
}

/// Axis bounds and label density for one rendered series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub min_y: f64,
    pub max_y: f64,
    pub min_x: f64,
    pub max_x: f64,
    pub label_count_y: u32,
    pub label_count_x: u32,
    pub granularity_x: f64,
}

/// Horizontal window limits for a long series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSpec {
    pub visible_range_max: f64,
    pub visible_range_min: f64,
    pub initial_offset: f64,
    pub max_pannable_width: f64,
}

/// Fits axes and the default window using [`ViewportTuning::default`].
#[must_use]
pub fn scale_series(series: &Series) -> (AxisSpec, ViewportSpec) {
    fit_validated(series, ViewportTuning::default())
}

/// Fits axes and the default window with explicit tuning.
pub fn scale_series_tuned(
    series: &Series,
    tuning: ViewportTuning,
) -> ChartResult<(AxisSpec, ViewportSpec)> {
    let tuning = tuning.validate()?;
    Ok(fit_validated(series, tuning))
}

pub(crate) fn fit_validated(
    series: &Series,
    tuning: ViewportTuning,
) -> (AxisSpec, ViewportSpec) {
    let n = u32::try_from(series.len()).unwrap_or(u32::MAX);

    // Non-finite values never move the axis; an all-NaN series gets the floor.
    let computed_max = series
        .finite_value_range()
        .map(|(min_observed, raw_max)| {
            let range = raw_max - min_observed;
            let padding = if range > 0.0 {
                range * tuning.padding_ratio
            } else {
                tuning.flat_padding
            };
            raw_max + padding
        })
        .unwrap_or(tuning.value_axis_floor);

    let axis = AxisSpec {
        min_y: 0.0,
        max_y: computed_max.max(tuning.value_axis_floor),
        min_x: 0.0,
        max_x: f64::from(n.saturating_sub(1)),
        label_count_y: tuning.label_count_y,
        label_count_x: n.min(tuning.max_label_count_x),
        granularity_x: 1.0,
    };

    let visible_range_max = n
        .min(tuning.default_visible_points)
        .min(tuning.max_pannable_width);
    let viewport = ViewportSpec {
        visible_range_max: f64::from(visible_range_max),
        visible_range_min: f64::from(tuning.min_visible_points.min(visible_range_max)),
        initial_offset: 0.0,
        max_pannable_width: f64::from(tuning.max_pannable_width),
    };

    (axis, viewport)
}

/// Current pan/zoom position over the day axis.
///
/// The window always stays inside the data extent and its width inside the
/// `[visible_range_min, visible_range_max]` band of the `ViewportSpec` it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleWindow {
    start: f64,
    width: f64,
    extent_start: f64,
    extent_end: f64,
    min_width: f64,
    max_width: f64,
}

impl VisibleWindow {
    #[must_use]
    pub fn from_spec(axis: AxisSpec, viewport: ViewportSpec) -> Self {
        let max_width = viewport
            .visible_range_max
            .min(viewport.max_pannable_width)
            .max(0.0);
        let min_width = viewport.visible_range_min.clamp(0.0, max_width);
        let mut window = Self {
            start: viewport.initial_offset,
            width: max_width,
            extent_start: axis.min_x,
            extent_end: axis.max_x.max(axis.min_x),
            min_width,
            max_width,
        };
        window.clamp_start();
        window
    }

    #[must_use]
    pub fn start(self) -> f64 {
        self.start
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn end(self) -> f64 {
        self.start + self.width
    }

    /// Inclusive x range currently on screen.
    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.start, self.end())
    }

    /// Indices of the points of an `n`-point series that fall inside the window.
    #[must_use]
    pub fn visible_indices(self, n: usize) -> Range<usize> {
        if n == 0 {
            return 0..0;
        }
        let first = self.start.ceil().max(0.0) as usize;
        let last = self.end().floor().max(0.0) as usize;
        first.min(n)..last.saturating_add(1).min(n)
    }

    /// Shifts the window by `delta` days, stopping at the data edges.
    pub fn pan_by(&mut self, delta: f64) -> ChartResult<()> {
        if !delta.is_finite() {
            return Err(ChartError::InvalidData(
                "pan delta must be finite".to_owned(),
            ));
        }

        self.start += delta;
        self.clamp_start();
        Ok(())
    }

    /// Zooms around `anchor`.
    ///
    /// `factor > 1.0` zooms in, `0.0 < factor < 1.0` zooms out.
    pub fn zoom_by(&mut self, factor: f64, anchor: f64) -> ChartResult<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ChartError::InvalidData(
                "zoom factor must be finite and > 0".to_owned(),
            ));
        }
        if !anchor.is_finite() {
            return Err(ChartError::InvalidData(
                "zoom anchor must be finite".to_owned(),
            ));
        }
        if self.width <= 0.0 {
            return Ok(());
        }

        let target_width = (self.width / factor).clamp(self.min_width, self.max_width);
        let anchor_ratio = ((anchor - self.start) / self.width).clamp(0.0, 1.0);
        self.start = anchor - anchor_ratio * target_width;
        self.width = target_width;
        self.clamp_start();
        Ok(())
    }

    /// Restores the default left-aligned, widest window.
    pub fn reset(&mut self) {
        self.start = self.extent_start;
        self.width = self.max_width;
        self.clamp_start();
    }

    fn clamp_start(&mut self) {
        let max_start = (self.extent_end - self.width).max(self.extent_start);
        self.start = self.start.clamp(self.extent_start, max_start);
    }
}
