use crate::api::ChartModel;
use crate::core::{AxisSpec, LinearScale, Point, Viewport, VisibleWindow};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, LinePrimitive, LineStrokeStyle, MarkerPrimitive, RenderFrame, TextHAlign,
    TextPrimitive,
};

/// Visual constants for the forecast chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrameStyle {
    pub prediction_color: Color,
    pub prediction_width: f64,
    pub marker_radius_px: f64,
    pub trend_color: Color,
    pub trend_width: f64,
    pub trend_stroke: LineStrokeStyle,
    pub grid_color: Color,
    pub grid_width: f64,
    pub label_color: Color,
    pub font_size_px: f64,
    pub padding_px: f64,
    pub value_gutter_px: f64,
    pub day_gutter_px: f64,
}

impl Default for ChartFrameStyle {
    fn default() -> Self {
        Self {
            prediction_color: Color::from_rgb8(0x1E, 0x90, 0xFF),
            prediction_width: 2.5,
            marker_radius_px: 4.0,
            trend_color: Color::rgb(1.0, 0.0, 0.0),
            trend_width: 2.0,
            trend_stroke: LineStrokeStyle::Dashed {
                dash_px: 10.0,
                gap_px: 5.0,
            },
            grid_color: Color::rgb(0.87, 0.87, 0.87),
            grid_width: 1.0,
            label_color: Color::from_rgb8(0x44, 0x44, 0x44),
            font_size_px: 11.0,
            padding_px: 12.0,
            value_gutter_px: 44.0,
            day_gutter_px: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl PlotArea {
    fn resolve(viewport: Viewport, style: &ChartFrameStyle) -> ChartResult<Self> {
        let area = Self {
            left: style.padding_px + style.value_gutter_px,
            top: style.padding_px,
            right: f64::from(viewport.width) - style.padding_px,
            bottom: f64::from(viewport.height) - style.padding_px - style.day_gutter_px,
        };
        if !(area.width() > 0.0 && area.height() > 0.0) {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Ok(area)
    }

    fn width(self) -> f64 {
        self.right - self.left
    }

    fn height(self) -> f64 {
        self.bottom - self.top
    }
}

struct Projector {
    area: PlotArea,
    x_scale: LinearScale,
    y_scale: LinearScale,
}

impl Projector {
    fn project(&self, x: f64, y: f64) -> ChartResult<(f64, f64)> {
        let px = self.area.left + self.x_scale.domain_to_pixel(x, self.area.width())?;
        let py = self.area.bottom - self.y_scale.domain_to_pixel(y, self.area.height())?;
        Ok((px, py))
    }
}

/// Builds the draw commands for `chart` as seen through `window`.
///
/// Segments are clipped to the window on the day axis; segments touching a
/// non-finite value are skipped instead of failing the frame. An empty chart
/// yields an empty frame.
pub fn build_chart_frame(
    chart: &ChartModel,
    window: VisibleWindow,
    viewport: Viewport,
    style: &ChartFrameStyle,
) -> ChartResult<RenderFrame> {
    if !viewport.is_valid() {
        return Err(ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }

    let area = PlotArea::resolve(viewport, style)?;
    let mut frame = RenderFrame::new(viewport);
    if chart.is_empty() {
        return Ok(frame);
    }

    let (start, end) = window_domain(window);
    let projector = Projector {
        area,
        x_scale: LinearScale::new(start, end)?,
        y_scale: LinearScale::new(chart.axis.min_y, chart.axis.max_y)?,
    };

    push_value_grid(&mut frame, chart.axis, &projector, style)?;
    push_day_labels(&mut frame, chart, window, &projector, style)?;
    push_polyline(
        &mut frame,
        chart.trend.points(),
        (start, end),
        &projector,
        LinePrimitive::new(0.0, 0.0, 0.0, 0.0, style.trend_width, style.trend_color)
            .with_stroke_style(style.trend_stroke),
    )?;
    push_polyline(
        &mut frame,
        chart.series.points(),
        (start, end),
        &projector,
        LinePrimitive::new(
            0.0,
            0.0,
            0.0,
            0.0,
            style.prediction_width,
            style.prediction_color,
        ),
    )?;

    for point in &chart.series.points()[window.visible_indices(chart.series.len())] {
        if !point.value.is_finite() {
            continue;
        }
        let (x, y) = projector.project(point.x(), point.value)?;
        frame.markers.push(MarkerPrimitive::new(
            x,
            y,
            style.marker_radius_px,
            style.prediction_color,
        ));
    }

    Ok(frame)
}

fn window_domain(window: VisibleWindow) -> (f64, f64) {
    if window.width() > 0.0 {
        window.range()
    } else {
        (window.start() - 0.5, window.start() + 0.5)
    }
}

fn push_value_grid(
    frame: &mut RenderFrame,
    axis: AxisSpec,
    projector: &Projector,
    style: &ChartFrameStyle,
) -> ChartResult<()> {
    let steps = axis.label_count_y.max(2) - 1;
    let area = projector.area;
    for step in 0..=steps {
        let value = axis.min_y + (axis.max_y - axis.min_y) * f64::from(step) / f64::from(steps);
        let y = area.bottom - projector.y_scale.domain_to_pixel(value, area.height())?;
        frame.lines.push(LinePrimitive::new(
            area.left,
            y,
            area.right,
            y,
            style.grid_width,
            style.grid_color,
        ));
        frame.texts.push(TextPrimitive::new(
            format!("{value:.0}"),
            area.left - 4.0,
            y,
            style.font_size_px,
            style.label_color,
            TextHAlign::Right,
        ));
    }
    Ok(())
}

fn push_day_labels(
    frame: &mut RenderFrame,
    chart: &ChartModel,
    window: VisibleWindow,
    projector: &Projector,
    style: &ChartFrameStyle,
) -> ChartResult<()> {
    let visible = window.visible_indices(chart.series.len());
    let max_labels = chart.axis.label_count_x.max(1) as usize;
    let step = visible.len().div_ceil(max_labels).max(1);
    let baseline = projector.area.bottom + style.day_gutter_px * 0.75;

    for index in visible.step_by(step) {
        let Some(label) = chart.series.label(index) else {
            continue;
        };
        let x = projector.area.left
            + projector
                .x_scale
                .domain_to_pixel(index as f64, projector.area.width())?;
        frame.texts.push(TextPrimitive::new(
            label,
            x,
            baseline,
            style.font_size_px,
            style.label_color,
            TextHAlign::Center,
        ));
    }
    Ok(())
}

fn push_polyline(
    frame: &mut RenderFrame,
    points: &[Point],
    (start, end): (f64, f64),
    projector: &Projector,
    template: LinePrimitive,
) -> ChartResult<()> {
    for pair in points.windows(2) {
        let a = (pair[0].x(), pair[0].value);
        let b = (pair[1].x(), pair[1].value);
        if !(a.1.is_finite() && b.1.is_finite()) {
            continue;
        }
        let Some((a, b)) = clip_segment(a, b, start, end) else {
            continue;
        };
        let (x1, y1) = projector.project(a.0, a.1)?;
        let (x2, y2) = projector.project(b.0, b.1)?;
        frame.lines.push(LinePrimitive {
            x1,
            y1,
            x2,
            y2,
            ..template
        });
    }
    Ok(())
}

type DataVertex = (f64, f64);

fn clip_segment(
    a: DataVertex,
    b: DataVertex,
    start: f64,
    end: f64,
) -> Option<(DataVertex, DataVertex)> {
    let (a, b) = if a.0 <= b.0 { (a, b) } else { (b, a) };
    if b.0 < start || a.0 > end {
        return None;
    }

    let dx = b.0 - a.0;
    let value_at = |x: f64| {
        if dx == 0.0 {
            a.1
        } else {
            a.1 + (b.1 - a.1) * (x - a.0) / dx
        }
    };
    let x1 = a.0.max(start);
    let x2 = b.0.min(end);
    Some(((x1, value_at(x1)), (x2, value_at(x2))))
}
