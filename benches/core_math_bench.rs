use criterion::{Criterion, criterion_group, criterion_main};
use forecast_chart::api::{ChartModel, ForecastResponseBody};
use forecast_chart::core::{
    HorizonRequest, LinearScale, Series, Viewport, ViewportTuning, fit_linear_trend, scale_series,
};
use forecast_chart::render::{ChartFrameStyle, build_chart_frame};
use std::hint::black_box;

fn sixty_day_forecast() -> Vec<f64> {
    (0..60)
        .map(|i| {
            let t = f64::from(i);
            let wobble = if i % 2 == 0 { 120.0 } else { -120.0 };
            6_000.0 + t * 35.0 + wobble
        })
        .collect()
}

fn bench_linear_scale_projection(c: &mut Criterion) {
    let scale = LinearScale::new(0.0, 10_000.0).expect("valid scale");

    c.bench_function("linear_scale_projection", |b| {
        b.iter(|| {
            let _ = scale
                .domain_to_pixel(black_box(4_321.123), 1_920.0)
                .expect("to pixel");
        })
    });
}

fn bench_trend_fit_60(c: &mut Criterion) {
    let series = Series::from_predictions(&sixty_day_forecast());

    c.bench_function("trend_fit_60", |b| {
        b.iter(|| {
            let _ = fit_linear_trend(black_box(&series));
        })
    });
}

fn bench_scale_series_60(c: &mut Criterion) {
    let series = Series::from_predictions(&sixty_day_forecast());

    c.bench_function("scale_series_60", |b| {
        b.iter(|| {
            let _ = scale_series(black_box(&series));
        })
    });
}

fn bench_chart_frame_60(c: &mut Criterion) {
    let body = ForecastResponseBody {
        prediction: sixty_day_forecast(),
        status: "success".to_owned(),
        days_predicted: Some(60),
    };
    let chart = ChartModel::from_response(
        HorizonRequest::new(60).expect("valid horizon"),
        &body,
        ViewportTuning::default(),
    )
    .expect("chart model");
    let style = ChartFrameStyle::default();

    c.bench_function("chart_frame_60", |b| {
        b.iter(|| {
            let _ = build_chart_frame(
                black_box(&chart),
                chart.visible_window(),
                Viewport::new(1_600, 900),
                &style,
            )
            .expect("frame should build");
        })
    });
}

criterion_group!(
    benches,
    bench_linear_scale_projection,
    bench_trend_fit_60,
    bench_scale_series_60,
    bench_chart_frame_60
);
criterion_main!(benches);
