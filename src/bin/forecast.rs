use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use forecast_chart::api::{ChartModel, ForecastClientConfig, ForecastOrchestrator, HttpTransport};
use forecast_chart::core::{TrendDirection, Viewport};
use forecast_chart::render::{ChartFrameStyle, NullRenderer, Renderer, build_chart_frame};
use forecast_chart::telemetry;

#[derive(Debug, Parser)]
#[command(
    name = "forecast",
    about = "Request a multi-day forecast and print the resulting chart model"
)]
struct Cli {
    /// Number of days to forecast (1-60).
    #[arg(short, long)]
    days: Option<String>,

    /// Service base url; overrides FORECAST_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Connect/read/write timeout in seconds; overrides FORECAST_TIMEOUT_SECS.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// JSON client config file; environment variables are ignored when set.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the chart model as a versioned JSON document.
    #[arg(long)]
    json: bool,

    /// Build a render frame of the default window and print its size.
    #[arg(long)]
    frame: bool,

    /// Query the service health endpoint instead of forecasting.
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() {
    let _ = telemetry::init_tracing_with_filter("warn");
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let transport = HttpTransport::new(&config)?;

    if cli.health {
        let health = transport
            .health()
            .await
            .with_context(|| format!("health probe against {} failed", config.health_url()))?;
        println!(
            "status: {}\ntrend model loaded: {}\nscaler loaded: {}",
            health.status, health.trend_model_loaded, health.scaler_loaded
        );
        if !health.is_ready() {
            bail!("forecast service is not ready");
        }
        return Ok(());
    }

    let Some(days) = cli.days.as_deref() else {
        bail!("--days is required unless --health is given");
    };

    let orchestrator = ForecastOrchestrator::with_tuning(transport, config.viewport_tuning)?;
    let chart = match orchestrator.submit_text(days).await {
        Ok(chart) => chart,
        Err(err) => {
            eprintln!("{}", err.user_message());
            return Err(err.into());
        }
    };

    println!("{}", chart.status_text);
    print_summary(&chart);

    if cli.frame {
        let frame = build_chart_frame(
            &chart,
            chart.visible_window(),
            Viewport::new(800, 480),
            &ChartFrameStyle::default(),
        )?;
        let mut renderer = NullRenderer::default();
        renderer.render(&frame)?;
        println!(
            "frame: {} lines, {} markers, {} labels",
            renderer.last_line_count, renderer.last_marker_count, renderer.last_text_count
        );
    }

    if cli.json {
        println!("{}", chart.to_json_contract_v1_pretty()?);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ForecastClientConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            ForecastClientConfig::from_json_str(&raw)?
        }
        None => ForecastClientConfig::from_env(),
    };
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout_secs(secs);
    }
    Ok(config.validate()?)
}

fn print_summary(chart: &ChartModel) {
    println!("points: {}", chart.series.len());
    match (chart.trend.fit(), chart.trend.direction()) {
        (Some(fit), Some(direction)) => {
            let direction = match direction {
                TrendDirection::Rising => "rising",
                TrendDirection::Falling => "falling",
                TrendDirection::Flat => "flat",
            };
            println!(
                "trend: {direction} (slope {:.3}, intercept {:.3})",
                fit.slope, fit.intercept
            );
        }
        _ => println!("trend: none"),
    }
    println!(
        "value axis: {:.0}..{:.0}, window: {} of {} days",
        chart.axis.min_y,
        chart.axis.max_y,
        chart.viewport.visible_range_max,
        chart.series.len()
    );
}
