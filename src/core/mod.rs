pub mod scale;
pub mod series;
pub mod trend;
pub mod types;
pub mod viewport;

pub use scale::LinearScale;
pub use series::{Series, day_label};
pub use trend::{LinearFit, TrendDirection, TrendLine, fit_linear_trend};
pub use types::{HorizonRequest, Point, Viewport};
pub use viewport::{
    AxisSpec, ViewportSpec, ViewportTuning, VisibleWindow, scale_series, scale_series_tuned,
};
