pub mod axis_config;
pub mod scale;
pub mod series;
pub mod spline;
pub mod tick_format;
pub mod types;

pub use axis_config::{Axis, AxisConfig, GridStyle};
pub use scale::{
    AxisMapping, AxisRange, LOG_DOMAIN_FLOOR, LOG_RANGE_MAX_FLOOR, ScaleKind, apply_scale,
    calculate_range, inverse_scale,
};
pub use series::{DataSeries, finite_bounds, parse_float_lenient};
pub use spline::{catmull_rom, curve_path_data, sample_catmull_rom};
pub use tick_format::{format_tick_label, generate_ticks};
pub use types::{PlotArea, PlotPoint, Rect, Size};
