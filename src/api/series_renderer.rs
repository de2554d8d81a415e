use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::tick_format::format_plain;
use crate::core::{
    Axis, AxisConfig, AxisMapping, AxisRange, DataSeries, PlotArea, PlotPoint, curve_path_data,
    finite_bounds, format_tick_label,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{ElementKind, VisualElementNode};

pub const DEFAULT_PALETTE: [&str; 6] = [
    "#4a90e2", "#e74c3c", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c",
];

pub const DATA_GROUP_ID: &str = "data";
pub const TOOLTIP_GROUP_ID: &str = "data-tooltip";
pub const TOOLTIP_TEXT_ID: &str = "tooltip-text";
pub const GRID_GROUP_ID: &str = "grid-lines";
pub const TICK_GROUP_ID: &str = "tick-marks";
pub const DATA_POINT_CLASS: &str = "data-point";

pub const MARKER_RADIUS: f64 = 4.0;
pub const TICK_LABEL_FONT_FAMILY: &str = "Arial, sans-serif";
/// Gap between the bottom of an X tick and its label baseline.
const X_TICK_LABEL_GAP: f64 = 15.0;
/// Gap between a Y tick and its right-aligned label.
const Y_TICK_LABEL_GAP: f64 = 5.0;
/// Baseline shift that vertically centers Y tick labels on their tick.
const Y_TICK_LABEL_BASELINE: f64 = 4.0;

pub(crate) fn tooltip_style(visible: bool) -> String {
    let opacity = if visible { 1 } else { 0 };
    format!("pointer-events: none; opacity: {opacity}; transition: opacity 0.2s;")
}

/// Output of one data render: the plot group and its hover tooltip, both
/// translated to the plot-area origin.
#[derive(Debug, Clone, PartialEq)]
pub struct DataLayer {
    pub data: VisualElementNode,
    pub tooltip: VisualElementNode,
    pub x_range: AxisRange,
    pub y_range: AxisRange,
}

impl DataLayer {
    #[must_use]
    pub fn markers(&self) -> Vec<&VisualElementNode> {
        self.data.find_all_by_class(DATA_POINT_CLASS)
    }

    /// Series curve paths, in series order.
    #[must_use]
    pub fn paths(&self) -> Vec<&VisualElementNode> {
        self.data
            .children
            .iter()
            .filter(|child| child.kind == ElementKind::Path)
            .collect()
    }
}

/// Axis-label texts derived from the data headers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisLabels {
    pub x: Option<String>,
    pub y: Option<String>,
}

/// Scatter/line renderer: smooth curves plus point markers for every Y
/// series against a shared X column.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterRenderer {
    data: DataSeries,
    axis_config: AxisConfig,
    palette: Vec<String>,
}

impl Default for ScatterRenderer {
    fn default() -> Self {
        Self {
            data: DataSeries::default(),
            axis_config: AxisConfig::default(),
            palette: DEFAULT_PALETTE.iter().map(|&c| c.to_owned()).collect(),
        }
    }
}

impl ScatterRenderer {
    #[must_use]
    pub fn new(axis_config: AxisConfig) -> Self {
        Self {
            axis_config,
            ..Self::default()
        }
    }

    /// Replaces the current data wholesale.
    pub fn set_data(&mut self, columns: Vec<Vec<String>>, headers: Vec<String>) {
        debug!(columns = columns.len(), headers = headers.len(), "set series data");
        self.data = DataSeries::new(columns, headers);
    }

    #[must_use]
    pub fn data(&self) -> &DataSeries {
        &self.data
    }

    /// `true` once an X column and at least one Y column are loaded.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.data.column_count() >= 2
    }

    #[must_use]
    pub fn axis_config(&self) -> &AxisConfig {
        &self.axis_config
    }

    pub fn axis_config_mut(&mut self) -> &mut AxisConfig {
        &mut self.axis_config
    }

    #[must_use]
    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Vec<String>) -> ChartResult<()> {
        if palette.is_empty() {
            return Err(ChartError::InvalidData("palette must not be empty".to_owned()));
        }
        self.palette = palette;
        Ok(())
    }

    /// Overrides one palette slot; honoured verbatim on the next render.
    pub fn set_series_color(&mut self, index: usize, color: impl Into<String>) -> ChartResult<()> {
        let len = self.palette.len();
        let slot = self.palette.get_mut(index).ok_or_else(|| {
            ChartError::InvalidData(format!("palette index {index} out of range (len {len})"))
        })?;
        *slot = color.into();
        Ok(())
    }

    #[must_use]
    pub fn series_color(&self, series_index: usize) -> &str {
        self.palette
            .get(series_index % self.palette.len().max(1))
            .map_or(DEFAULT_PALETTE[0], String::as_str)
    }

    #[must_use]
    pub fn axis_labels(&self) -> AxisLabels {
        AxisLabels {
            x: self.data.x_label().map(str::to_owned),
            y: self.data.y_label(),
        }
    }

    /// `"<x header> vs <y headers>"`, when headers are present.
    #[must_use]
    pub fn chart_title(&self) -> Option<String> {
        let x = self.data.headers.first()?;
        let y = self.data.headers[1..].join(", ");
        Some(format!("{x} vs {y}"))
    }

    /// Builds the data and tooltip groups for `plot_area`.
    ///
    /// Malformed cells degrade to excluded points; only a missing Y column
    /// is an error.
    pub fn render_data(&self, plot_area: PlotArea) -> ChartResult<DataLayer> {
        if !self.has_data() {
            return Err(ChartError::InsufficientColumns {
                found: self.data.column_count(),
            });
        }

        let x_values = self.data.parsed_x();
        let y_series = self.data.parsed_y();

        let (x_data_min, x_data_max) = finite_bounds(&x_values).unwrap_or((f64::NAN, f64::NAN));
        let (y_data_min, y_data_max) =
            finite_bounds(y_series.iter().flatten()).unwrap_or((f64::NAN, f64::NAN));

        let config = &self.axis_config;
        let x_range = config.resolve_range(Axis::X, x_data_min, x_data_max);
        let y_range = config.resolve_range(Axis::Y, y_data_min, y_data_max);
        let x_map = AxisMapping::new(x_range, config.x_scale, plot_area.width, false);
        let y_map = AxisMapping::new(y_range, config.y_scale, plot_area.height, true);

        let translate = format!(
            "translate({},{})",
            format_plain(plot_area.x),
            format_plain(plot_area.y)
        );
        let mut data = VisualElementNode::group()
            .with_id(DATA_GROUP_ID)
            .with_attr("transform", translate.as_str());

        let ranges_finite = x_range.is_finite() && y_range.is_finite();
        if !ranges_finite && (config.grid_enabled || config.ticks_enabled) {
            warn!(
                x_min = x_range.min,
                x_max = x_range.max,
                y_min = y_range.min,
                y_max = y_range.max,
                "skipping grid and ticks for non-finite axis range"
            );
        }
        if config.grid_enabled && ranges_finite {
            data.children
                .push(self.grid_group(plot_area, x_range, y_range, x_map, y_map));
        }
        if config.ticks_enabled && ranges_finite {
            data.children
                .push(self.tick_group(plot_area, x_range, y_range, x_map, y_map));
        }

        let mut marker_count = 0;
        for (series_index, y_values) in y_series.iter().enumerate() {
            let color = self.series_color(series_index);
            let points = project_points(&x_values, y_values, x_range, y_range, x_map, y_map);

            data.children.push(
                VisualElementNode::new(ElementKind::Path)
                    .with_attr("d", curve_path_data(&points))
                    .with_attr("stroke", color)
                    .with_attr("stroke-width", "2.5")
                    .with_attr("fill", "none")
                    .with_attr("opacity", "0.8"),
            );

            let label = self.data.series_label(series_index);
            marker_count += points.len();
            data.children.extend(
                points
                    .iter()
                    .map(|point| marker_node(point, color, label.as_str())),
            );
        }

        let tooltip = VisualElementNode::group()
            .with_id(TOOLTIP_GROUP_ID)
            .with_attr("transform", translate)
            .with_attr("style", tooltip_style(false))
            .with_child(
                VisualElementNode::new(ElementKind::Text)
                    .with_id(TOOLTIP_TEXT_ID)
                    .with_attr("x", 0.0)
                    .with_attr("y", 0.0)
                    .with_attr("fill", "#000000")
                    .with_attr("font-size", 14.0)
                    .with_attr("font-family", "monospace")
                    .with_attr("font-weight", "bold")
                    .with_attr("text-anchor", "middle")
                    .with_text(""),
            );

        debug!(
            series = y_series.len(),
            markers = marker_count,
            x_min = x_range.min,
            x_max = x_range.max,
            y_min = y_range.min,
            y_max = y_range.max,
            "rendered data layer"
        );

        Ok(DataLayer {
            data,
            tooltip,
            x_range,
            y_range,
        })
    }

    fn grid_group(
        &self,
        plot_area: PlotArea,
        x_range: AxisRange,
        y_range: AxisRange,
        x_map: AxisMapping,
        y_map: AxisMapping,
    ) -> VisualElementNode {
        let config = &self.axis_config;
        let dasharray = config.grid_stroke_dasharray();
        let grid_line = |x1: f64, y1: f64, x2: f64, y2: f64| {
            VisualElementNode::new(ElementKind::Line)
                .with_attr("x1", x1)
                .with_attr("y1", y1)
                .with_attr("x2", x2)
                .with_attr("y2", y2)
                .with_attr("stroke", config.grid_color.as_str())
                .with_attr("stroke-width", "1")
                .with_attr("stroke-dasharray", dasharray)
        };

        let mut group = VisualElementNode::group()
            .with_id(GRID_GROUP_ID)
            .with_attr("opacity", config.grid_opacity);

        for tick in config.grid_ticks(Axis::X, x_range) {
            let x = x_map.to_pixel(tick);
            group.children.push(grid_line(x, 0.0, x, plot_area.height));
        }
        for tick in config.grid_ticks(Axis::Y, y_range) {
            let y = y_map.to_pixel(tick);
            group.children.push(grid_line(0.0, y, plot_area.width, y));
        }
        group
    }

    fn tick_group(
        &self,
        plot_area: PlotArea,
        x_range: AxisRange,
        y_range: AxisRange,
        x_map: AxisMapping,
        y_map: AxisMapping,
    ) -> VisualElementNode {
        let config = &self.axis_config;
        let tick_line = |x1: f64, y1: f64, x2: f64, y2: f64| {
            VisualElementNode::new(ElementKind::Line)
                .with_attr("x1", x1)
                .with_attr("y1", y1)
                .with_attr("x2", x2)
                .with_attr("y2", y2)
                .with_attr("stroke", config.tick_color.as_str())
                .with_attr("stroke-width", config.tick_width)
        };
        let tick_label = |x: f64, y: f64, anchor: &str, text: String| {
            VisualElementNode::new(ElementKind::Text)
                .with_attr("x", x)
                .with_attr("y", y)
                .with_attr("fill", config.tick_color.as_str())
                .with_attr("font-size", config.tick_label_font_size)
                .with_attr("font-family", TICK_LABEL_FONT_FAMILY)
                .with_attr("text-anchor", anchor)
                .with_text(text)
        };

        let mut group = VisualElementNode::group().with_id(TICK_GROUP_ID);
        let height = plot_area.height;
        let length = config.tick_length;

        for tick in config.tick_values(Axis::X, x_range) {
            let x = x_map.to_pixel(tick);
            group.children.push(tick_line(x, height, x, height + length));
            if config.tick_labels_enabled {
                let text = format_tick_label(tick, config.x_scale);
                group.children.push(tick_label(
                    x,
                    height + length + X_TICK_LABEL_GAP,
                    "middle",
                    text,
                ));
            }
        }

        for tick in config.tick_values(Axis::Y, y_range) {
            let y = y_map.to_pixel(tick);
            group.children.push(tick_line(-length, y, 0.0, y));
            if config.tick_labels_enabled {
                let text = format_tick_label(tick, config.y_scale);
                group.children.push(tick_label(
                    -length - Y_TICK_LABEL_GAP,
                    y + Y_TICK_LABEL_BASELINE,
                    "end",
                    text,
                ));
            }
        }
        group
    }
}

/// Maps one series into plot pixels, dropping points outside either range
/// (non-finite values included).
fn project_points(
    x_values: &[f64],
    y_values: &[f64],
    x_range: AxisRange,
    y_range: AxisRange,
    x_map: AxisMapping,
    y_map: AxisMapping,
) -> Vec<PlotPoint> {
    x_values
        .iter()
        .zip(y_values)
        .filter(|&(&x, &y)| x_range.contains(x) && y_range.contains(y))
        .map(|(&x, &y)| PlotPoint::new(x_map.to_pixel(x), y_map.to_pixel(y), x, y))
        .collect()
}

fn marker_node(point: &PlotPoint, color: &str, series_label: &str) -> VisualElementNode {
    VisualElementNode::new(ElementKind::Circle)
        .with_class(DATA_POINT_CLASS)
        .with_attr("cx", point.x)
        .with_attr("cy", point.y)
        .with_attr("r", MARKER_RADIUS)
        .with_attr("fill", color)
        .with_attr("stroke", "#ffffff")
        .with_attr("stroke-width", 2.0)
        .with_attr("style", "cursor: pointer;")
        .with_attr("data-x", point.data_x)
        .with_attr("data-y", point.data_y)
        .with_attr("data-series", series_label)
}
