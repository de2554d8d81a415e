use serde::{Deserialize, Serialize};

use super::scale::{AxisRange, ScaleKind, calculate_range};
use super::tick_format::generate_ticks;

/// Selects one of the two plot axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// Stroke pattern of grid lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GridStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl GridStyle {
    /// `stroke-dasharray` value for this style.
    #[must_use]
    pub fn dasharray(self) -> &'static str {
        match self {
            Self::Dashed => "5,5",
            Self::Dotted => "2,2",
            Self::Solid => "none",
        }
    }
}

/// Scale, range, grid and tick policy for one chart.
///
/// Owned by the series renderer and mutated in place by the settings layer.
/// Serializable so hosts can persist chart styling alongside templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    pub x_scale: ScaleKind,
    pub y_scale: ScaleKind,

    /// User bounds. `None` means auto from data.
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,

    pub grid_enabled: bool,
    pub grid_color: String,
    pub grid_style: GridStyle,
    pub grid_opacity: f64,
    pub x_grid_frequency: usize,
    pub y_grid_frequency: usize,

    pub ticks_enabled: bool,
    pub tick_color: String,
    pub tick_length: f64,
    pub tick_width: f64,
    pub x_tick_frequency: usize,
    pub y_tick_frequency: usize,
    pub tick_labels_enabled: bool,
    pub tick_label_font_size: f64,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            x_scale: ScaleKind::Linear,
            y_scale: ScaleKind::Linear,
            x_min: None,
            x_max: None,
            y_min: None,
            y_max: None,
            grid_enabled: true,
            grid_color: "#e0e0e0".to_owned(),
            grid_style: GridStyle::Solid,
            grid_opacity: 0.5,
            x_grid_frequency: 5,
            y_grid_frequency: 5,
            ticks_enabled: true,
            tick_color: "#2c3e50".to_owned(),
            tick_length: 8.0,
            tick_width: 2.0,
            x_tick_frequency: 5,
            y_tick_frequency: 5,
            tick_labels_enabled: true,
            tick_label_font_size: 12.0,
        }
    }
}

impl AxisConfig {
    #[must_use]
    pub fn scale(&self, axis: Axis) -> ScaleKind {
        match axis {
            Axis::X => self.x_scale,
            Axis::Y => self.y_scale,
        }
    }

    /// User-specified `(min, max)` for `axis`.
    #[must_use]
    pub fn user_range(&self, axis: Axis) -> (Option<f64>, Option<f64>) {
        match axis {
            Axis::X => (self.x_min, self.x_max),
            Axis::Y => (self.y_min, self.y_max),
        }
    }

    #[must_use]
    pub fn grid_frequency(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.x_grid_frequency,
            Axis::Y => self.y_grid_frequency,
        }
    }

    #[must_use]
    pub fn tick_frequency(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.x_tick_frequency,
            Axis::Y => self.y_tick_frequency,
        }
    }

    /// Sets every grid and tick frequency at once.
    pub fn set_all_frequencies(&mut self, frequency: usize) {
        self.x_grid_frequency = frequency;
        self.y_grid_frequency = frequency;
        self.x_tick_frequency = frequency;
        self.y_tick_frequency = frequency;
    }

    #[must_use]
    pub fn grid_stroke_dasharray(&self) -> &'static str {
        self.grid_style.dasharray()
    }

    /// Plotted range of `axis` given the data extent on that axis.
    #[must_use]
    pub fn resolve_range(&self, axis: Axis, data_min: f64, data_max: f64) -> AxisRange {
        let (user_min, user_max) = self.user_range(axis);
        calculate_range(data_min, data_max, user_min, user_max, self.scale(axis))
    }

    #[must_use]
    pub fn grid_ticks(&self, axis: Axis, range: AxisRange) -> Vec<f64> {
        generate_ticks(range.min, range.max, self.grid_frequency(axis), self.scale(axis))
    }

    #[must_use]
    pub fn tick_values(&self, axis: Axis, range: AxisRange) -> Vec<f64> {
        generate_ticks(range.min, range.max, self.tick_frequency(axis), self.scale(axis))
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, AxisConfig, GridStyle};
    use crate::core::ScaleKind;

    #[test]
    fn dasharray_follows_grid_style() {
        let mut config = AxisConfig::default();
        assert_eq!(config.grid_stroke_dasharray(), "none");
        config.grid_style = GridStyle::Dashed;
        assert_eq!(config.grid_stroke_dasharray(), "5,5");
        config.grid_style = GridStyle::Dotted;
        assert_eq!(config.grid_stroke_dasharray(), "2,2");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: AxisConfig =
            serde_json::from_str(r#"{"y_scale":"log","y_min":1.0}"#).expect("deserialize");
        assert_eq!(config.scale(Axis::Y), ScaleKind::Log);
        assert_eq!(config.user_range(Axis::Y), (Some(1.0), None));
        assert_eq!(config.grid_color, "#e0e0e0");
        assert_eq!(config.tick_frequency(Axis::X), 5);
    }

    #[test]
    fn resolve_range_uses_axis_specific_bounds() {
        let config = AxisConfig {
            x_max: Some(4.0),
            ..AxisConfig::default()
        };
        let x = config.resolve_range(Axis::X, 0.0, 10.0);
        let y = config.resolve_range(Axis::Y, 0.0, 10.0);
        assert_eq!((x.min, x.max), (0.0, 4.0));
        assert_eq!((y.min, y.max), (0.0, 10.0));
    }
}
