use serde::{Deserialize, Serialize};

/// Smallest domain value fed into a log transform.
pub const LOG_DOMAIN_FLOOR: f64 = 1e-4;
/// Floor for the upper end of a log range. Kept above [`LOG_DOMAIN_FLOOR`]
/// so a fully clamped range never collapses to a single point.
pub const LOG_RANGE_MAX_FLOOR: f64 = 1e-3;

/// Mapping mode of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    /// Uniform spacing in raw data units.
    #[default]
    Linear,
    /// Uniform spacing in `log10` units; values are floored to
    /// [`LOG_DOMAIN_FLOOR`] before transforming.
    Log,
}

/// Resolved `[min, max]` window of one axis in data units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Closed-interval membership. Non-finite values are never contained.
    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

/// Resolves the plotted range: user bounds win over data bounds, and log
/// scales floor both ends to strictly positive values.
#[must_use]
pub fn calculate_range(
    data_min: f64,
    data_max: f64,
    user_min: Option<f64>,
    user_max: Option<f64>,
    scale: ScaleKind,
) -> AxisRange {
    let min = user_min.unwrap_or(data_min);
    let max = user_max.unwrap_or(data_max);

    match scale {
        ScaleKind::Log => AxisRange::new(min.max(LOG_DOMAIN_FLOOR), max.max(LOG_RANGE_MAX_FLOOR)),
        ScaleKind::Linear => AxisRange::new(min, max),
    }
}

/// Maps a domain value into scale space.
///
/// Log inputs below [`LOG_DOMAIN_FLOOR`] are silently floored, so callers are
/// expected to pass values already resolved through [`calculate_range`].
#[must_use]
pub fn apply_scale(value: f64, scale: ScaleKind) -> f64 {
    match scale {
        ScaleKind::Linear => value,
        ScaleKind::Log => value.max(LOG_DOMAIN_FLOOR).log10(),
    }
}

/// Maps a scale-space value back to the domain.
///
/// Only exact above the log floor: anything floored by [`apply_scale`] comes
/// back as the floor.
#[must_use]
pub fn inverse_scale(value: f64, scale: ScaleKind) -> f64 {
    match scale {
        ScaleKind::Linear => value,
        ScaleKind::Log => 10f64.powf(value),
    }
}

/// Domain → pixel mapping for one axis of the plot area.
///
/// Pixel offsets are relative to the plot origin. Inverted axes (Y) grow
/// upwards from `extent_px`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisMapping {
    scale: ScaleKind,
    range: AxisRange,
    scaled_min: f64,
    scaled_max: f64,
    pixels_per_unit: f64,
    extent_px: f64,
    inverted: bool,
}

impl AxisMapping {
    /// Builds the mapping for `range` spread over `extent_px` pixels.
    ///
    /// A zero-width scaled range (single distinct value) uses a unit span so
    /// the factor stays finite.
    #[must_use]
    pub fn new(range: AxisRange, scale: ScaleKind, extent_px: f64, inverted: bool) -> Self {
        let scaled_min = apply_scale(range.min, scale);
        let scaled_max = apply_scale(range.max, scale);
        let span = scaled_max - scaled_min;
        let span = if span == 0.0 || span.is_nan() { 1.0 } else { span };

        Self {
            scale,
            range,
            scaled_min,
            scaled_max,
            pixels_per_unit: extent_px / span,
            extent_px,
            inverted,
        }
    }

    #[must_use]
    pub fn range(self) -> AxisRange {
        self.range
    }

    #[must_use]
    pub fn scale(self) -> ScaleKind {
        self.scale
    }

    #[must_use]
    pub fn scaled_bounds(self) -> (f64, f64) {
        (self.scaled_min, self.scaled_max)
    }

    #[must_use]
    pub fn pixels_per_unit(self) -> f64 {
        self.pixels_per_unit
    }

    #[must_use]
    pub fn to_pixel(self, value: f64) -> f64 {
        let offset = (apply_scale(value, self.scale) - self.scaled_min) * self.pixels_per_unit;
        if self.inverted {
            self.extent_px - offset
        } else {
            offset
        }
    }

    #[must_use]
    pub fn from_pixel(self, pixel: f64) -> f64 {
        let offset = if self.inverted {
            self.extent_px - pixel
        } else {
            pixel
        };
        inverse_scale(self.scaled_min + offset / self.pixels_per_unit, self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisMapping, AxisRange, ScaleKind, apply_scale, calculate_range};

    #[test]
    fn user_bounds_override_data_bounds() {
        let range = calculate_range(1.0, 9.0, Some(0.0), None, ScaleKind::Linear);
        assert_eq!(range, AxisRange::new(0.0, 9.0));
    }

    #[test]
    fn log_range_uses_asymmetric_floors() {
        let range = calculate_range(-5.0, 0.0, None, None, ScaleKind::Log);
        assert_eq!(range, AxisRange::new(1e-4, 1e-3));
    }

    #[test]
    fn log_transform_floors_non_positive_values() {
        assert_eq!(apply_scale(0.0, ScaleKind::Log), -4.0);
        assert_eq!(apply_scale(-3.0, ScaleKind::Log), -4.0);
    }

    #[test]
    fn degenerate_range_maps_with_unit_span() {
        let mapping = AxisMapping::new(AxisRange::new(5.0, 5.0), ScaleKind::Linear, 300.0, true);
        assert_eq!(mapping.pixels_per_unit(), 300.0);
        assert_eq!(mapping.to_pixel(5.0), 300.0);
    }

    #[test]
    fn inverted_mapping_round_trips() {
        let mapping = AxisMapping::new(AxisRange::new(10.0, 20.0), ScaleKind::Linear, 300.0, true);
        let px = mapping.to_pixel(12.5);
        assert!((px - 225.0).abs() <= 1e-9);
        assert!((mapping.from_pixel(px) - 12.5).abs() <= 1e-9);
    }
}
