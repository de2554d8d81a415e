use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }

    #[must_use]
    pub fn center(self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Data window inside the template where series are drawn.
///
/// `x`/`y` locate the window's top-left corner in template coordinates; all
/// series geometry is emitted relative to that origin.
pub type PlotArea = Rect;

/// One plotted sample: pixel position relative to the plot origin plus the
/// raw data values it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub data_x: f64,
    pub data_y: f64,
}

impl PlotPoint {
    #[must_use]
    pub fn new(x: f64, y: f64, data_x: f64, data_y: f64) -> Self {
        Self {
            x,
            y,
            data_x,
            data_y,
        }
    }
}
