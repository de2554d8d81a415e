use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::Size;
use crate::error::{ChartError, ChartResult};

use super::InteractionMode;

fn default_min_zoom() -> f64 {
    0.1
}

fn default_max_zoom() -> f64 {
    5.0
}

fn default_boundary_margin() -> f64 {
    0.1
}

/// Zoom limits and pan clamping margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransformConfig {
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,
    /// Fraction of the viewport size the content must keep covering on each
    /// edge after a pan.
    #[serde(default = "default_boundary_margin")]
    pub boundary_margin: f64,
}

impl Default for ViewportTransformConfig {
    fn default() -> Self {
        Self {
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            boundary_margin: default_boundary_margin(),
        }
    }
}

impl ViewportTransformConfig {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.min_zoom.is_finite() || !self.max_zoom.is_finite() || self.min_zoom <= 0.0 {
            return Err(ChartError::InvalidData(
                "zoom limits must be finite and > 0".to_owned(),
            ));
        }
        if self.min_zoom > self.max_zoom {
            return Err(ChartError::InvalidData(
                "min_zoom must be <= max_zoom".to_owned(),
            ));
        }
        if !self.boundary_margin.is_finite() || !(0.0..0.5).contains(&self.boundary_margin) {
            return Err(ChartError::InvalidData(
                "boundary margin must be in [0, 0.5)".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Translation of the content origin inside the viewport, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanOffset {
    pub x: f64,
    pub y: f64,
}

impl PanOffset {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Public pan/zoom state exposed to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub zoom: f64,
    pub pan: PanOffset,
    pub mode: InteractionMode,
    /// Pointer position minus pan captured when the active pan started.
    pub pan_anchor: Option<PanOffset>,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: PanOffset::default(),
            mode: InteractionMode::Idle,
            pan_anchor: None,
        }
    }
}

impl ViewportState {
    #[must_use]
    pub fn is_panning(self) -> bool {
        self.mode == InteractionMode::Panning
    }
}

/// `translate(..) scale(..)` pair applied to the content container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl DisplayTransform {
    /// CSS `transform` value for the content container.
    #[must_use]
    pub fn css(self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.translate_x, self.translate_y, self.scale
        )
    }

    /// Maps a content-space point to viewport pixels.
    #[must_use]
    pub fn apply(self, x: f64, y: f64) -> (f64, f64) {
        (
            self.translate_x + x * self.scale,
            self.translate_y + y * self.scale,
        )
    }
}

/// Pan/zoom model of the content (template) shown through a fixed viewport.
///
/// Content coordinates map to viewport pixels as `pan + point * zoom`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportTransform {
    config: ViewportTransformConfig,
    viewport: Size,
    content: Size,
    state: ViewportState,
}

impl ViewportTransform {
    pub fn new(config: ViewportTransformConfig, viewport: Size) -> ChartResult<Self> {
        let config = config.validate()?;
        let viewport = viewport.validate()?;
        Ok(Self {
            config,
            viewport,
            content: Size::default(),
            state: ViewportState::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> ViewportTransformConfig {
        self.config
    }

    #[must_use]
    pub fn state(&self) -> ViewportState {
        self.state
    }

    #[must_use]
    pub fn zoom_factor(&self) -> f64 {
        self.state.zoom
    }

    #[must_use]
    pub fn pan(&self) -> PanOffset {
        self.state.pan
    }

    #[must_use]
    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    #[must_use]
    pub fn content_size(&self) -> Size {
        self.content
    }

    pub fn set_viewport_size(&mut self, viewport: Size) -> ChartResult<()> {
        self.viewport = viewport.validate()?;
        Ok(())
    }

    /// Sets the natural (unzoomed) content size, usually the template viewBox.
    pub fn set_content_size(&mut self, content: Size) -> ChartResult<()> {
        self.content = content.validate()?;
        Ok(())
    }

    #[must_use]
    pub fn has_content(&self) -> bool {
        self.content.is_valid()
    }

    /// Sets the zoom factor directly, clamped to the configured limits.
    pub fn set_zoom_factor(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.state.zoom = self.clamp_zoom(zoom);
        }
    }

    /// Content-space point currently drawn at the viewport center.
    #[must_use]
    pub fn content_point_at_viewport_center(&self) -> (f64, f64) {
        let (cx, cy) = self.viewport.center();
        (
            (cx - self.state.pan.x) / self.state.zoom,
            (cy - self.state.pan.y) / self.state.zoom,
        )
    }

    /// Zooms by `1 + delta` around the viewport center.
    ///
    /// `delta == 0` instead recenters the content at the current zoom,
    /// discarding any pan. No-op until a content size is known.
    pub fn zoom(&mut self, delta: f64) {
        if !self.has_content() || !delta.is_finite() {
            return;
        }

        let (cx, cy) = self.viewport.center();
        if delta == 0.0 {
            self.state.pan.x = cx - self.content.width * self.state.zoom / 2.0;
            self.state.pan.y = cy - self.content.height * self.state.zoom / 2.0;
            debug!(zoom = self.state.zoom, "recentered content");
            return;
        }

        let (anchor_x, anchor_y) = self.content_point_at_viewport_center();
        let fraction_x = anchor_x / self.content.width;
        let fraction_y = anchor_y / self.content.height;

        self.state.zoom = self.clamp_zoom(self.state.zoom * (1.0 + delta));

        self.state.pan.x = cx - fraction_x * self.content.width * self.state.zoom;
        self.state.pan.y = cy - fraction_y * self.content.height * self.state.zoom;
        trace!(delta, zoom = self.state.zoom, "zoomed around viewport center");
    }

    /// Recenters at the current zoom.
    pub fn center(&mut self) {
        self.zoom(0.0);
    }

    /// Back to 100% zoom, centered.
    pub fn reset_view(&mut self) {
        self.state.pan = PanOffset::default();
        self.state.zoom = self.clamp_zoom(1.0);
        self.zoom(0.0);
    }

    /// Moves the content origin back to the viewport origin, then clamps.
    pub fn reset_pan(&mut self) {
        self.state.pan = PanOffset::default();
        self.update_pan();
    }

    /// Sets the pan offset without clamping.
    pub fn set_pan(&mut self, pan: PanOffset) {
        self.state.pan = pan;
    }

    /// Shifts the pan offset without clamping.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.state.pan.x += dx;
        self.state.pan.y += dy;
    }

    /// Clamps the pan offset so the zoomed content keeps covering at least
    /// `boundary_margin` of the viewport on every edge.
    ///
    /// Returns `true` when the offset changed.
    pub fn update_pan(&mut self) -> bool {
        let (min_x, max_x) = self.pan_bounds(self.viewport.width, self.content.width);
        let (min_y, max_y) = self.pan_bounds(self.viewport.height, self.content.height);

        let clamped = PanOffset::new(
            self.state.pan.x.min(max_x).max(min_x),
            self.state.pan.y.min(max_y).max(min_y),
        );
        let changed = clamped != self.state.pan;
        if changed {
            trace!(x = clamped.x, y = clamped.y, "pan clamped");
        }
        self.state.pan = clamped;
        changed
    }

    /// Allowed `[min, max]` pan along one dimension.
    #[must_use]
    pub fn pan_bounds(&self, viewport_extent: f64, content_extent: f64) -> (f64, f64) {
        let margin = viewport_extent * self.config.boundary_margin;
        let min = margin - content_extent * self.state.zoom;
        let max = viewport_extent - margin;
        (min, max)
    }

    /// Starts a drag pan anchored at pointer `(x, y)`.
    pub fn begin_pan(&mut self, x: f64, y: f64) {
        self.state.mode = InteractionMode::Panning;
        self.state.pan_anchor = Some(PanOffset::new(x - self.state.pan.x, y - self.state.pan.y));
    }

    /// Moves the active drag pan to pointer `(x, y)` and clamps.
    ///
    /// Returns `false` when no pan is active.
    pub fn drag_pan_to(&mut self, x: f64, y: f64) -> bool {
        let Some(anchor) = self.state.pan_anchor.filter(|_| self.state.is_panning()) else {
            return false;
        };
        self.state.pan = PanOffset::new(x - anchor.x, y - anchor.y);
        self.update_pan();
        true
    }

    pub fn end_pan(&mut self) {
        self.state.mode = InteractionMode::Idle;
        self.state.pan_anchor = None;
    }

    #[must_use]
    pub fn display_transform(&self) -> DisplayTransform {
        DisplayTransform {
            translate_x: self.state.pan.x,
            translate_y: self.state.pan.y,
            scale: self.state.zoom,
        }
    }

    /// Zoom as a rounded percentage (`70` for 0.7).
    #[must_use]
    pub fn zoom_percent(&self) -> i64 {
        (self.state.zoom * 100.0).round() as i64
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.config.min_zoom).min(self.config.max_zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::{PanOffset, ViewportTransform, ViewportTransformConfig};
    use crate::core::Size;

    fn transform() -> ViewportTransform {
        let mut vt = ViewportTransform::new(
            ViewportTransformConfig::default(),
            Size::new(1000.0, 800.0),
        )
        .expect("valid viewport");
        vt.set_content_size(Size::new(600.0, 400.0))
            .expect("valid content");
        vt
    }

    #[test]
    fn zoom_zero_recenters_content() {
        let mut vt = transform();
        vt.set_pan(PanOffset::new(-300.0, 42.0));
        vt.zoom(0.0);
        assert_eq!(vt.pan(), PanOffset::new(200.0, 200.0));
    }

    #[test]
    fn zoom_is_clamped_to_limits() {
        let mut vt = transform();
        vt.zoom(100.0);
        assert_eq!(vt.zoom_factor(), 5.0);
        vt.zoom(-0.999);
        assert_eq!(vt.zoom_factor(), 0.1);
    }

    #[test]
    fn zoom_without_content_is_a_no_op() {
        let mut vt = ViewportTransform::new(
            ViewportTransformConfig::default(),
            Size::new(100.0, 100.0),
        )
        .expect("valid viewport");
        vt.zoom(0.5);
        assert_eq!(vt.zoom_factor(), 1.0);
    }

    #[test]
    fn drag_pan_follows_anchor_and_clamps() {
        let mut vt = transform();
        vt.begin_pan(10.0, 10.0);
        assert!(vt.drag_pan_to(60.0, 30.0));
        assert_eq!(vt.pan(), PanOffset::new(50.0, 20.0));

        assert!(vt.drag_pan_to(5000.0, 10.0));
        assert_eq!(vt.pan().x, 900.0);

        vt.end_pan();
        assert!(!vt.drag_pan_to(0.0, 0.0));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ViewportTransformConfig {
            min_zoom: 2.0,
            max_zoom: 1.0,
            ..ViewportTransformConfig::default()
        };
        assert!(ViewportTransform::new(config, Size::new(1.0, 1.0)).is_err());
    }

    #[test]
    fn css_transform_matches_state() {
        let mut vt = transform();
        vt.set_pan(PanOffset::new(12.5, -4.0));
        assert_eq!(vt.display_transform().css(), "translate(12.5px, -4px) scale(1)");
        assert_eq!(vt.zoom_percent(), 100);
    }
}
