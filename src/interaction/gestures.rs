use serde::{Deserialize, Serialize};
use tracing::trace;

use super::viewport_transform::{PanOffset, ViewportTransform};

fn default_wheel_zoom_factor() -> f64 {
    0.01
}

fn default_pinch_zoom_factor() -> f64 {
    0.5
}

fn default_trackpad_delta_threshold() -> f64 {
    50.0
}

fn default_true() -> bool {
    true
}

/// Enables each input family and carries the gesture scaling factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputBehavior {
    /// Master enable for pan-family interactions.
    #[serde(default = "default_true")]
    pub handle_pan: bool,
    /// Master enable for zoom-family interactions.
    #[serde(default = "default_true")]
    pub handle_zoom: bool,
    /// Middle-button drag pans.
    #[serde(default = "default_true")]
    pub pan_middle_drag: bool,
    /// Unmodified trackpad-like wheel events pan.
    #[serde(default = "default_true")]
    pub pan_wheel: bool,
    /// One-finger touch drag pans.
    #[serde(default = "default_true")]
    pub pan_touch: bool,
    /// Ctrl/meta + wheel zooms.
    #[serde(default = "default_true")]
    pub zoom_wheel: bool,
    /// Two-finger pinch zooms.
    #[serde(default = "default_true")]
    pub zoom_pinch: bool,
    #[serde(default = "default_wheel_zoom_factor")]
    pub wheel_zoom_factor: f64,
    #[serde(default = "default_pinch_zoom_factor")]
    pub pinch_zoom_factor: f64,
    /// Wheel events with `|delta_y|` below this count as trackpad scrolls.
    #[serde(default = "default_trackpad_delta_threshold")]
    pub trackpad_delta_threshold: f64,
}

impl Default for InputBehavior {
    fn default() -> Self {
        Self {
            handle_pan: true,
            handle_zoom: true,
            pan_middle_drag: true,
            pan_wheel: true,
            pan_touch: true,
            zoom_wheel: true,
            zoom_pinch: true,
            wheel_zoom_factor: default_wheel_zoom_factor(),
            pinch_zoom_factor: default_pinch_zoom_factor(),
            trackpad_delta_threshold: default_trackpad_delta_threshold(),
        }
    }
}

impl InputBehavior {
    #[must_use]
    pub(crate) fn allows_drag_pan(self) -> bool {
        self.handle_pan && self.pan_middle_drag
    }

    #[must_use]
    pub(crate) fn allows_wheel_pan(self) -> bool {
        self.handle_pan && self.pan_wheel
    }

    #[must_use]
    pub(crate) fn allows_touch_pan(self) -> bool {
        self.handle_pan && self.pan_touch
    }

    #[must_use]
    pub(crate) fn allows_wheel_zoom(self) -> bool {
        self.handle_zoom && self.zoom_wheel
    }

    #[must_use]
    pub(crate) fn allows_pinch_zoom(self) -> bool {
        self.handle_zoom && self.zoom_pinch
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Unit of wheel deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WheelDeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    pub delta_mode: WheelDeltaMode,
    pub ctrl: bool,
    pub meta: bool,
}

impl WheelInput {
    #[must_use]
    pub fn scroll(delta_x: f64, delta_y: f64) -> Self {
        Self {
            delta_x,
            delta_y,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn zoom(delta_y: f64) -> Self {
        Self {
            delta_y,
            ctrl: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What a forwarded input event did to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureEffect {
    Ignored,
    /// Consumed without moving anything (e.g. drag start).
    Captured,
    Panned,
    Zoomed,
}

impl GestureEffect {
    /// `true` when the viewport moved.
    #[must_use]
    pub fn moved(self) -> bool {
        matches!(self, Self::Panned | Self::Zoomed)
    }
}

/// Translates raw pointer, wheel, touch and key input into viewport
/// mutations.
///
/// Every pan it applies is followed by [`ViewportTransform::update_pan`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureController {
    behavior: InputBehavior,
    touch_anchor: PanOffset,
    touch_start_distance: f64,
    touch_panning: bool,
    was_pinching: bool,
}

impl GestureController {
    #[must_use]
    pub fn new(behavior: InputBehavior) -> Self {
        Self {
            behavior,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn behavior(&self) -> InputBehavior {
        self.behavior
    }

    pub fn set_behavior(&mut self, behavior: InputBehavior) {
        self.behavior = behavior;
    }

    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.was_pinching
    }

    pub fn pointer_down(
        &mut self,
        viewport: &mut ViewportTransform,
        button: PointerButton,
        x: f64,
        y: f64,
    ) -> GestureEffect {
        if button != PointerButton::Middle || !self.behavior.allows_drag_pan() {
            return GestureEffect::Ignored;
        }
        viewport.begin_pan(x, y);
        GestureEffect::Captured
    }

    pub fn pointer_move(
        &mut self,
        viewport: &mut ViewportTransform,
        x: f64,
        y: f64,
    ) -> GestureEffect {
        if viewport.drag_pan_to(x, y) {
            GestureEffect::Panned
        } else {
            GestureEffect::Ignored
        }
    }

    pub fn pointer_up(
        &mut self,
        viewport: &mut ViewportTransform,
        button: PointerButton,
    ) -> GestureEffect {
        if button != PointerButton::Middle || !viewport.state().is_panning() {
            return GestureEffect::Ignored;
        }
        viewport.end_pan();
        GestureEffect::Captured
    }

    /// Ctrl/meta + wheel zooms by `-delta_y * wheel_zoom_factor`; other
    /// trackpad-like wheel events pan by the negated deltas.
    pub fn wheel(&mut self, viewport: &mut ViewportTransform, input: WheelInput) -> GestureEffect {
        if input.ctrl || input.meta {
            if !self.behavior.allows_wheel_zoom() {
                return GestureEffect::Ignored;
            }
            let delta = -input.delta_y * self.behavior.wheel_zoom_factor;
            viewport.zoom(delta);
            trace!(delta, "wheel zoom");
            return GestureEffect::Zoomed;
        }

        let is_trackpad = input.delta_y.abs() < self.behavior.trackpad_delta_threshold
            || input.delta_mode == WheelDeltaMode::Pixel;
        if !is_trackpad || !self.behavior.allows_wheel_pan() {
            return GestureEffect::Ignored;
        }
        viewport.pan_by(-input.delta_x, -input.delta_y);
        viewport.update_pan();
        GestureEffect::Panned
    }

    pub fn touch_start(
        &mut self,
        viewport: &mut ViewportTransform,
        touches: &[TouchPoint],
    ) -> GestureEffect {
        match touches {
            [touch] => {
                if self.was_pinching || !self.behavior.allows_touch_pan() {
                    return GestureEffect::Ignored;
                }
                self.anchor_touch_pan(viewport, *touch);
                GestureEffect::Captured
            }
            [first, second] => {
                self.touch_panning = false;
                if !self.behavior.allows_pinch_zoom() {
                    return GestureEffect::Ignored;
                }
                self.was_pinching = true;
                self.touch_start_distance = touch_distance(*first, *second);
                GestureEffect::Captured
            }
            _ => GestureEffect::Ignored,
        }
    }

    pub fn touch_move(
        &mut self,
        viewport: &mut ViewportTransform,
        touches: &[TouchPoint],
    ) -> GestureEffect {
        match touches {
            [touch] if self.touch_panning && !self.was_pinching => {
                viewport.set_pan(PanOffset::new(
                    touch.x - self.touch_anchor.x,
                    touch.y - self.touch_anchor.y,
                ));
                viewport.update_pan();
                GestureEffect::Panned
            }
            [first, second] => {
                self.touch_panning = false;
                if !self.behavior.allows_pinch_zoom() {
                    return GestureEffect::Ignored;
                }
                self.was_pinching = true;

                let distance = touch_distance(*first, *second);
                if self.touch_start_distance <= 0.0 {
                    self.touch_start_distance = distance;
                    return GestureEffect::Captured;
                }
                let scale = distance / self.touch_start_distance;
                let delta = (scale - 1.0) * self.behavior.pinch_zoom_factor;
                viewport.zoom(delta);
                self.touch_start_distance = distance;
                GestureEffect::Zoomed
            }
            _ => GestureEffect::Ignored,
        }
    }

    /// `remaining` holds the touches still on the surface.
    pub fn touch_end(
        &mut self,
        viewport: &mut ViewportTransform,
        remaining: &[TouchPoint],
    ) -> GestureEffect {
        match remaining {
            [] => {
                self.touch_panning = false;
                self.was_pinching = false;
                self.touch_start_distance = 0.0;
                GestureEffect::Captured
            }
            [touch] if self.was_pinching => {
                self.was_pinching = false;
                self.touch_start_distance = 0.0;
                if self.behavior.allows_touch_pan() {
                    self.anchor_touch_pan(viewport, *touch);
                }
                GestureEffect::Captured
            }
            _ => GestureEffect::Ignored,
        }
    }

    /// `r` moves the pan back to the origin; any key re-applies the clamp.
    pub fn key_press(&mut self, viewport: &mut ViewportTransform, key: &str) -> GestureEffect {
        if key == "r" {
            viewport.reset_pan();
        } else {
            viewport.update_pan();
        }
        GestureEffect::Panned
    }

    fn anchor_touch_pan(&mut self, viewport: &ViewportTransform, touch: TouchPoint) {
        let pan = viewport.pan();
        self.touch_anchor = PanOffset::new(touch.x - pan.x, touch.y - pan.y);
        self.touch_panning = true;
    }
}

fn touch_distance(a: TouchPoint, b: TouchPoint) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}
