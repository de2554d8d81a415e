mod gestures;
mod viewport_transform;

use serde::{Deserialize, Serialize};

pub use gestures::{
    GestureController, GestureEffect, InputBehavior, PointerButton, TouchPoint, WheelDeltaMode,
    WheelInput,
};
pub use viewport_transform::{
    DisplayTransform, PanOffset, ViewportState, ViewportTransform, ViewportTransformConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Panning,
}
