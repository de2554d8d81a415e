use ordered_float::OrderedFloat;
use smallvec::SmallVec;
use tracing::trace;

use crate::render::{AttrValue, VisualElementNode};

use super::series_renderer::{DATA_POINT_CLASS, MARKER_RADIUS, TOOLTIP_TEXT_ID, tooltip_style};

pub const HOVER_MARKER_RADIUS: f64 = 7.0;
/// Vertical distance between a hovered marker and its tooltip baseline.
pub const TOOLTIP_OFFSET_Y: f64 = 15.0;

/// Enlarges `marker` and shows `"<series>: (<x>, <y>)"` above it.
pub fn hover_enter(marker: &mut VisualElementNode, tooltip: &mut VisualElementNode) {
    marker.set_attr("r", HOVER_MARKER_RADIUS);

    let series = attr_text(marker, "data-series");
    let x = attr_text(marker, "data-x");
    let y = attr_text(marker, "data-y");
    let cx = marker.attr("cx").cloned().unwrap_or(AttrValue::Number(0.0));
    let cy = marker.attr_f64("cy").unwrap_or(0.0);

    if let Some(text) = tooltip.find_by_id_mut(TOOLTIP_TEXT_ID) {
        text.text_content = Some(format!("{series}: ({x}, {y})"));
        text.set_attr("x", cx);
        text.set_attr("y", cy - TOOLTIP_OFFSET_Y);
    }
    tooltip.set_attr("style", tooltip_style(true));
    trace!(series = %series, "marker hover enter");
}

/// Restores the marker radius and hides the tooltip.
pub fn hover_leave(marker: &mut VisualElementNode, tooltip: &mut VisualElementNode) {
    marker.set_attr("r", MARKER_RADIUS);
    tooltip.set_attr("style", tooltip_style(false));
}

fn attr_text(node: &VisualElementNode, name: &str) -> String {
    node.attr(name).map(ToString::to_string).unwrap_or_default()
}

/// Index (among `data_group.children`) of the marker nearest to `(x, y)`,
/// in the group's local coordinates, within `pick_radius`.
///
/// Ties keep the earlier marker in document order.
#[must_use]
pub fn hit_test_marker(
    data_group: &VisualElementNode,
    x: f64,
    y: f64,
    pick_radius: f64,
) -> Option<usize> {
    let mut candidates: SmallVec<[(OrderedFloat<f64>, usize); 8]> = SmallVec::new();
    for (index, child) in data_group.children.iter().enumerate() {
        if !child.has_class(DATA_POINT_CLASS) {
            continue;
        }
        let (Some(cx), Some(cy)) = (child.attr_f64("cx"), child.attr_f64("cy")) else {
            continue;
        };
        let distance = (cx - x).hypot(cy - y);
        if distance <= pick_radius {
            candidates.push((OrderedFloat(distance), index));
        }
    }

    candidates.into_iter().min().map(|(_, index)| index)
}
