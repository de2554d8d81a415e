use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{PlotArea, Rect};
use crate::error::{ChartError, ChartResult};
use crate::render::{AttrValue, ElementKind, ElementPath, VisualElementNode};

use super::point_hover::{HOVER_MARKER_RADIUS, hit_test_marker, hover_enter, hover_leave};
use super::series_renderer::{DATA_GROUP_ID, ScatterRenderer, TOOLTIP_GROUP_ID};
use super::template::Template;

pub const PLOT_AREA_ID: &str = "plot-area";
pub const X_AXIS_LABEL_ID: &str = "x-axis-label";
pub const Y_AXIS_LABEL_ID: &str = "y-axis-label";
pub const CHART_TITLE_ID: &str = "chart-title";

const EDIT_OVERLAY_WIDTH: f64 = 400.0;
const DEFAULT_FONT_SIZE: f64 = 16.0;
const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";

/// Highlighted element and the overlay rectangle drawn around it, in
/// content coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub path: ElementPath,
    pub bounds: Rect,
}

/// Inline text editor placed over the element being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditOverlay {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: String,
    pub color: Option<String>,
    /// Current editor contents.
    pub text: String,
}

impl EditOverlay {
    fn for_text(node: &VisualElementNode) -> Self {
        let font_size = node.attr_f64("font-size").unwrap_or(DEFAULT_FONT_SIZE);
        let text_attr = |name: &str| node.attr(name).map(ToString::to_string);
        Self {
            x: node.attr_f64("x").unwrap_or(0.0) - EDIT_OVERLAY_WIDTH / 2.0,
            y: node.attr_f64("y").unwrap_or(0.0) - font_size,
            width: EDIT_OVERLAY_WIDTH,
            height: font_size * 2.0,
            font_size,
            font_family: text_attr("font-family").unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_owned()),
            font_weight: text_attr("font-weight").unwrap_or_else(|| "normal".to_owned()),
            color: text_attr("fill"),
            text: node.text().to_owned(),
        }
    }

    /// `foreignObject` node hosting the editor.
    #[must_use]
    pub fn to_node(&self) -> VisualElementNode {
        let mut style = format!(
            "font-size: {}px; font-family: {}; font-weight: {}; text-align: center;",
            self.font_size, self.font_family, self.font_weight
        );
        if let Some(color) = &self.color {
            style.push_str(&format!(" color: {color};"));
        }
        VisualElementNode::new(ElementKind::ForeignObject)
            .with_class("edit-overlay")
            .with_attr("x", self.x)
            .with_attr("y", self.y)
            .with_attr("width", self.width)
            .with_attr("height", self.height)
            .with_attr("style", style)
            .with_text(self.text.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditKey {
    Enter,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditOutcome {
    /// Text now shown on the edited element.
    Committed(String),
    Cancelled,
    /// No edit was active.
    Inactive,
}

#[derive(Debug, Clone, PartialEq)]
struct EditSession {
    path: ElementPath,
    original_text: String,
    previous_opacity: Option<AttrValue>,
    overlay: EditOverlay,
}

/// Composes the template background with the data layer and owns the
/// selection, inline-edit and hover state of the composed scene.
#[derive(Debug, Clone, Default)]
pub struct TemplateCompositor {
    template: Option<Template>,
    renderer: ScatterRenderer,
    scene: Option<VisualElementNode>,
    selection: Option<Selection>,
    edit: Option<EditSession>,
    hovered_marker: Option<usize>,
}

impl TemplateCompositor {
    #[must_use]
    pub fn new(renderer: ScatterRenderer) -> Self {
        Self {
            renderer,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    /// Stores `template` for the next [`Self::render_template`].
    pub fn set_template(&mut self, template: Template) {
        self.template = Some(template);
    }

    #[must_use]
    pub fn renderer(&self) -> &ScatterRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut ScatterRenderer {
        &mut self.renderer
    }

    #[must_use]
    pub fn scene(&self) -> Option<&VisualElementNode> {
        self.scene.as_ref()
    }

    /// Scene plus the edit overlay while an edit is active.
    #[must_use]
    pub fn composed_scene(&self) -> Option<Cow<'_, VisualElementNode>> {
        let scene = self.scene.as_ref()?;
        Some(match &self.edit {
            Some(session) => {
                let mut composed = scene.clone();
                composed.children.push(session.overlay.to_node());
                Cow::Owned(composed)
            }
            None => Cow::Borrowed(scene),
        })
    }

    /// Rebuilds the scene from the stored template, dropping any data layer,
    /// selection, edit and hover state.
    pub fn render_template(&mut self) -> ChartResult<()> {
        let Some(template) = &self.template else {
            warn!("no template loaded yet");
            return Err(ChartError::TemplateNotLoaded);
        };

        let root = template.to_root_node();
        debug!(elements = root.children.len(), "rendered template");
        self.scene = Some(root);
        self.selection = None;
        self.edit = None;
        self.hovered_marker = None;
        Ok(())
    }

    /// Replaces the data and tooltip groups with a fresh render into the
    /// template's `rect#plot-area` and refreshes the axis labels.
    ///
    /// On error the scene is left untouched.
    pub fn render_data(&mut self) -> ChartResult<()> {
        let Some(scene) = &self.scene else {
            warn!("render_data called before a template was rendered");
            return Err(ChartError::TemplateNotLoaded);
        };
        let plot_area = read_plot_area(scene).inspect_err(|err| {
            warn!(error = %err, "cannot render data without a plot area");
        })?;
        let layer = self.renderer.render_data(plot_area)?;

        self.commit_edit();
        self.selection = None;
        self.hovered_marker = None;

        let labels = self.renderer.axis_labels();
        let Some(scene) = self.scene.as_mut() else {
            return Err(ChartError::TemplateNotLoaded);
        };
        scene.remove_by_id(DATA_GROUP_ID);
        scene.remove_by_id(TOOLTIP_GROUP_ID);
        if let Some(x_label) = labels.x {
            set_text(scene, X_AXIS_LABEL_ID, x_label);
        }
        if let Some(y_label) = labels.y {
            set_text(scene, Y_AXIS_LABEL_ID, y_label);
        }
        scene.children.push(layer.data);
        scene.children.push(layer.tooltip);
        Ok(())
    }

    /// Sets the text of the element with `id`. Returns `false` when absent.
    pub fn set_text_by_id(&mut self, id: &str, text: impl Into<String>) -> bool {
        self.scene
            .as_mut()
            .is_some_and(|scene| set_text(scene, id, text.into()))
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Selects the element at `path`, replacing any previous selection.
    /// The root path clears the selection instead.
    pub fn select(&mut self, path: &[usize]) -> ChartResult<Option<&Selection>> {
        self.clear_selection();
        if path.is_empty() {
            return Ok(None);
        }

        let scene = self.scene.as_ref().ok_or(ChartError::TemplateNotLoaded)?;
        if scene.node_at(path).is_none() {
            return Err(ChartError::ElementNotFound(format!("{path:?}")));
        }
        let bounds = absolute_bounds(scene, path).ok_or_else(|| {
            ChartError::InvalidData(format!("element at {path:?} has no measurable bounds"))
        })?;

        debug!(?path, "selected element");
        self.selection = Some(Selection {
            path: path.to_vec(),
            bounds,
        });
        Ok(self.selection.as_ref())
    }

    pub fn select_by_id(&mut self, id: &str) -> ChartResult<Option<&Selection>> {
        let path = self
            .scene
            .as_ref()
            .ok_or(ChartError::TemplateNotLoaded)?
            .path_of_id(id)
            .ok_or_else(|| ChartError::ElementNotFound(id.to_owned()))?;
        self.select(&path)
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    #[must_use]
    pub fn edit_overlay(&self) -> Option<&EditOverlay> {
        self.edit.as_ref().map(|session| &session.overlay)
    }

    /// Starts editing the `text` element at `path`, committing any edit in
    /// progress first. The element is hidden until the edit ends.
    pub fn begin_edit(&mut self, path: &[usize]) -> ChartResult<EditOverlay> {
        let scene = self.scene.as_ref().ok_or(ChartError::TemplateNotLoaded)?;
        let target = scene
            .node_at(path)
            .ok_or_else(|| ChartError::ElementNotFound(format!("{path:?}")))?;
        if target.kind != ElementKind::Text {
            return Err(ChartError::InvalidData(format!(
                "only text elements are editable, got <{}>",
                target.kind.tag()
            )));
        }

        self.commit_edit();

        let node = self
            .scene
            .as_mut()
            .and_then(|scene| scene.node_at_mut(path))
            .ok_or_else(|| ChartError::ElementNotFound(format!("{path:?}")))?;
        let overlay = EditOverlay::for_text(node);
        let previous_opacity = node.attr("opacity").cloned();
        node.set_attr("opacity", "0");

        debug!(?path, text = %overlay.text, "begin text edit");
        self.edit = Some(EditSession {
            path: path.to_vec(),
            original_text: overlay.text.clone(),
            previous_opacity,
            overlay: overlay.clone(),
        });
        Ok(overlay)
    }

    pub fn begin_edit_by_id(&mut self, id: &str) -> ChartResult<EditOverlay> {
        let path = self
            .scene
            .as_ref()
            .ok_or(ChartError::TemplateNotLoaded)?
            .path_of_id(id)
            .ok_or_else(|| ChartError::ElementNotFound(id.to_owned()))?;
        self.begin_edit(&path)
    }

    /// Replaces the editor contents. Returns `false` when no edit is active.
    pub fn set_edit_text(&mut self, text: impl Into<String>) -> bool {
        match &mut self.edit {
            Some(session) => {
                session.overlay.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Applies the trimmed editor text; an empty result keeps the pre-edit
    /// text.
    pub fn commit_edit(&mut self) -> EditOutcome {
        let Some(session) = self.edit.take() else {
            return EditOutcome::Inactive;
        };

        let trimmed = session.overlay.text.trim();
        let text = if trimmed.is_empty() {
            session.original_text
        } else {
            trimmed.to_owned()
        };
        if let Some(node) = self
            .scene
            .as_mut()
            .and_then(|scene| scene.node_at_mut(&session.path))
        {
            node.text_content = Some(text.clone());
            restore_opacity(node, session.previous_opacity);
        }
        debug!(text = %text, "committed text edit");
        EditOutcome::Committed(text)
    }

    /// Ends the edit without touching the element text.
    pub fn cancel_edit(&mut self) -> EditOutcome {
        let Some(session) = self.edit.take() else {
            return EditOutcome::Inactive;
        };
        if let Some(node) = self
            .scene
            .as_mut()
            .and_then(|scene| scene.node_at_mut(&session.path))
        {
            restore_opacity(node, session.previous_opacity);
        }
        EditOutcome::Cancelled
    }

    /// Enter commits, Escape discards.
    pub fn handle_edit_key(&mut self, key: EditKey) -> EditOutcome {
        match key {
            EditKey::Enter => self.commit_edit(),
            EditKey::Escape => self.cancel_edit(),
        }
    }

    /// Focus left the editor: commits.
    pub fn blur_edit(&mut self) -> EditOutcome {
        self.commit_edit()
    }

    #[must_use]
    pub fn hovered_marker(&self) -> Option<usize> {
        self.hovered_marker
    }

    /// Updates marker hover for a pointer at content coordinates `(x, y)`.
    ///
    /// Returns the index of the hovered marker among the data group's
    /// children.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<usize> {
        let hit = {
            let scene = self.scene.as_ref()?;
            let data = scene.find_by_id(DATA_GROUP_ID)?;
            let (tx, ty) = data.translation();
            hit_test_marker(data, x - tx, y - ty, HOVER_MARKER_RADIUS)
        };
        if hit != self.hovered_marker {
            self.set_hovered_marker(hit);
        }
        hit
    }

    pub fn pointer_leave(&mut self) {
        self.set_hovered_marker(None);
    }

    fn set_hovered_marker(&mut self, next: Option<usize>) {
        let previous = std::mem::replace(&mut self.hovered_marker, next);
        let Some((data, tooltip)) = self.scene.as_mut().and_then(data_and_tooltip_mut) else {
            return;
        };
        if let Some(marker) = previous.and_then(|index| data.children.get_mut(index)) {
            hover_leave(marker, tooltip);
        }
        if let Some(marker) = next.and_then(|index| data.children.get_mut(index)) {
            hover_enter(marker, tooltip);
        }
    }
}

fn read_plot_area(scene: &VisualElementNode) -> ChartResult<PlotArea> {
    let node = scene
        .find_by_id(PLOT_AREA_ID)
        .ok_or_else(|| ChartError::ElementNotFound(PLOT_AREA_ID.to_owned()))?;
    let read = |name: &str| {
        node.attr_f64(name).ok_or_else(|| {
            let message = format!("`{PLOT_AREA_ID}` attribute `{name}` is not numeric");
            ChartError::InvalidTemplate(message)
        })
    };
    Ok(Rect::new(read("x")?, read("y")?, read("width")?, read("height")?))
}

fn set_text(scene: &mut VisualElementNode, id: &str, text: String) -> bool {
    match scene.find_by_id_mut(id) {
        Some(node) => {
            node.text_content = Some(text);
            true
        }
        None => false,
    }
}

fn restore_opacity(node: &mut VisualElementNode, previous: Option<AttrValue>) {
    match previous {
        Some(value) => node.set_attr("opacity", value),
        None => {
            node.attributes.shift_remove("opacity");
        }
    }
}

/// Bounds of the node at `path` with every ancestor translation applied.
fn absolute_bounds(root: &VisualElementNode, path: &[usize]) -> Option<Rect> {
    let mut node = root;
    let (mut dx, mut dy) = (0.0, 0.0);
    for &index in path {
        let (tx, ty) = node.translation();
        dx += tx;
        dy += ty;
        node = node.children.get(index)?;
    }
    let local = node.local_bounds()?;
    Some(Rect::new(local.x + dx, local.y + dy, local.width, local.height))
}

fn data_and_tooltip_mut(
    scene: &mut VisualElementNode,
) -> Option<(&mut VisualElementNode, &mut VisualElementNode)> {
    let position = |id: &str| {
        scene
            .children
            .iter()
            .position(|child| child.element_id() == Some(id))
    };
    let data = position(DATA_GROUP_ID)?;
    let tooltip = position(TOOLTIP_GROUP_ID)?;

    if data < tooltip {
        let (head, tail) = scene.children.split_at_mut(tooltip);
        Some((&mut head[data], &mut tail[0]))
    } else {
        let (head, tail) = scene.children.split_at_mut(data);
        Some((&mut tail[0], &mut head[tooltip]))
    }
}
