use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{AxisConfig, Size};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    DisplayTransform, GestureController, GestureEffect, InputBehavior, PointerButton, TouchPoint,
    ViewportState, ViewportTransform, ViewportTransformConfig, WheelInput,
};
use crate::render::{Renderer, VisualElementNode};

use super::compositor::{
    CHART_TITLE_ID, EditKey, EditOutcome, EditOverlay, Selection, TemplateCompositor,
};
use super::loader::{CsvContent, FileLoader, LoadSequencer, LoadTicket, LoadedFile};
use super::series_renderer::ScatterRenderer;
use super::settings::{AxisSettings, SettingsDebouncer};
use super::template::Template;

fn default_initial_zoom() -> f64 {
    0.7
}

/// Bootstrap configuration of a [`ChartStudio`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStudioConfig {
    pub viewport: Size,
    #[serde(default)]
    pub viewport_transform: ViewportTransformConfig,
    #[serde(default)]
    pub input_behavior: InputBehavior,
    #[serde(default)]
    pub axis: AxisConfig,
    /// Zoom applied before the first template is centered.
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: f64,
}

impl ChartStudioConfig {
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            viewport_transform: ViewportTransformConfig::default(),
            input_behavior: InputBehavior::default(),
            axis: AxisConfig::default(),
            initial_zoom: default_initial_zoom(),
        }
    }

    #[must_use]
    pub fn with_axis_config(mut self, axis: AxisConfig) -> Self {
        self.axis = axis;
        self
    }

    #[must_use]
    pub fn with_initial_zoom(mut self, zoom: f64) -> Self {
        self.initial_zoom = zoom;
        self
    }
}

/// Chart-authoring session: template + data composition, pan/zoom, selection
/// and inline editing, wired to an injected renderer and file loader.
pub struct ChartStudio<R: Renderer, L: FileLoader> {
    renderer: R,
    loader: L,
    compositor: TemplateCompositor,
    viewport: ViewportTransform,
    gestures: GestureController,
    debouncer: SettingsDebouncer,
    loads: LoadSequencer,
    centered_once: bool,
}

impl<R: Renderer, L: FileLoader> ChartStudio<R, L> {
    pub fn new(renderer: R, loader: L, config: ChartStudioConfig) -> ChartResult<Self> {
        let mut viewport = ViewportTransform::new(config.viewport_transform, config.viewport)?;
        if !config.initial_zoom.is_finite() || config.initial_zoom <= 0.0 {
            return Err(ChartError::InvalidData(
                "initial zoom must be finite and > 0".to_owned(),
            ));
        }
        viewport.set_zoom_factor(config.initial_zoom);

        Ok(Self {
            renderer,
            loader,
            compositor: TemplateCompositor::new(ScatterRenderer::new(config.axis)),
            viewport,
            gestures: GestureController::new(config.input_behavior),
            debouncer: SettingsDebouncer::default(),
            loads: LoadSequencer::default(),
            centered_once: false,
        })
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    #[must_use]
    pub fn compositor(&self) -> &TemplateCompositor {
        &self.compositor
    }

    pub fn compositor_mut(&mut self) -> &mut TemplateCompositor {
        &mut self.compositor
    }

    #[must_use]
    pub fn series_renderer(&self) -> &ScatterRenderer {
        self.compositor.renderer()
    }

    #[must_use]
    pub fn viewport_transform(&self) -> &ViewportTransform {
        &self.viewport
    }

    #[must_use]
    pub fn viewport_state(&self) -> ViewportState {
        self.viewport.state()
    }

    #[must_use]
    pub fn display_transform(&self) -> DisplayTransform {
        self.viewport.display_transform()
    }

    #[must_use]
    pub fn zoom_percent(&self) -> i64 {
        self.viewport.zoom_percent()
    }

    #[must_use]
    pub fn scene(&self) -> Option<&VisualElementNode> {
        self.compositor.scene()
    }

    pub fn set_viewport_size(&mut self, viewport: Size) -> ChartResult<()> {
        self.viewport.set_viewport_size(viewport)
    }

    /// Installs and renders `template`. The first template is centered at
    /// the initial zoom.
    pub fn load_template(&mut self, template: Template) -> ChartResult<()> {
        template.validate()?;
        let content = template.content_size();
        self.compositor.set_template(template);
        self.compositor.render_template()?;
        self.viewport.set_content_size(content)?;
        if !self.centered_once {
            self.viewport.center();
            self.centered_once = true;
        }
        Ok(())
    }

    pub fn render_data(&mut self) -> ChartResult<()> {
        self.compositor.render_data()
    }

    /// Hands the current scene (with any edit overlay) to the renderer.
    pub fn render(&mut self) -> ChartResult<()> {
        let scene = self
            .compositor
            .composed_scene()
            .ok_or(ChartError::TemplateNotLoaded)?;
        self.renderer.render(&scene)
    }

    /// Loads a file synchronously through the injected loader.
    pub fn handle_file(&mut self, bytes: &[u8], declared_type: &str) -> ChartResult<()> {
        let ticket = self.begin_load();
        let loaded = self.loader.load(bytes, declared_type);
        self.complete_load(ticket, loaded)
    }

    /// Reserves a ticket for a load that completes later.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.loads.begin()
    }

    /// Applies a finished load. Results for superseded tickets are rejected
    /// with [`ChartError::StaleLoad`] and change nothing.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        loaded: ChartResult<LoadedFile>,
    ) -> ChartResult<()> {
        self.loads.check(ticket)?;
        let loaded = loaded.inspect_err(|err| warn!(error = %err, "file processing failed"))?;

        match loaded {
            LoadedFile::Json(template) => {
                self.load_template(template)?;
                if self.compositor.renderer().has_data() {
                    self.compositor.render_data()?;
                }
            }
            LoadedFile::Csv(csv) => self.apply_csv(csv)?,
        }
        Ok(())
    }

    fn apply_csv(&mut self, csv: CsvContent) -> ChartResult<()> {
        if csv.cols.len() < 2 {
            warn!(columns = csv.cols.len(), "csv needs at least 2 columns");
            return Err(ChartError::InsufficientColumns {
                found: csv.cols.len(),
            });
        }

        self.compositor
            .renderer_mut()
            .set_data(csv.cols, csv.headers);
        if let Some(title) = self.compositor.renderer().chart_title() {
            self.compositor.set_text_by_id(CHART_TITLE_ID, title);
        }
        self.compositor.render_data()?;
        debug!("csv data loaded");
        Ok(())
    }

    pub fn zoom(&mut self, delta: f64) {
        self.compositor.clear_selection();
        self.viewport.zoom(delta);
    }

    /// Recenters at the current zoom.
    pub fn center(&mut self) {
        self.zoom(0.0);
    }

    /// 100% zoom, centered.
    pub fn reset_view(&mut self) {
        self.compositor.clear_selection();
        self.viewport.reset_view();
    }

    pub fn pointer_down(&mut self, button: PointerButton, x: f64, y: f64) -> GestureEffect {
        let effect = self.gestures.pointer_down(&mut self.viewport, button, x, y);
        self.after_gesture(effect)
    }

    /// Drag pan while a pan is active, marker hover otherwise.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> GestureEffect {
        let effect = self.gestures.pointer_move(&mut self.viewport, x, y);
        if effect == GestureEffect::Ignored {
            let (content_x, content_y) = self.content_point(x, y);
            self.compositor.pointer_move(content_x, content_y);
        }
        self.after_gesture(effect)
    }

    pub fn pointer_up(&mut self, button: PointerButton) -> GestureEffect {
        let effect = self.gestures.pointer_up(&mut self.viewport, button);
        self.after_gesture(effect)
    }

    pub fn pointer_leave(&mut self) {
        self.compositor.pointer_leave();
    }

    pub fn wheel(&mut self, input: WheelInput) -> GestureEffect {
        let effect = self.gestures.wheel(&mut self.viewport, input);
        self.after_gesture(effect)
    }

    pub fn touch_start(&mut self, touches: &[TouchPoint]) -> GestureEffect {
        let effect = self.gestures.touch_start(&mut self.viewport, touches);
        self.after_gesture(effect)
    }

    pub fn touch_move(&mut self, touches: &[TouchPoint]) -> GestureEffect {
        let effect = self.gestures.touch_move(&mut self.viewport, touches);
        self.after_gesture(effect)
    }

    pub fn touch_end(&mut self, remaining: &[TouchPoint]) -> GestureEffect {
        let effect = self.gestures.touch_end(&mut self.viewport, remaining);
        self.after_gesture(effect)
    }

    pub fn key_press(&mut self, key: &str) -> GestureEffect {
        let effect = self.gestures.key_press(&mut self.viewport, key);
        self.after_gesture(effect)
    }

    fn after_gesture(&mut self, effect: GestureEffect) -> GestureEffect {
        if effect.moved() {
            self.compositor.clear_selection();
        }
        effect
    }

    /// Viewport pixel → content (template) coordinates.
    #[must_use]
    pub fn content_point(&self, x: f64, y: f64) -> (f64, f64) {
        let state = self.viewport.state();
        ((x - state.pan.x) / state.zoom, (y - state.pan.y) / state.zoom)
    }

    /// Applies settings immediately and re-renders any loaded data.
    pub fn apply_axis_settings(&mut self, settings: &AxisSettings) -> ChartResult<()> {
        settings.apply_to(self.compositor.renderer_mut().axis_config_mut())?;
        self.rerender_data_if_loaded()
    }

    /// Queues settings behind the debounce delay, replacing pending ones.
    pub fn queue_axis_settings(&mut self, settings: AxisSettings, now: Instant) {
        self.debouncer.schedule(settings, now);
    }

    /// Applies queued settings once their delay elapsed. Returns `true` when
    /// settings were applied.
    pub fn poll_settings(&mut self, now: Instant) -> ChartResult<bool> {
        match self.debouncer.poll(now) {
            Some(settings) => {
                self.apply_axis_settings(&settings)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn set_series_color(&mut self, index: usize, color: impl Into<String>) -> ChartResult<()> {
        self.compositor
            .renderer_mut()
            .set_series_color(index, color)?;
        self.rerender_data_if_loaded()
    }

    fn rerender_data_if_loaded(&mut self) -> ChartResult<()> {
        if self.compositor.scene().is_some() && self.compositor.renderer().has_data() {
            self.compositor.render_data()?;
        }
        Ok(())
    }

    /// Click on the element at `path`; the root path clears the selection.
    pub fn click(&mut self, path: &[usize]) -> ChartResult<Option<&Selection>> {
        self.compositor.select(path)
    }

    pub fn begin_edit(&mut self, path: &[usize]) -> ChartResult<EditOverlay> {
        self.compositor.begin_edit(path)
    }

    pub fn set_edit_text(&mut self, text: impl Into<String>) -> bool {
        self.compositor.set_edit_text(text)
    }

    pub fn edit_key(&mut self, key: EditKey) -> EditOutcome {
        self.compositor.handle_edit_key(key)
    }

    pub fn blur_edit(&mut self) -> EditOutcome {
        self.compositor.blur_edit()
    }

    #[must_use]
    pub fn snapshot(&self) -> super::StudioSnapshot {
        super::StudioSnapshot::capture(&self.compositor, &self.viewport)
    }

    pub fn snapshot_json_pretty(&self) -> ChartResult<String> {
        self.snapshot().to_json_contract_v1_pretty()
    }
}
