use std::time::{Duration, Instant};

use numbus::api::{
    AxisSettings, CHART_TITLE_ID, ChartStudio, ChartStudioConfig, CsvContent, DATA_GROUP_ID,
    EnvelopeLoader, FileLoader, LoadedFile, STUDIO_SNAPSHOT_JSON_SCHEMA_V1, StudioSnapshot,
    Template, X_AXIS_LABEL_ID,
};
use numbus::core::{ScaleKind, Size};
use numbus::error::{ChartError, ChartResult};
use numbus::interaction::{GestureEffect, PointerButton, WheelInput};
use numbus::render::{ElementKind, NullRenderer, SvgRenderer};

const TEMPLATE_JSON: &str = r##"{
    "svg": {
        "viewBox": {"x": 0, "y": 0, "width": 800, "height": 600},
        "elements": [
            {"type": "rect", "id": "plot-area",
             "attributes": {"x": 100, "y": 50, "width": 600, "height": 450}},
            {"type": "text", "id": "x-axis-label",
             "attributes": {"x": 400, "y": 580}, "textContent": "X"},
            {"type": "text", "id": "y-axis-label",
             "attributes": {"x": 20, "y": 300}, "textContent": "Y"},
            {"type": "text", "id": "chart-title",
             "attributes": {"x": 400, "y": 30}, "textContent": "Title"}
        ]
    }
}"##;

fn template() -> Template {
    Template::from_json_str(TEMPLATE_JSON).expect("template")
}

fn csv(headers: &[&str], cols: &[&[&str]]) -> CsvContent {
    CsvContent {
        headers: headers.iter().map(|&h| h.to_owned()).collect(),
        cols: cols
            .iter()
            .map(|col| col.iter().map(|&cell| cell.to_owned()).collect())
            .collect(),
    }
}

fn sample_csv() -> CsvContent {
    csv(&["day", "sales"], &[&["1", "2", "3"], &["10", "20", "15"]])
}

fn studio() -> ChartStudio<NullRenderer, EnvelopeLoader> {
    ChartStudio::new(
        NullRenderer::default(),
        EnvelopeLoader,
        ChartStudioConfig::new(Size::new(1000.0, 800.0)),
    )
    .expect("studio init")
}

fn loaded_studio() -> ChartStudio<NullRenderer, EnvelopeLoader> {
    let mut studio = studio();
    studio.load_template(template()).expect("load template");
    let ticket = studio.begin_load();
    studio
        .complete_load(ticket, Ok(LoadedFile::Csv(sample_csv())))
        .expect("load csv");
    studio
}

fn text_of<'a, L: FileLoader>(studio: &'a ChartStudio<NullRenderer, L>, id: &str) -> &'a str {
    studio
        .scene()
        .and_then(|scene| scene.find_by_id(id))
        .expect("element")
        .text()
}

#[test]
fn first_template_is_centered_at_initial_zoom() {
    let mut studio = studio();
    studio.load_template(template()).expect("load template");

    assert_eq!(studio.zoom_percent(), 70);
    let pan = studio.viewport_state().pan;
    assert!((pan.x - 220.0).abs() <= 1e-9);
    assert!((pan.y - 190.0).abs() <= 1e-9);
}

#[test]
fn later_templates_keep_current_view() {
    let mut studio = studio();
    studio.load_template(template()).expect("first template");
    studio.zoom(0.5);
    let before = studio.viewport_state();

    studio.load_template(template()).expect("second template");
    assert_eq!(studio.viewport_state(), before);
}

#[test]
fn invalid_initial_zoom_is_rejected() {
    let config = ChartStudioConfig::new(Size::new(100.0, 100.0)).with_initial_zoom(0.0);
    let result = ChartStudio::new(NullRenderer::default(), EnvelopeLoader, config);
    assert!(matches!(result, Err(ChartError::InvalidData(_))));
}

#[test]
fn csv_load_renders_data_and_sets_title() {
    let studio = loaded_studio();
    assert_eq!(text_of(&studio, CHART_TITLE_ID), "day vs sales");
    assert_eq!(text_of(&studio, X_AXIS_LABEL_ID), "day");

    let data = studio
        .scene()
        .and_then(|scene| scene.find_by_id(DATA_GROUP_ID))
        .expect("data group");
    assert_eq!(data.find_all_by_class("data-point").len(), 3);
}

#[test]
fn handle_file_decodes_envelope() {
    let mut studio = studio();
    studio.load_template(template()).expect("load template");
    let bytes = br#"{"type":"csv",
        "content":{"headers":["t","v"],"cols":[["1","2","3"],["4","5","6"]]}}"#;
    studio.handle_file(bytes, "text/csv").expect("handle csv");
    assert_eq!(text_of(&studio, CHART_TITLE_ID), "t vs v");

    let err = studio
        .handle_file(b"{broken", "application/json")
        .expect_err("garbage");
    assert!(matches!(err, ChartError::LoadFailed(_)));
    assert_eq!(text_of(&studio, CHART_TITLE_ID), "t vs v");
}

#[test]
fn csv_before_template_is_kept_and_drawn_on_template_load() {
    let mut studio = studio();
    let ticket = studio.begin_load();
    let err = studio
        .complete_load(ticket, Ok(LoadedFile::Csv(sample_csv())))
        .expect_err("no template yet");
    assert!(matches!(err, ChartError::TemplateNotLoaded));
    assert!(studio.series_renderer().has_data());

    let ticket = studio.begin_load();
    studio
        .complete_load(ticket, Ok(LoadedFile::Json(template())))
        .expect("template load");
    assert!(
        studio
            .scene()
            .and_then(|scene| scene.find_by_id(DATA_GROUP_ID))
            .is_some()
    );
}

#[test]
fn single_column_csv_is_rejected() {
    let mut studio = studio();
    studio.load_template(template()).expect("load template");
    let ticket = studio.begin_load();
    let err = studio
        .complete_load(ticket, Ok(LoadedFile::Csv(csv(&["x"], &[&["1"]]))))
        .expect_err("one column");
    assert!(matches!(err, ChartError::InsufficientColumns { found: 1 }));
    assert!(!studio.series_renderer().has_data());
}

#[test]
fn stale_load_is_discarded() {
    let mut studio = studio();
    studio.load_template(template()).expect("load template");
    let slow = studio.begin_load();
    let fast = studio.begin_load();

    studio
        .complete_load(fast, Ok(LoadedFile::Csv(sample_csv())))
        .expect("fast load");
    let err = studio
        .complete_load(
            slow,
            Ok(LoadedFile::Csv(csv(&["old", "data"], &[&["1"], &["2"]]))),
        )
        .expect_err("stale");
    assert!(matches!(err, ChartError::StaleLoad { ticket: 1, latest: 2 }));
    assert_eq!(text_of(&studio, CHART_TITLE_ID), "day vs sales");
}

#[test]
fn render_hands_scene_to_renderer() {
    let mut studio = studio();
    assert!(matches!(studio.render(), Err(ChartError::TemplateNotLoaded)));

    studio.load_template(template()).expect("load template");
    studio.render().expect("render");
    assert_eq!(studio.renderer().render_count, 1);
    assert_eq!(studio.renderer().last_node_count, 5);
}

#[test]
fn svg_renderer_emits_markup_with_overlay_while_editing() {
    let mut studio = ChartStudio::new(
        SvgRenderer::default(),
        EnvelopeLoader,
        ChartStudioConfig::new(Size::new(1000.0, 800.0)),
    )
    .expect("studio init");
    studio.load_template(template()).expect("load template");
    studio.begin_edit(&[3]).expect("edit title");
    studio.render().expect("render");

    let markup = studio.renderer().markup();
    assert!(markup.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(markup.contains("<foreignObject"));
    assert!(markup.contains("opacity=\"0\""));
}

#[test]
fn viewport_changes_clear_selection() {
    let mut studio = loaded_studio();
    studio.click(&[0]).expect("select plot area");
    assert!(studio.compositor().selection().is_some());

    studio.zoom(0.2);
    assert!(studio.compositor().selection().is_none());

    studio.click(&[0]).expect("select again");
    let effect = studio.wheel(WheelInput::scroll(5.0, 5.0));
    assert_eq!(effect, GestureEffect::Panned);
    assert!(studio.compositor().selection().is_none());
}

#[test]
fn middle_drag_pans_instead_of_hovering() {
    let mut studio = loaded_studio();
    let start = studio.viewport_state().pan;

    studio.pointer_down(PointerButton::Middle, 400.0, 400.0);
    let effect = studio.pointer_move(420.0, 410.0);
    assert_eq!(effect, GestureEffect::Panned);
    let pan = studio.viewport_state().pan;
    assert!((pan.x - (start.x + 20.0)).abs() <= 1e-9);
    assert!((pan.y - (start.y + 10.0)).abs() <= 1e-9);
    studio.pointer_up(PointerButton::Middle);
    assert!(!studio.viewport_state().is_panning());
}

#[test]
fn pointer_move_hovers_marker_through_view_transform() {
    let mut studio = loaded_studio();
    let transform = studio.display_transform();
    // first marker: plot (0, 450) + plot origin (100, 50)
    let (x, y) = transform.apply(100.0, 500.0);

    assert_eq!(studio.pointer_move(x, y), GestureEffect::Ignored);
    assert_eq!(studio.compositor().hovered_marker(), Some(3));
    studio.pointer_leave();
    assert_eq!(studio.compositor().hovered_marker(), None);
}

#[test]
fn debounced_settings_apply_once_delay_elapsed() {
    let mut studio = loaded_studio();
    let start = Instant::now();
    let settings = AxisSettings::default().with_shared_scale(ScaleKind::Log);
    studio.queue_axis_settings(settings, start);

    assert!(!studio.poll_settings(start + Duration::from_millis(100)).expect("poll"));
    assert_eq!(studio.series_renderer().axis_config().y_scale, ScaleKind::Linear);

    assert!(studio.poll_settings(start + Duration::from_millis(500)).expect("poll"));
    assert_eq!(studio.series_renderer().axis_config().y_scale, ScaleKind::Log);
    assert!(!studio.poll_settings(start + Duration::from_secs(2)).expect("poll"));
}

#[test]
fn invalid_settings_leave_config_untouched() {
    let mut studio = loaded_studio();
    let before = studio.series_renderer().axis_config().clone();
    let settings = AxisSettings {
        grid_frequency: 1,
        ..AxisSettings::default()
    };
    assert!(studio.apply_axis_settings(&settings).is_err());
    assert_eq!(studio.series_renderer().axis_config(), &before);
}

#[test]
fn series_color_change_rerenders_curve() {
    let mut studio = loaded_studio();
    studio.set_series_color(0, "#123456").expect("color");

    let path = studio
        .scene()
        .and_then(|scene| scene.find_by_id(DATA_GROUP_ID))
        .and_then(|data| data.children.iter().find(|c| c.kind == ElementKind::Path))
        .expect("curve");
    assert_eq!(path.attr("stroke").and_then(|v| v.as_str()), Some("#123456"));
}

#[test]
fn inline_edit_through_studio() {
    let mut studio = loaded_studio();
    let overlay = studio.begin_edit(&[3]).expect("edit title");
    assert_eq!(overlay.text, "day vs sales");
    studio.set_edit_text("Daily sales");
    studio.blur_edit();
    assert_eq!(text_of(&studio, CHART_TITLE_ID), "Daily sales");
}

#[test]
fn snapshot_json_contract_round_trips() {
    let studio = loaded_studio();
    let json = studio.snapshot_json_pretty().expect("snapshot json");
    assert!(json.contains(&format!("\"schema_version\": {STUDIO_SNAPSHOT_JSON_SCHEMA_V1}")));

    let parsed = StudioSnapshot::from_json_compat_str(&json).expect("parse snapshot");
    assert_eq!(parsed.zoom_percent, 70);
    assert_eq!(
        parsed.series_colors.get("sales").map(String::as_str),
        Some("#4a90e2")
    );
    assert!(parsed.scene.is_some());
}

struct FailingLoader;

impl FileLoader for FailingLoader {
    fn load(&mut self, _bytes: &[u8], declared_type: &str) -> ChartResult<LoadedFile> {
        Err(ChartError::LoadFailed(format!("unsupported {declared_type}")))
    }
}

#[test]
fn custom_loader_errors_surface_unchanged() {
    let mut studio = ChartStudio::new(
        NullRenderer::default(),
        FailingLoader,
        ChartStudioConfig::new(Size::new(640.0, 480.0)),
    )
    .expect("studio init");
    let err = studio
        .handle_file(b"", "image/png")
        .expect_err("loader fails");
    assert!(matches!(err, ChartError::LoadFailed(message) if message == "unsupported image/png"));
}
