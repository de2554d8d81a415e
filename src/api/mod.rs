mod compositor;
mod loader;
mod point_hover;
mod series_renderer;
mod settings;
mod studio;
mod studio_snapshot;
mod template;

pub use compositor::{
    CHART_TITLE_ID, EditKey, EditOutcome, EditOverlay, PLOT_AREA_ID, Selection,
    TemplateCompositor, X_AXIS_LABEL_ID, Y_AXIS_LABEL_ID,
};
pub use loader::{CsvContent, EnvelopeLoader, FileLoader, LoadSequencer, LoadTicket, LoadedFile};
pub use point_hover::{
    HOVER_MARKER_RADIUS, TOOLTIP_OFFSET_Y, hit_test_marker, hover_enter, hover_leave,
};
pub use series_renderer::{
    AxisLabels, DATA_GROUP_ID, DATA_POINT_CLASS, DEFAULT_PALETTE, DataLayer, GRID_GROUP_ID,
    MARKER_RADIUS, ScatterRenderer, TICK_GROUP_ID, TOOLTIP_GROUP_ID, TOOLTIP_TEXT_ID,
};
pub use settings::{AxisSettings, MIN_FREQUENCY, SETTINGS_DEBOUNCE, SettingsDebouncer};
pub use studio::{ChartStudio, ChartStudioConfig};
pub use studio_snapshot::{
    STUDIO_SNAPSHOT_JSON_SCHEMA_V1, StudioSnapshot, StudioSnapshotJsonContractV1,
};
pub use template::{Template, TemplateSvg, ViewBox};
