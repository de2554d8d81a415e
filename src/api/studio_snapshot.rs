use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::AxisConfig;
use crate::error::{ChartError, ChartResult};
use crate::interaction::{ViewportState, ViewportTransform};
use crate::render::VisualElementNode;

use super::compositor::{Selection, TemplateCompositor};

pub const STUDIO_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Serializable state export used by regression tests and debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioSnapshot {
    pub viewport: ViewportState,
    pub zoom_percent: i64,
    pub axis_config: AxisConfig,
    /// Series label → curve color, in series order.
    pub series_colors: IndexMap<String, String>,
    pub selection: Option<Selection>,
    pub editing: bool,
    pub scene: Option<VisualElementNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: StudioSnapshot,
}

impl StudioSnapshot {
    #[must_use]
    pub fn capture(compositor: &TemplateCompositor, viewport: &ViewportTransform) -> Self {
        let renderer = compositor.renderer();
        let series_colors = (0..renderer.data().y_series_count())
            .map(|index| {
                (
                    renderer.data().series_label(index),
                    renderer.series_color(index).to_owned(),
                )
            })
            .collect();

        Self {
            viewport: viewport.state(),
            zoom_percent: viewport.zoom_percent(),
            axis_config: renderer.axis_config().clone(),
            series_colors,
            selection: compositor.selection().cloned(),
            editing: compositor.is_editing(),
            scene: compositor.scene().cloned(),
        }
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = StudioSnapshotJsonContractV1 {
            schema_version: STUDIO_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<StudioSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: StudioSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != STUDIO_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}
