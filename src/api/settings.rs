use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{AxisConfig, GridStyle, ScaleKind};
use crate::error::{ChartError, ChartResult};

/// Delay between the last numeric settings edit and the re-render.
pub const SETTINGS_DEBOUNCE: Duration = Duration::from_millis(500);

/// Smallest grid/tick frequency accepted from the settings surface.
pub const MIN_FREQUENCY: usize = 2;

/// User-facing axis settings; one value per settings control.
///
/// `None` bounds mean auto. `grid_frequency` drives every grid and tick
/// frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSettings {
    pub x_scale: ScaleKind,
    pub y_scale: ScaleKind,
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub grid_enabled: bool,
    pub ticks_enabled: bool,
    pub grid_style: GridStyle,
    pub grid_color: String,
    pub grid_frequency: usize,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self::from_config(&AxisConfig::default())
    }
}

impl AxisSettings {
    /// Settings mirroring `config`; frequency is taken from the X grid.
    #[must_use]
    pub fn from_config(config: &AxisConfig) -> Self {
        Self {
            x_scale: config.x_scale,
            y_scale: config.y_scale,
            x_min: config.x_min,
            x_max: config.x_max,
            y_min: config.y_min,
            y_max: config.y_max,
            grid_enabled: config.grid_enabled,
            ticks_enabled: config.ticks_enabled,
            grid_style: config.grid_style,
            grid_color: config.grid_color.clone(),
            grid_frequency: config.x_grid_frequency,
        }
    }

    /// Uses `scale` for both axes.
    #[must_use]
    pub fn with_shared_scale(mut self, scale: ScaleKind) -> Self {
        self.x_scale = scale;
        self.y_scale = scale;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.grid_frequency < MIN_FREQUENCY {
            return Err(ChartError::InvalidData(format!(
                "grid frequency must be >= {MIN_FREQUENCY}, got {}",
                self.grid_frequency
            )));
        }
        for (name, bound) in [
            ("x_min", self.x_min),
            ("x_max", self.x_max),
            ("y_min", self.y_min),
            ("y_max", self.y_max),
        ] {
            if bound.is_some_and(|value| !value.is_finite()) {
                return Err(ChartError::InvalidData(format!("{name} must be finite")));
            }
        }
        Ok(())
    }

    /// Writes every setting into `config`. Invalid settings leave `config`
    /// untouched.
    pub fn apply_to(&self, config: &mut AxisConfig) -> ChartResult<()> {
        self.validate()?;
        config.x_scale = self.x_scale;
        config.y_scale = self.y_scale;
        config.x_min = self.x_min;
        config.x_max = self.x_max;
        config.y_min = self.y_min;
        config.y_max = self.y_max;
        config.grid_enabled = self.grid_enabled;
        config.ticks_enabled = self.ticks_enabled;
        config.grid_style = self.grid_style;
        config.grid_color.clone_from(&self.grid_color);
        config.set_all_frequencies(self.grid_frequency);
        Ok(())
    }
}

/// Single-slot debounce for settings edits that arrive while the user is
/// still typing.
///
/// Scheduling replaces whatever is pending and restarts the delay, so only
/// the latest settings are ever released.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDebouncer {
    delay: Duration,
    pending: Option<(Instant, AxisSettings)>,
}

impl Default for SettingsDebouncer {
    fn default() -> Self {
        Self::new(SETTINGS_DEBOUNCE)
    }
}

impl SettingsDebouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, settings: AxisSettings, now: Instant) {
        if self.pending.is_some() {
            trace!("replacing pending axis settings");
        }
        self.pending = Some((now + self.delay, settings));
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Releases the pending settings once `now` reaches the deadline.
    pub fn poll(&mut self, now: Instant) -> Option<AxisSettings> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => self.pending.take().map(|(_, s)| s),
            _ => None,
        }
    }

    /// Drops pending settings without applying them.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}
