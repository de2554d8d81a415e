use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ChartError, ChartResult};

use super::template::Template;

/// Parsed CSV content: one header per column, cells kept as raw strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CsvContent {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub cols: Vec<Vec<String>>,
}

/// Result of decoding one uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum LoadedFile {
    Json(Template),
    Csv(CsvContent),
}

/// Decodes uploaded files. Implementations own the CSV/JSON parsing.
///
/// Failures should be reported as [`ChartError::LoadFailed`].
pub trait FileLoader {
    fn load(&mut self, bytes: &[u8], declared_type: &str) -> ChartResult<LoadedFile>;
}

/// Loader that accepts files already encoded as a [`LoadedFile`] JSON
/// envelope (`{"type": "csv", "content": {...}}`).
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvelopeLoader;

impl FileLoader for EnvelopeLoader {
    fn load(&mut self, bytes: &[u8], declared_type: &str) -> ChartResult<LoadedFile> {
        serde_json::from_slice(bytes).map_err(|err| {
            ChartError::LoadFailed(format!("cannot decode {declared_type} envelope: {err}"))
        })
    }
}

/// Handle for one in-flight load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LoadTicket(pub u64);

/// Orders asynchronous load completions.
///
/// Each started load gets a strictly increasing ticket. Completing anything
/// but the newest ticket is rejected, so a slow earlier load can never
/// overwrite newer data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSequencer {
    latest: u64,
}

impl LoadSequencer {
    pub fn begin(&mut self) -> LoadTicket {
        self.latest += 1;
        debug!(ticket = self.latest, "load started");
        LoadTicket(self.latest)
    }

    #[must_use]
    pub fn latest(&self) -> Option<LoadTicket> {
        (self.latest > 0).then_some(LoadTicket(self.latest))
    }

    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Accepts `ticket` if it is still the newest one.
    pub fn check(&self, ticket: LoadTicket) -> ChartResult<()> {
        if self.is_current(ticket) {
            return Ok(());
        }
        warn!(ticket = ticket.0, latest = self.latest, "discarding stale load result");
        Err(ChartError::StaleLoad {
            ticket: ticket.0,
            latest: self.latest,
        })
    }
}
