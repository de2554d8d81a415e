//! numbus: headless chart-authoring engine.
//!
//! Composes a vector template with data-driven scatter/line plots, and
//! models the pan/zoom, selection and inline-edit state a host UI drives.
//! Scenes are plain element trees handed to a pluggable [`render::Renderer`].

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartStudio, ChartStudioConfig, ScatterRenderer, TemplateCompositor};
pub use error::{ChartError, ChartResult};
