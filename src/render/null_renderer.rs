use crate::error::ChartResult;
use crate::render::{Renderer, VisualElementNode};

/// No-op renderer used by tests and headless usage.
///
/// It still validates the scene so tests can catch non-finite geometry
/// before a real backend sees it.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_node_count: usize,
    pub render_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, scene: &VisualElementNode) -> ChartResult<()> {
        scene.validate()?;
        self.last_node_count = scene.node_count();
        self.render_count += 1;
        Ok(())
    }
}
