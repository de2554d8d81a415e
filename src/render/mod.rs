mod element;
mod null_renderer;
mod svg_renderer;

pub use element::{AttrValue, ClassList, ElementKind, ElementPath, VisualElementNode};
pub use null_renderer::NullRenderer;
pub use svg_renderer::{SvgRenderer, to_svg_markup};

use crate::error::ChartResult;

/// Contract implemented by any element-tree materializer.
///
/// Backends receive the complete scene rebuilt for this pass, so drawing code
/// stays isolated from chart domain and interaction logic.
pub trait Renderer {
    fn render(&mut self, scene: &VisualElementNode) -> ChartResult<()>;
}
