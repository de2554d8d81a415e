use std::fmt::Write as _;

use tracing::debug;

use crate::error::ChartResult;
use crate::render::{ElementKind, Renderer, VisualElementNode};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Materializes scenes as SVG markup, keeping the latest document.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    markup: String,
}

impl SvgRenderer {
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    #[must_use]
    pub fn into_markup(self) -> String {
        self.markup
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, scene: &VisualElementNode) -> ChartResult<()> {
        scene.validate()?;
        self.markup = to_svg_markup(scene);
        debug!(bytes = self.markup.len(), "rendered svg markup");
        Ok(())
    }
}

/// Serializes `node` and its subtree.
///
/// Attributes are written in insertion order, followed by `id` and `class`.
/// A root `svg` element gets the SVG namespace.
#[must_use]
pub fn to_svg_markup(node: &VisualElementNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node, true);
    out
}

fn write_node(out: &mut String, node: &VisualElementNode, is_root: bool) {
    let tag = node.kind.tag();
    out.push('<');
    out.push_str(tag);

    if is_root && node.kind == ElementKind::Svg && !node.attributes.contains_key("xmlns") {
        let _ = write!(out, " xmlns=\"{SVG_NAMESPACE}\"");
    }
    for (name, value) in &node.attributes {
        if name == "id" && node.id.is_some() {
            continue;
        }
        let _ = write!(out, " {name}=\"{}\"", escape(&value.to_string()));
    }
    if let Some(id) = &node.id {
        let _ = write!(out, " id=\"{}\"", escape(id));
    }
    if !node.classes.is_empty() {
        let _ = write!(out, " class=\"{}\"", escape(&node.classes.join(" ")));
    }

    let text = node.text_content.as_deref().filter(|text| !text.is_empty());
    if text.is_none() && node.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    if let Some(text) = text {
        out.push_str(&escape(text));
    }
    for child in &node.children {
        write_node(out, child, false);
    }
    let _ = write!(out, "</{tag}>");
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{SvgRenderer, to_svg_markup};
    use crate::render::{ElementKind, Renderer, VisualElementNode};

    #[test]
    fn markup_keeps_attribute_order_and_escapes_text() {
        let scene = VisualElementNode::new(ElementKind::Svg)
            .with_attr("width", 400.0)
            .with_child(
                VisualElementNode::new(ElementKind::Text)
                    .with_id("chart-title")
                    .with_attr("x", 200.0)
                    .with_attr("y", 20.5)
                    .with_text("a < b & c"),
            )
            .with_child(VisualElementNode::new(ElementKind::Circle).with_class("data-point"));

        assert_eq!(
            to_svg_markup(&scene),
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"400\">\
             <text x=\"200\" y=\"20.5\" id=\"chart-title\">a &lt; b &amp; c</text>\
             <circle class=\"data-point\"/></svg>"
        );
    }

    #[test]
    fn renderer_rejects_invalid_scene_and_keeps_previous_markup() {
        let mut renderer = SvgRenderer::default();
        let good = VisualElementNode::new(ElementKind::Svg);
        renderer.render(&good).expect("render");
        let before = renderer.markup().to_owned();

        let bad = VisualElementNode::new(ElementKind::Svg).with_attr("width", f64::INFINITY);
        assert!(renderer.render(&bad).is_err());
        assert_eq!(renderer.markup(), before);
    }
}
