use serde::{Deserialize, Serialize};

use crate::core::Size;
use crate::core::tick_format::format_plain;
use crate::error::{ChartError, ChartResult};
use crate::render::{ElementKind, VisualElementNode};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// `"x y width height"` attribute value.
    #[must_use]
    pub fn attribute(self) -> String {
        format!(
            "{} {} {} {}",
            format_plain(self.x),
            format_plain(self.y),
            format_plain(self.width),
            format_plain(self.height)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSvg {
    #[serde(rename = "viewBox")]
    pub view_box: ViewBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub elements: Vec<VisualElementNode>,
}

/// Static background graphic the data layer is composed onto.
///
/// Templates are expected to carry a `rect#plot-area` marking the data
/// window and may carry `#x-axis-label`, `#y-axis-label` and `#chart-title`
/// text elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub svg: TemplateSvg,
}

impl Template {
    pub fn from_json_str(json: &str) -> ChartResult<Self> {
        let template: Self =
            serde_json::from_str(json).map_err(|err| ChartError::InvalidTemplate(err.to_string()))?;
        template.validate()?;
        Ok(template)
    }

    pub fn validate(&self) -> ChartResult<()> {
        let view_box = self.svg.view_box;
        if !view_box.x.is_finite() || !view_box.y.is_finite() || !self.content_size().is_valid() {
            return Err(ChartError::InvalidTemplate(format!(
                "viewBox must be finite with positive size, got {}",
                view_box.attribute()
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn content_size(&self) -> Size {
        Size::new(self.svg.view_box.width, self.svg.view_box.height)
    }

    /// Root `svg` node seeded with the template elements.
    #[must_use]
    pub fn to_root_node(&self) -> VisualElementNode {
        let view_box = self.svg.view_box;
        let mut root = VisualElementNode::new(ElementKind::Svg)
            .with_attr("viewBox", view_box.attribute())
            .with_attr("width", view_box.width)
            .with_attr("height", view_box.height);
        root.id = self.svg.id.clone();
        root.children = self.svg.elements.clone();
        root
    }
}

#[cfg(test)]
mod tests {
    use super::Template;
    use crate::error::ChartError;

    #[test]
    fn parses_template_and_builds_root() {
        let json = r##"{
            "svg": {
                "viewBox": {"x": 0, "y": 0, "width": 800, "height": 600},
                "id": "chart-svg",
                "elements": [
                    {"type": "rect", "id": "plot-area",
                     "attributes": {"x": 80, "y": 60, "width": 640, "height": 440}}
                ]
            }
        }"##;
        let template = Template::from_json_str(json).expect("parse");
        let root = template.to_root_node();
        assert_eq!(root.element_id(), Some("chart-svg"));
        assert_eq!(
            root.attr("viewBox").and_then(|v| v.as_str()),
            Some("0 0 800 600")
        );
        assert_eq!(root.find_by_id("plot-area").and_then(|n| n.attr_f64("width")), Some(640.0));
    }

    #[test]
    fn rejects_empty_view_box() {
        let json = r#"{"svg":{"viewBox":{"x":0,"y":0,"width":0,"height":10}}}"#;
        assert!(matches!(
            Template::from_json_str(json),
            Err(ChartError::InvalidTemplate(_))
        ));
    }
}
