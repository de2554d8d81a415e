use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Rect;
use crate::core::tick_format::format_plain;
use crate::error::{ChartError, ChartResult};

/// Tag of a visual element. Unknown tags are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    Svg,
    Group,
    Line,
    Path,
    Circle,
    Rect,
    Text,
    ForeignObject,
    Other(String),
}

impl ElementKind {
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Svg => "svg",
            Self::Group => "g",
            Self::Line => "line",
            Self::Path => "path",
            Self::Circle => "circle",
            Self::Rect => "rect",
            Self::Text => "text",
            Self::ForeignObject => "foreignObject",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for ElementKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "svg" => Self::Svg,
            "g" => Self::Group,
            "line" => Self::Line,
            "path" => Self::Path,
            "circle" => Self::Circle,
            "rect" => Self::Rect,
            "text" => Self::Text,
            "foreignObject" => Self::ForeignObject,
            _ => Self::Other(tag),
        }
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Other(tag) => tag,
            other => other.tag().to_owned(),
        }
    }
}

/// Attribute value: numbers stay numeric until markup output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

impl AttrValue {
    /// Numeric view. Text values must parse completely (surrounding
    /// whitespace allowed).
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => f.write_str(&format_plain(*value)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

pub type ClassList = SmallVec<[String; 2]>;

/// Child-index path from a root node to one of its descendants.
pub type ElementPath = Vec<usize>;

/// Declarative scene node, rebuilt from scratch on every render.
///
/// The serde shape is the template element format:
/// `{"type", "id", "classes", "attributes", "textContent", "children"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualElementNode {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub classes: ClassList,
    #[serde(default)]
    pub attributes: IndexMap<String, AttrValue>,
    #[serde(
        rename = "textContent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub text_content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<VisualElementNode>,
}

impl VisualElementNode {
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            id: None,
            classes: SmallVec::new(),
            attributes: IndexMap::new(),
            text_content: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn group() -> Self {
        Self::new(ElementKind::Group)
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: VisualElementNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    #[must_use]
    pub fn attr_f64(&self, name: &str) -> Option<f64> {
        self.attr(name).and_then(AttrValue::as_f64)
    }

    /// Element id from the `id` field, falling back to an `id` attribute.
    #[must_use]
    pub fn element_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or_else(|| self.attr("id").and_then(AttrValue::as_str))
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.text_content.as_deref().unwrap_or("")
    }

    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Depth-first pre-order search by element id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Self> {
        self.path_of_id(id).and_then(|path| self.node_at(&path))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Self> {
        let path = self.path_of_id(id)?;
        self.node_at_mut(&path)
    }

    /// Path to the first node (pre-order) carrying `id`.
    #[must_use]
    pub fn path_of_id(&self, id: &str) -> Option<ElementPath> {
        if self.element_id() == Some(id) {
            return Some(Vec::new());
        }
        self.children.iter().enumerate().find_map(|(index, child)| {
            child.path_of_id(id).map(|mut path| {
                path.insert(0, index);
                path
            })
        })
    }

    /// Descendants carrying `class`, in document order.
    #[must_use]
    pub fn find_all_by_class(&self, class: &str) -> Vec<&Self> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Self>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_by_class(class, found);
        }
    }

    #[must_use]
    pub fn node_at(&self, path: &[usize]) -> Option<&Self> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Self> {
        let mut node = self;
        for &index in path {
            node = node.children.get_mut(index)?;
        }
        Some(node)
    }

    /// Removes every descendant carrying `id`. Returns how many were removed.
    pub fn remove_by_id(&mut self, id: &str) -> usize {
        let before = self.children.len();
        self.children.retain(|child| child.element_id() != Some(id));
        let mut removed = before - self.children.len();
        for child in &mut self.children {
            removed += child.remove_by_id(id);
        }
        removed
    }

    /// Rejects non-finite numeric attributes anywhere in the subtree.
    pub fn validate(&self) -> ChartResult<()> {
        for (name, value) in &self.attributes {
            if let AttrValue::Number(number) = value {
                if !number.is_finite() {
                    return Err(ChartError::InvalidData(format!(
                        "<{}> attribute `{name}` is not finite",
                        self.kind.tag()
                    )));
                }
            }
        }
        self.children.iter().try_for_each(Self::validate)
    }

    /// Approximate bounding box in the coordinate space of this node's parent.
    ///
    /// Groups and `svg` roots union their children; only `translate(..)`
    /// group transforms are honoured. Text extents are estimated from the
    /// font size.
    #[must_use]
    pub fn local_bounds(&self) -> Option<Rect> {
        match self.kind {
            ElementKind::Rect | ElementKind::ForeignObject => Some(Rect::new(
                self.attr_f64("x").unwrap_or(0.0),
                self.attr_f64("y").unwrap_or(0.0),
                self.attr_f64("width")?,
                self.attr_f64("height")?,
            )),
            ElementKind::Circle => {
                let r = self.attr_f64("r")?;
                let cx = self.attr_f64("cx").unwrap_or(0.0);
                let cy = self.attr_f64("cy").unwrap_or(0.0);
                Some(Rect::new(cx - r, cy - r, 2.0 * r, 2.0 * r))
            }
            ElementKind::Line => {
                let x1 = self.attr_f64("x1").unwrap_or(0.0);
                let y1 = self.attr_f64("y1").unwrap_or(0.0);
                let x2 = self.attr_f64("x2").unwrap_or(0.0);
                let y2 = self.attr_f64("y2").unwrap_or(0.0);
                Some(Rect::new(
                    x1.min(x2),
                    y1.min(y2),
                    (x2 - x1).abs(),
                    (y2 - y1).abs(),
                ))
            }
            ElementKind::Text => Some(self.text_bounds()),
            ElementKind::Path => {
                let d = self.attr("d")?.as_str()?;
                bounds_of_points(path_points(d))
            }
            ElementKind::Group | ElementKind::Svg | ElementKind::Other(_) => {
                let union = self
                    .children
                    .iter()
                    .filter_map(Self::local_bounds)
                    .reduce(union_rect)?;
                let (tx, ty) = self.translation();
                Some(Rect::new(union.x + tx, union.y + ty, union.width, union.height))
            }
        }
    }

    /// Offset from a `translate(x,y)` / `translate(x y)` transform attribute.
    #[must_use]
    pub fn translation(&self) -> (f64, f64) {
        let Some(transform) = self.attr("transform").and_then(AttrValue::as_str) else {
            return (0.0, 0.0);
        };
        let Some(args) = transform
            .trim()
            .strip_prefix("translate(")
            .and_then(|rest| rest.split(')').next())
        else {
            return (0.0, 0.0);
        };
        let mut values = args
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f64>().unwrap_or(0.0));
        let tx = values.next().unwrap_or(0.0);
        let ty = values.next().unwrap_or(0.0);
        (tx, ty)
    }

    fn text_bounds(&self) -> Rect {
        const CHAR_WIDTH_RATIO: f64 = 0.6;
        let font_size = self.attr_f64("font-size").unwrap_or(16.0);
        let width = self.text().chars().count() as f64 * font_size * CHAR_WIDTH_RATIO;
        let x = self.attr_f64("x").unwrap_or(0.0);
        let baseline = self.attr_f64("y").unwrap_or(0.0);
        let left = match self.attr("text-anchor").and_then(AttrValue::as_str) {
            Some("middle") => x - width / 2.0,
            Some("end") => x - width,
            _ => x,
        };
        Rect::new(left, baseline - font_size, width, font_size)
    }
}

fn union_rect(a: Rect, b: Rect) -> Rect {
    let x = a.x.min(b.x);
    let y = a.y.min(b.y);
    Rect::new(x, y, a.right().max(b.right()) - x, a.bottom().max(b.bottom()) - y)
}

fn path_points(d: &str) -> Vec<(f64, f64)> {
    let numbers: Vec<f64> = d
        .split(|c: char| c.is_ascii_alphabetic() || c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse().ok())
        .collect();
    numbers
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

fn bounds_of_points(points: Vec<(f64, f64)>) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.0, first.1, first.0, first.1);
    for &(x, y) in rest {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
}
