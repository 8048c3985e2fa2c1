//! Vector shape made of one or more styled paths.

use super::ElementTrait;
use crate::geometry::{Bounds, ViewBox};
use crate::id::ElementId;
use serde::{Deserialize, Serialize};

/// Stroke applied to a path outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// CSS hex color, e.g. `#000000`.
    pub color: String,
    pub weight: f64,
    /// SVG dash pattern, e.g. `"5,5"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dasharray: Option<String>,
}

impl Stroke {
    pub const DEFAULT_COLOR: &'static str = "#000000";
    pub const DEFAULT_WEIGHT: f64 = 4.0;

    pub fn new(color: impl Into<String>, weight: f64) -> Self {
        Self {
            color: color.into(),
            weight,
            dasharray: None,
        }
    }

    pub fn with_dasharray(mut self, dasharray: impl Into<String>) -> Self {
        self.dasharray = Some(dasharray.into());
        self
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COLOR, Self::DEFAULT_WEIGHT)
    }
}

/// Interior fill of a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub color: String,
}

impl Fill {
    /// Fill injected when a shape would otherwise be invisible.
    pub const FALLBACK_COLOR: &'static str = "#f8f9fa";

    pub fn new(color: impl Into<String>) -> Self {
        Self { color: color.into() }
    }
}

/// One drawing command string with its optional stroke and fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// SVG path data in view box coordinates.
    pub d: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
}

impl Path {
    pub fn new(d: impl Into<String>) -> Self {
        Self {
            d: d.into(),
            stroke: None,
            fill: None,
        }
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Check if the path would draw nothing.
    pub fn is_invisible(&self) -> bool {
        self.stroke.is_none() && self.fill.is_none()
    }
}

/// A vector shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub(crate) id: ElementId,
    pub bounds: Bounds,
    /// Overall transparency in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<f64>,
    pub paths: Vec<Path>,
    #[serde(default)]
    pub view_box: ViewBox,
    /// Last active stroke, restored when stroke is re-enabled. Never rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remembered_stroke: Option<Stroke>,
    /// Last active fill, restored when fill is re-enabled. Never rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remembered_fill: Option<Fill>,
}

impl Shape {
    /// Create a new shape with a fresh id.
    pub fn new(bounds: Bounds, paths: Vec<Path>, view_box: ViewBox) -> Self {
        Self {
            id: ElementId::new(),
            bounds,
            transparency: None,
            paths,
            view_box,
            remembered_stroke: None,
            remembered_fill: None,
        }
    }

    /// Rectangle outline filling the whole view box.
    pub fn rectangle(bounds: Bounds) -> Self {
        let view_box = ViewBox::default();
        let d = format!(
            "M {x0} {y0} H {x1} V {y1} H {x0} Z",
            x0 = view_box.min_x,
            y0 = view_box.min_y,
            x1 = view_box.min_x + view_box.width,
            y1 = view_box.min_y + view_box.height,
        );
        Self::new(bounds, vec![Path::new(d).with_stroke(Stroke::default())], view_box)
    }

    pub fn with_transparency(mut self, transparency: f64) -> Self {
        self.transparency = Some(transparency);
        self
    }

    /// Stroke of the first path, which stands for the whole shape.
    pub fn stroke(&self) -> Option<&Stroke> {
        self.paths.first().and_then(|p| p.stroke.as_ref())
    }

    /// Fill of the first path, which stands for the whole shape.
    pub fn fill(&self) -> Option<&Fill> {
        self.paths.first().and_then(|p| p.fill.as_ref())
    }
}

impl ElementTrait for Shape {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn set_id(&mut self, id: ElementId) {
        self.id = id;
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }
}
