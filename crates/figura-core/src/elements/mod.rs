//! Element definitions for the document.

mod image;
mod shape;
mod text;

pub use image::{Image, ImageFormat};
pub use shape::{Fill, Path, Shape, Stroke};
pub use text::{FontWeight, Text};

use crate::document::ElementKind;
use crate::geometry::Bounds;
use crate::id::ElementId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Common trait for every element kind.
pub trait ElementTrait {
    /// Get the unique identifier.
    fn id(&self) -> &ElementId;

    /// Replace the identifier (used when duplicating).
    fn set_id(&mut self, id: ElementId);

    /// Get the bounding box in document coordinates.
    fn bounds(&self) -> Bounds;

    /// Replace the bounding box.
    fn set_bounds(&mut self, bounds: Bounds);

    /// Check if a point (in document coordinates) hits this element.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().contains(point, tolerance)
    }
}

/// Tagged union over every element kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Shape(Shape),
    Text(Text),
    Image(Image),
}

impl Element {
    pub fn id(&self) -> &ElementId {
        match self {
            Element::Shape(s) => s.id(),
            Element::Text(t) => t.id(),
            Element::Image(i) => i.id(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            Element::Shape(s) => s.bounds(),
            Element::Text(t) => t.bounds(),
            Element::Image(i) => i.bounds(),
        }
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        match self {
            Element::Shape(s) => s.set_bounds(bounds),
            Element::Text(t) => t.set_bounds(bounds),
            Element::Image(i) => i.set_bounds(bounds),
        }
    }

    /// Which document collection this element belongs in.
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Shape(_) => ElementKind::Shape,
            Element::Text(_) => ElementKind::Text,
            Element::Image(_) => ElementKind::Image,
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Element::Shape(s) => s.hit_test(point, tolerance),
            Element::Text(t) => t.hit_test(point, tolerance),
            Element::Image(i) => i.hit_test(point, tolerance),
        }
    }

    /// Give the element a fresh unique identifier.
    pub fn regenerate_id(&mut self) {
        let id = ElementId::new();
        match self {
            Element::Shape(s) => s.set_id(id),
            Element::Text(t) => t.set_id(id),
            Element::Image(i) => i.set_id(id),
        }
    }

    pub fn as_shape(&self) -> Option<&Shape> {
        match self {
            Element::Shape(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Element::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Element::Image(i) => Some(i),
            _ => None,
        }
    }
}

impl From<Shape> for Element {
    fn from(shape: Shape) -> Self {
        Element::Shape(shape)
    }
}

impl From<Text> for Element {
    fn from(text: Text) -> Self {
        Element::Text(text)
    }
}

impl From<Image> for Element {
    fn from(image: Image) -> Self {
        Element::Image(image)
    }
}
