//! The document: id-keyed element collections plus canvas attributes.

use crate::elements::{Element, ElementTrait, Image, Shape, Text};
use crate::geometry::Bounds;
use crate::id::ElementId;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Document (de)serialization errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub width: f64,
    pub height: f64,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Which collection an element lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Shape,
    Text,
    Image,
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Shape => "shape",
            ElementKind::Text => "text",
            ElementKind::Image => "image",
        }
    }
}

/// Borrowed view of an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementRef<'a> {
    Shape(&'a Shape),
    Text(&'a Text),
    Image(&'a Image),
}

impl ElementRef<'_> {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementRef::Shape(_) => ElementKind::Shape,
            ElementRef::Text(_) => ElementKind::Text,
            ElementRef::Image(_) => ElementKind::Image,
        }
    }

    pub fn id(&self) -> &ElementId {
        match self {
            ElementRef::Shape(s) => s.id(),
            ElementRef::Text(t) => t.id(),
            ElementRef::Image(i) => i.id(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            ElementRef::Shape(s) => s.bounds(),
            ElementRef::Text(t) => t.bounds(),
            ElementRef::Image(i) => i.bounds(),
        }
    }

    /// Clone into an owned [`Element`].
    pub fn to_element(&self) -> Element {
        match self {
            ElementRef::Shape(s) => Element::Shape((*s).clone()),
            ElementRef::Text(t) => Element::Text((*t).clone()),
            ElementRef::Image(i) => Element::Image((*i).clone()),
        }
    }
}

/// Mutable view of an element in a [`Document`].
#[derive(Debug)]
pub enum ElementMut<'a> {
    Shape(&'a mut Shape),
    Text(&'a mut Text),
    Image(&'a mut Image),
}

impl ElementMut<'_> {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementMut::Shape(_) => ElementKind::Shape,
            ElementMut::Text(_) => ElementKind::Text,
            ElementMut::Image(_) => ElementKind::Image,
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            ElementMut::Shape(s) => s.bounds(),
            ElementMut::Text(t) => t.bounds(),
            ElementMut::Image(i) => i.bounds(),
        }
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        match self {
            ElementMut::Shape(s) => s.set_bounds(bounds),
            ElementMut::Text(t) => t.set_bounds(bounds),
            ElementMut::Image(i) => i.set_bounds(bounds),
        }
    }
}

/// A vector document.
///
/// An id appears in at most one of the three collections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub shapes: HashMap<ElementId, Shape>,
    #[serde(default)]
    pub texts: HashMap<ElementId, Text>,
    #[serde(default)]
    pub images: HashMap<ElementId, Image>,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Document {
    /// Create an empty document with the given canvas size.
    pub fn new(attributes: Attributes) -> Self {
        Self {
            attributes,
            ..Self::default()
        }
    }

    /// Find which collection holds `id`.
    pub fn kind_of(&self, id: &ElementId) -> Option<ElementKind> {
        if self.shapes.contains_key(id) {
            Some(ElementKind::Shape)
        } else if self.texts.contains_key(id) {
            Some(ElementKind::Text)
        } else if self.images.contains_key(id) {
            Some(ElementKind::Image)
        } else {
            None
        }
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.kind_of(id).is_some()
    }

    /// Get an element by id, whatever its kind.
    pub fn element(&self, id: &ElementId) -> Option<ElementRef<'_>> {
        if let Some(s) = self.shapes.get(id) {
            return Some(ElementRef::Shape(s));
        }
        if let Some(t) = self.texts.get(id) {
            return Some(ElementRef::Text(t));
        }
        self.images.get(id).map(ElementRef::Image)
    }

    /// Get a mutable element by id, whatever its kind.
    pub fn element_mut(&mut self, id: &ElementId) -> Option<ElementMut<'_>> {
        if let Some(s) = self.shapes.get_mut(id) {
            return Some(ElementMut::Shape(s));
        }
        if let Some(t) = self.texts.get_mut(id) {
            return Some(ElementMut::Text(t));
        }
        self.images.get_mut(id).map(ElementMut::Image)
    }

    /// Insert an element into the collection matching its kind.
    ///
    /// Any element already stored under the same id, in any collection, is
    /// removed and returned.
    pub fn insert(&mut self, element: Element) -> Option<Element> {
        let previous = self.remove(element.id());
        match element {
            Element::Shape(s) => {
                self.shapes.insert(s.id().clone(), s);
            }
            Element::Text(t) => {
                self.texts.insert(t.id().clone(), t);
            }
            Element::Image(i) => {
                self.images.insert(i.id().clone(), i);
            }
        }
        previous
    }

    /// Remove an element from whichever collection holds it.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        if let Some(s) = self.shapes.remove(id) {
            return Some(Element::Shape(s));
        }
        if let Some(t) = self.texts.remove(id) {
            return Some(Element::Text(t));
        }
        self.images.remove(id).map(Element::Image)
    }

    /// Replace the bounds of an element. Returns false if `id` is unknown.
    pub fn set_bounds(&mut self, id: &ElementId, bounds: Bounds) -> bool {
        match self.element_mut(id) {
            Some(mut element) => {
                element.set_bounds(bounds);
                true
            }
            None => false,
        }
    }

    /// Iterate every element id.
    pub fn ids(&self) -> impl Iterator<Item = &ElementId> {
        self.shapes
            .keys()
            .chain(self.texts.keys())
            .chain(self.images.keys())
    }

    /// Iterate every element.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.shapes
            .values()
            .map(ElementRef::Shape)
            .chain(self.texts.values().map(ElementRef::Text))
            .chain(self.images.values().map(ElementRef::Image))
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.texts.is_empty() && self.images.is_empty()
    }

    /// Get the number of elements.
    pub fn len(&self) -> usize {
        self.shapes.len() + self.texts.len() + self.images.len()
    }

    /// Get the bounding box of all elements.
    pub fn bounds(&self) -> Option<Bounds> {
        self.elements()
            .map(|e| e.bounds())
            .reduce(|acc, b| acc.union(&b))
    }

    /// Find elements whose bounds contain `point`, sorted by id.
    pub fn elements_at(&self, point: Point, tolerance: f64) -> Vec<ElementId> {
        let mut hits: Vec<ElementId> = self
            .elements()
            .filter(|e| e.bounds().contains(point, tolerance))
            .map(|e| e.id().clone())
            .collect();
        hits.sort();
        hits
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize the document to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }
}
