//! Canonicalization of inbound documents.
//!
//! Documents arriving from collaborators may carry values a downstream
//! persistence layer rejects: NaN numbers, empty dash patterns, ids that
//! disagree with their map key. [`Normalize`] walks the typed model and
//! rewrites those into absent or consistent values. It never fails.

use crate::document::{Attributes, Document};
use crate::elements::{ElementTrait, Image, Path, Shape, Stroke, Text};
use crate::geometry::{Bounds, ViewBox};
use crate::id::ElementId;
use std::collections::HashMap;

/// Recursive in-place canonicalization.
pub trait Normalize {
    fn normalize(&mut self);
}

/// Non-finite becomes absent; finite values are clamped to `[0, 1]`.
fn normalize_unit(value: &mut Option<f64>) {
    *value = value.filter(|v| v.is_finite()).map(|v| v.clamp(0.0, 1.0));
}

fn finite_or(value: &mut f64, fallback: f64) {
    if !value.is_finite() {
        *value = fallback;
    }
}

impl Normalize for Bounds {
    /// Non-finite coordinates become 0; sizes are made finite and non-negative.
    fn normalize(&mut self) {
        finite_or(&mut self.left, 0.0);
        finite_or(&mut self.top, 0.0);
        finite_or(&mut self.width, 0.0);
        finite_or(&mut self.height, 0.0);
        self.width = self.width.max(0.0);
        self.height = self.height.max(0.0);
    }
}

impl Normalize for ViewBox {
    fn normalize(&mut self) {
        finite_or(&mut self.min_x, 0.0);
        finite_or(&mut self.min_y, 0.0);
        let fallback = ViewBox::default();
        if !self.width.is_finite() || self.width <= 0.0 {
            self.width = fallback.width;
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            self.height = fallback.height;
        }
    }
}

impl Normalize for Attributes {
    fn normalize(&mut self) {
        let fallback = Attributes::default();
        if !self.width.is_finite() || self.width <= 0.0 {
            self.width = fallback.width;
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            self.height = fallback.height;
        }
    }
}

impl Normalize for Stroke {
    fn normalize(&mut self) {
        if self.dasharray.as_deref().is_some_and(|d| d.trim().is_empty()) {
            self.dasharray = None;
        }
        if !self.weight.is_finite() {
            self.weight = Stroke::DEFAULT_WEIGHT;
        }
    }
}

impl<T: Normalize> Normalize for Option<T> {
    fn normalize(&mut self) {
        if let Some(inner) = self {
            inner.normalize();
        }
    }
}

impl Normalize for Path {
    fn normalize(&mut self) {
        self.stroke.normalize();
    }
}

impl Normalize for Shape {
    fn normalize(&mut self) {
        self.bounds.normalize();
        self.view_box.normalize();
        normalize_unit(&mut self.transparency);
        for path in &mut self.paths {
            path.normalize();
        }
        self.remembered_stroke.normalize();
    }
}

impl Normalize for Text {
    fn normalize(&mut self) {
        self.bounds.normalize();
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            self.font_size = Text::DEFAULT_FONT_SIZE;
        }
    }
}

impl Normalize for Image {
    fn normalize(&mut self) {
        self.bounds.normalize();
        normalize_unit(&mut self.opacity);
    }
}

fn normalize_collection<T: Normalize + ElementTrait>(items: &mut HashMap<ElementId, T>) {
    for (key, item) in items.iter_mut() {
        if item.id() != key {
            item.set_id(key.clone());
        }
        item.normalize();
    }
}

impl Normalize for Document {
    fn normalize(&mut self) {
        normalize_collection(&mut self.shapes);
        normalize_collection(&mut self.texts);
        normalize_collection(&mut self.images);
        self.attributes.normalize();

        let shapes = &self.shapes;
        self.texts.retain(|id, _| {
            let unique = !shapes.contains_key(id);
            if !unique {
                log::warn!("Dropping text {} whose id is already used by a shape", id);
            }
            unique
        });
        let texts = &self.texts;
        self.images.retain(|id, _| {
            let unique = !shapes.contains_key(id) && !texts.contains_key(id);
            if !unique {
                log::warn!("Dropping image {} whose id is already in use", id);
            }
            unique
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Fill;

    #[test]
    fn test_strips_invalid_optionals() {
        let mut shape = Shape::new(
            Bounds::default(),
            vec![Path::new("M0 0").with_stroke(Stroke::new("#000", 2.0).with_dasharray("  "))],
            ViewBox::default(),
        )
        .with_transparency(f64::NAN);
        shape.remembered_stroke = Some(Stroke::new("#fff", f64::INFINITY).with_dasharray(""));
        shape.normalize();

        assert_eq!(shape.transparency, None);
        assert_eq!(shape.paths[0].stroke.as_ref().unwrap().dasharray, None);
        let remembered = shape.remembered_stroke.unwrap();
        assert_eq!(remembered.dasharray, None);
        assert_eq!(remembered.weight, Stroke::DEFAULT_WEIGHT);
    }

    #[test]
    fn test_clamps_opacity() {
        let mut image = Image::new(Bounds::default(), "x".to_string());
        image.opacity = Some(1.5);
        image.normalize();
        assert_eq!(image.opacity, Some(1.0));

        image.opacity = Some(-0.2);
        image.normalize();
        assert_eq!(image.opacity, Some(0.0));
    }

    #[test]
    fn test_resyncs_ids_and_drops_duplicates() {
        let mut doc = Document::default();
        let shape = Shape::rectangle(Bounds::default());
        let shared = shape.id().clone();
        doc.shapes.insert(shared.clone(), shape);
        doc.texts.insert(shared.clone(), Text::new(Bounds::default(), "dup".to_string()));
        let stray = Image::new(Bounds::default(), "x".to_string());
        doc.images.insert(ElementId::from("img"), stray);

        doc.normalize();

        assert!(doc.texts.is_empty());
        assert_eq!(doc.shapes.len(), 1);
        assert_eq!(doc.images[&ElementId::from("img")].id(), &ElementId::from("img"));
    }

    #[test]
    fn test_normalize_keeps_valid_document_unchanged() {
        let mut doc = Document::default();
        doc.insert(Shape::rectangle(Bounds::new(0.0, 0.0, 5.0, 5.0)).with_transparency(0.3).into());
        doc.insert(Text::new(Bounds::default(), "ok".to_string()).into());
        let before = doc.clone();
        doc.normalize();
        assert_eq!(doc, before);
    }

    #[test]
    fn test_repairs_non_finite_geometry() {
        let mut shape = Shape::new(
            Bounds::new(f64::NAN, 4.0, -10.0, f64::INFINITY),
            vec![Path::new("M0 0").with_fill(Fill::new("#abcdef"))],
            ViewBox::new(f64::NEG_INFINITY, 2.0, 0.0, f64::NAN),
        );
        shape.normalize();

        assert_eq!(shape.bounds, Bounds::new(0.0, 4.0, 0.0, 0.0));
        assert_eq!(shape.view_box, ViewBox::new(0.0, 2.0, 100.0, 100.0));
        assert_eq!(shape.fill(), Some(&Fill::new("#abcdef")));
    }

    #[test]
    fn test_document_json_survives_after_normalize() {
        let mut doc = Document::new(Attributes {
            width: f64::NAN,
            height: -1.0,
        });
        let mut text = Text::new(Bounds::new(1.0, 2.0, 3.0, 4.0), "hi".to_string());
        text.bounds.left = f64::NAN;
        let mut image = Image::new(Bounds::default(), "a.png".to_string());
        image.bounds.top = f64::INFINITY;
        doc.insert(text.into());
        doc.insert(image.into());

        doc.normalize();
        assert_eq!(doc.attributes, Attributes::default());

        let parsed = Document::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(parsed, doc);
    }
}
