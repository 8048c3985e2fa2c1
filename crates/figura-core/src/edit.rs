//! Mutation API.
//!
//! Two handles borrow the store mutably:
//!
//! - [`Editor`] records every change as a [`Command`] and is the only way to
//!   create, restyle or delete elements.
//! - [`LiveEditor`] only moves and resizes, writing straight to the store
//!   without touching history. Pointer-driven previews use it so a drag does
//!   not fill the undo stack with one entry per frame.
//!
//! Operations naming unknown ids skip them silently. A call whose ids all
//! miss does nothing and records nothing.

use crate::document::{Document, ElementKind};
use crate::elements::{Element, FontWeight, Image, Shape, Text};
use crate::geometry::Bounds;
use crate::history::Command;
use crate::id::ElementId;
use crate::store::{DocumentStore, SelectionUpdate};
use crate::style_memory::{StyleChange, apply_style_change};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Discrete text edits. `None` fields are left as they are.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

impl TextUpdate {
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = Some(weight);
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    fn apply(&self, text: &mut Text) {
        if let Some(content) = &self.content {
            text.content = content.clone();
        }
        if let Some(size) = self.font_size.filter(|s| s.is_finite() && *s > 0.0) {
            text.font_size = size;
        }
        if let Some(color) = &self.color {
            text.color = color.clone();
        }
        if let Some(weight) = self.font_weight {
            text.font_weight = weight;
        }
        if let Some(family) = &self.font_family {
            text.font_family = family.clone();
        }
    }

    fn describe(&self) -> &'static str {
        let style_changed = self.font_size.is_some()
            || self.color.is_some()
            || self.font_weight.is_some()
            || self.font_family.is_some();
        match (self.content.is_some(), style_changed) {
            (true, false) => "Edit text",
            (false, true) => "Update text style",
            _ => "Update text",
        }
    }
}

/// Discrete image edits. `None` fields are left as they are.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

impl ImageUpdate {
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    fn apply(&self, image: &mut Image) {
        if let Some(opacity) = self.opacity.filter(|o| o.is_finite()) {
            image.opacity = Some(opacity.clamp(0.0, 1.0));
        }
        if let Some(src) = &self.src {
            image.src = src.clone();
        }
    }
}

/// Requested ids with duplicates removed, first occurrence wins.
fn unique_ids(ids: &[ElementId]) -> Vec<ElementId> {
    let mut seen = HashSet::new();
    ids.iter().filter(|id| seen.insert(*id)).cloned().collect()
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Historied mutations. Obtained from [`DocumentStore::edit`].
pub struct Editor<'a> {
    store: &'a mut DocumentStore,
}

impl<'a> Editor<'a> {
    pub(crate) fn new(store: &'a mut DocumentStore) -> Self {
        Self { store }
    }

    /// Add `element` under a fresh id and select it.
    ///
    /// With a `position` the element's top-left corner is placed there;
    /// otherwise it is centered on the canvas.
    pub fn create(&mut self, element: impl Into<Element>, position: Option<Point>) -> ElementId {
        let mut element = element.into();
        element.regenerate_id();

        let size = element.bounds();
        let bounds = match position {
            Some(p) => Bounds::new(p.x, p.y, size.width, size.height),
            None => {
                let canvas = self.store.document().attributes;
                Bounds::centered_in(size.width, size.height, canvas.width, canvas.height)
            }
        };
        element.set_bounds(bounds);

        let id = element.id().clone();
        let kind = element.kind();
        let previous = self.store.document().clone();
        let mut next = previous.clone();
        next.insert(element);

        self.store.commit(
            Command::new(format!("Create {}", kind.name()), previous, next),
            SelectionUpdate::Select(id.clone()),
        );
        id
    }

    pub fn create_shape(&mut self, shape: Shape, position: Option<Point>) -> ElementId {
        self.create(shape, position)
    }

    /// Create a text element. Empty bounds are sized from the content.
    pub fn create_text(&mut self, mut text: Text, position: Option<Point>) -> ElementId {
        if text.bounds.width <= 0.0 || text.bounds.height <= 0.0 {
            let (width, height) =
                Text::approximate_size(&text.content, text.font_size, text.font_weight);
            text.bounds.width = width.max(text.font_size);
            text.bounds.height = height;
        }
        self.create(text, position)
    }

    /// Create an image, scaled down to fit the canvas if it is larger.
    pub fn create_image(&mut self, image: Image, position: Option<Point>) -> ElementId {
        let canvas = self.store.document().attributes;
        self.create(image.fit_within(canvas.width, canvas.height), position)
    }

    /// Apply a style change to shapes, maintaining their remembered styles.
    ///
    /// Returns the ids that were updated.
    pub fn update_shape_attributes(
        &mut self,
        ids: &[ElementId],
        change: &StyleChange,
    ) -> Vec<ElementId> {
        let defaults = self.store.config().style.clone();
        self.update_where(ids, change.describe(), |doc, id| match doc.shapes.get_mut(id) {
            Some(shape) => {
                apply_style_change(shape, change, &defaults);
                true
            }
            None => false,
        })
    }

    /// Apply content or style edits to text elements.
    pub fn update_text(&mut self, ids: &[ElementId], update: &TextUpdate) -> Vec<ElementId> {
        self.update_where(ids, update.describe(), |doc, id| match doc.texts.get_mut(id) {
            Some(text) => {
                update.apply(text);
                true
            }
            None => false,
        })
    }

    /// Replace the content of one text element.
    pub fn set_text_content(&mut self, id: &ElementId, content: impl Into<String>) -> bool {
        let update = TextUpdate::default().content(content);
        !self.update_text(std::slice::from_ref(id), &update).is_empty()
    }

    /// Apply opacity or source edits to images.
    pub fn update_image(&mut self, ids: &[ElementId], update: &ImageUpdate) -> Vec<ElementId> {
        self.update_where(ids, "Update image", |doc, id| match doc.images.get_mut(id) {
            Some(image) => {
                update.apply(image);
                true
            }
            None => false,
        })
    }

    /// Delete elements of any kind and clear the selection.
    ///
    /// Returns the ids actually removed.
    pub fn delete(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        self.delete_matching(ids, "element", |_| true)
    }

    /// Delete only the requested ids that live in the `kind` collection.
    pub fn delete_of_kind(&mut self, kind: ElementKind, ids: &[ElementId]) -> Vec<ElementId> {
        self.delete_matching(ids, kind.name(), |k| k == kind)
    }

    /// Clone elements under fresh ids, moved by `offset`.
    ///
    /// The last duplicate becomes the selection. Returns the new ids in
    /// request order.
    pub fn duplicate(&mut self, ids: &[ElementId], offset: Vec2) -> Vec<ElementId> {
        let previous = self.store.document().clone();
        let mut next = previous.clone();
        let mut created = Vec::new();

        for id in unique_ids(ids) {
            let Some(original) = previous.element(&id) else {
                continue;
            };
            let mut copy = original.to_element();
            copy.regenerate_id();
            copy.set_bounds(copy.bounds().translated(offset));
            created.push(copy.id().clone());
            next.insert(copy);
        }

        let Some(last) = created.last().cloned() else {
            return created;
        };
        self.store.commit(
            Command::new(format!("Duplicate {}", plural(created.len(), "element")), previous, next),
            SelectionUpdate::Select(last),
        );
        created
    }

    fn delete_matching(
        &mut self,
        ids: &[ElementId],
        noun: &str,
        keep_kind: impl Fn(ElementKind) -> bool,
    ) -> Vec<ElementId> {
        let previous = self.store.document().clone();
        let targets: Vec<ElementId> = unique_ids(ids)
            .into_iter()
            .filter(|id| previous.kind_of(id).is_some_and(&keep_kind))
            .collect();
        if targets.is_empty() {
            return targets;
        }

        let mut next = previous.clone();
        for id in &targets {
            next.remove(id);
        }
        self.store.commit(
            Command::new(format!("Delete {}", plural(targets.len(), noun)), previous, next),
            SelectionUpdate::Clear,
        );
        targets
    }

    /// Run `apply` on a copy of the document for each unique id and record
    /// one command if any id was found.
    fn update_where(
        &mut self,
        ids: &[ElementId],
        description: &str,
        mut apply: impl FnMut(&mut Document, &ElementId) -> bool,
    ) -> Vec<ElementId> {
        let previous = self.store.document().clone();
        let mut next = previous.clone();
        let updated: Vec<ElementId> = unique_ids(ids)
            .into_iter()
            .filter(|id| apply(&mut next, id))
            .collect();
        if !updated.is_empty() {
            self.store
                .commit(Command::new(description, previous, next), SelectionUpdate::Keep);
        }
        updated
    }
}

/// Non-historied bounds updates. Obtained from [`DocumentStore::live`].
pub struct LiveEditor<'a> {
    store: &'a mut DocumentStore,
}

impl<'a> LiveEditor<'a> {
    pub(crate) fn new(store: &'a mut DocumentStore) -> Self {
        Self { store }
    }

    /// Replace an element's bounds. Returns false if `id` is unknown.
    pub fn set_bounds(&mut self, id: &ElementId, bounds: Bounds) -> bool {
        self.set_bounds_many(&[(id.clone(), bounds)]) == 1
    }

    /// Move an element by `delta`. Returns false if `id` is unknown.
    pub fn translate(&mut self, id: &ElementId, delta: Vec2) -> bool {
        let Some(current) = self.store.document().element(id).map(|e| e.bounds()) else {
            return false;
        };
        self.set_bounds(id, current.translated(delta))
    }

    /// Replace several bounds in one store transition.
    ///
    /// Returns how many ids were found.
    pub fn set_bounds_many(&mut self, updates: &[(ElementId, Bounds)]) -> usize {
        let mut next = self.store.document().clone();
        let mut found = 0;
        for (id, bounds) in updates {
            if next.set_bounds(id, *bounds) {
                found += 1;
            }
        }
        if found > 0 && &next != self.store.document() {
            log::trace!("Live bounds update for {} element(s)", found);
            self.store.replace_document(next);
        }
        found
    }
}
