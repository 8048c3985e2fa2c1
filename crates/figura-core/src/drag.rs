//! Pointer drag sessions.
//!
//! A session captures the dragged element when it starts. Every pointer
//! move computes new bounds from that capture and the cumulative delta since
//! the press, then writes them through the live mutation tier. Replaying the
//! same position always yields the same bounds, and nothing is recorded in
//! history.

use crate::elements::Element;
use crate::geometry::{Bounds, ResizeDirection, resize_bounds_clamped};
use crate::id::ElementId;
use crate::store::DocumentStore;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// What a drag does to its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DragMode {
    /// Translate the whole element.
    Move,
    /// Drag one of the eight resize anchors.
    #[serde(rename_all = "camelCase")]
    Resize {
        direction: ResizeDirection,
        aspect_locked: bool,
    },
}

/// Pointer input relevant to a drag session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Move { position: Point, primary_down: bool },
    Release,
    CaptureLost,
}

#[derive(Debug, Clone)]
struct DragSession {
    id: ElementId,
    /// The element as it was when the drag started.
    snapshot: Element,
    mode: DragMode,
    origin: Point,
    current: Point,
}

impl DragSession {
    fn delta(&self) -> Vec2 {
        self.current - self.origin
    }

    fn bounds(&self, min_extent: f64) -> Bounds {
        let original = self.snapshot.bounds();
        let delta = self.delta();
        match self.mode {
            DragMode::Move => original.translated(delta),
            DragMode::Resize {
                direction,
                aspect_locked,
            } => resize_bounds_clamped(
                original,
                direction,
                delta.x,
                delta.y,
                aspect_locked,
                min_extent,
            ),
        }
    }
}

/// Drives at most one drag session against a [`DocumentStore`].
#[derive(Debug, Clone, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging `id` from `origin`. Any active session is dropped.
    ///
    /// Returns false if the element does not exist.
    pub fn begin(
        &mut self,
        store: &DocumentStore,
        id: &ElementId,
        mode: DragMode,
        origin: Point,
    ) -> bool {
        let Some(element) = store.document().element(id) else {
            return false;
        };
        if let Some(previous) = self.session.take() {
            log::debug!("Replacing drag session on {}", previous.id);
        }
        log::debug!("Drag started on {} ({:?})", id, mode);
        self.session = Some(DragSession {
            id: id.clone(),
            snapshot: element.to_element(),
            mode,
            origin,
            current: origin,
        });
        true
    }

    /// Apply the pointer at `position` to the captured element.
    ///
    /// Returns false when no session is active. If the element disappeared
    /// mid-drag the session ends.
    pub fn update(&mut self, store: &mut DocumentStore, position: Point) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.current = position;
        let bounds = session.bounds(store.config().min_extent);
        if store.live().set_bounds(&session.id, bounds) {
            true
        } else {
            log::debug!("Drag target {} vanished, ending session", session.id);
            self.session = None;
            false
        }
    }

    /// Feed a pointer event. Returns whether a session is still active.
    pub fn handle(&mut self, store: &mut DocumentStore, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Move {
                position,
                primary_down: true,
            } => {
                self.update(store, position);
            }
            PointerEvent::Move {
                primary_down: false,
                ..
            }
            | PointerEvent::Release => {
                self.end();
            }
            PointerEvent::CaptureLost => {
                self.cancel();
            }
        }
        self.is_active()
    }

    /// Finish the session, keeping the last applied bounds.
    pub fn end(&mut self) -> Option<ElementId> {
        let session = self.session.take()?;
        log::debug!("Drag ended on {} (delta {:?})", session.id, session.delta());
        Some(session.id)
    }

    /// Drop the session without touching the document.
    pub fn cancel(&mut self) -> Option<ElementId> {
        let session = self.session.take()?;
        log::debug!("Drag cancelled on {}", session.id);
        Some(session.id)
    }

    /// Put the element back where the session found it and end the session.
    pub fn revert(&mut self, store: &mut DocumentStore) -> Option<ElementId> {
        let session = self.session.take()?;
        log::debug!("Drag reverted on {}", session.id);
        store.live().set_bounds(&session.id, session.snapshot.bounds());
        Some(session.id)
    }

    /// Toggle aspect locking of an active resize, e.g. when Shift changes.
    ///
    /// Takes effect on the next [`update`](Self::update).
    pub fn set_aspect_locked(&mut self, locked: bool) {
        if let Some(DragSession {
            mode: DragMode::Resize { aspect_locked, .. },
            ..
        }) = self.session.as_mut()
        {
            *aspect_locked = locked;
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn active_element(&self) -> Option<&ElementId> {
        self.session.as_ref().map(|s| &s.id)
    }

    pub fn mode(&self) -> Option<DragMode> {
        self.session.as_ref().map(|s| s.mode)
    }

    /// Cumulative pointer delta of the active session.
    pub fn delta(&self) -> Option<Vec2> {
        self.session.as_ref().map(DragSession::delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Image, Shape};

    fn setup() -> (DocumentStore, ElementId) {
        let mut store = DocumentStore::new();
        let id = store.edit().create_shape(
            Shape::rectangle(Bounds::new(0.0, 0.0, 100.0, 100.0)),
            Some(Point::ZERO),
        );
        (store, id)
    }

    fn bounds_of(store: &DocumentStore, id: &ElementId) -> Bounds {
        store.document().element(id).map(|e| e.bounds()).unwrap()
    }

    #[test]
    fn test_move_uses_cumulative_delta() {
        let (mut store, id) = setup();
        let mut drag = DragController::new();
        assert!(drag.begin(&store, &id, DragMode::Move, Point::new(10.0, 10.0)));

        drag.update(&mut store, Point::new(15.0, 12.0));
        drag.update(&mut store, Point::new(30.0, 40.0));
        assert_eq!(bounds_of(&store, &id), Bounds::new(20.0, 30.0, 100.0, 100.0));

        // Same position again is idempotent.
        drag.update(&mut store, Point::new(30.0, 40.0));
        assert_eq!(bounds_of(&store, &id), Bounds::new(20.0, 30.0, 100.0, 100.0));
        assert_eq!(drag.delta(), Some(Vec2::new(20.0, 30.0)));
    }

    #[test]
    fn test_resize_applies_geometry_to_snapshot() {
        let (mut store, id) = setup();
        let mut drag = DragController::new();
        let mode = DragMode::Resize {
            direction: ResizeDirection::TopLeft,
            aspect_locked: false,
        };
        drag.begin(&store, &id, mode, Point::ZERO);

        for step in 1..=10 {
            drag.update(&mut store, Point::new(step as f64, step as f64));
        }
        assert_eq!(bounds_of(&store, &id), Bounds::new(10.0, 10.0, 90.0, 90.0));
    }

    #[test]
    fn test_resize_respects_min_extent() {
        let (mut store, id) = setup();
        let mut drag = DragController::new();
        let mode = DragMode::Resize {
            direction: ResizeDirection::Right,
            aspect_locked: false,
        };
        drag.begin(&store, &id, mode, Point::ZERO);
        drag.update(&mut store, Point::new(-500.0, 0.0));

        let bounds = bounds_of(&store, &id);
        assert_eq!(bounds.left, 0.0);
        assert_eq!(bounds.width, store.config().min_extent);
    }

    #[test]
    fn test_aspect_lock_can_toggle_mid_drag() {
        let (mut store, id) = setup();
        let mut drag = DragController::new();
        let mode = DragMode::Resize {
            direction: ResizeDirection::BottomRight,
            aspect_locked: false,
        };
        drag.begin(&store, &id, mode, Point::ZERO);
        drag.set_aspect_locked(true);
        drag.update(&mut store, Point::new(50.0, 10.0));
        assert_eq!(bounds_of(&store, &id), Bounds::new(0.0, 0.0, 150.0, 150.0));
    }

    #[test]
    fn test_drag_is_not_historied() {
        let (mut store, id) = setup();
        let depth = store.history().len();
        let mut drag = DragController::new();
        drag.begin(&store, &id, DragMode::Move, Point::ZERO);
        drag.handle(
            &mut store,
            PointerEvent::Move {
                position: Point::new(5.0, 5.0),
                primary_down: true,
            },
        );
        assert!(!drag.handle(&mut store, PointerEvent::Release));
        assert_eq!(store.history().len(), depth);
        assert_eq!(bounds_of(&store, &id), Bounds::new(5.0, 5.0, 100.0, 100.0));
    }

    #[test]
    fn test_button_up_ends_session_without_mutation() {
        let (mut store, id) = setup();
        let mut drag = DragController::new();
        drag.begin(&store, &id, DragMode::Move, Point::ZERO);
        drag.update(&mut store, Point::new(5.0, 0.0));

        let ended = drag.handle(
            &mut store,
            PointerEvent::Move {
                position: Point::new(50.0, 0.0),
                primary_down: false,
            },
        );
        assert!(!ended);
        assert_eq!(bounds_of(&store, &id).left, 5.0);
    }

    #[test]
    fn test_capture_lost_keeps_last_bounds() {
        let (mut store, id) = setup();
        let mut drag = DragController::new();
        drag.begin(&store, &id, DragMode::Move, Point::ZERO);
        drag.update(&mut store, Point::new(7.0, 0.0));

        assert!(!drag.handle(&mut store, PointerEvent::CaptureLost));
        assert!(drag.active_element().is_none());
        assert_eq!(bounds_of(&store, &id).left, 7.0);
        assert!(!drag.update(&mut store, Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_revert_restores_snapshot() {
        let (mut store, id) = setup();
        let mut drag = DragController::new();
        drag.begin(&store, &id, DragMode::Move, Point::ZERO);
        drag.update(&mut store, Point::new(40.0, 40.0));
        assert_eq!(drag.revert(&mut store), Some(id.clone()));
        assert_eq!(bounds_of(&store, &id), Bounds::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_missing_or_deleted_target() {
        let (mut store, id) = setup();
        let mut drag = DragController::new();
        assert!(!drag.begin(&store, &ElementId::from("ghost"), DragMode::Move, Point::ZERO));

        drag.begin(&store, &id, DragMode::Move, Point::ZERO);
        store.edit().delete(&[id.clone()]);
        assert!(!drag.update(&mut store, Point::new(1.0, 1.0)));
        assert!(!drag.is_active());
    }

    #[test]
    fn test_images_resize_like_shapes() {
        let mut store = DocumentStore::new();
        let id = store.edit().create_image(
            Image::new(Bounds::new(0.0, 0.0, 40.0, 20.0), "a.png".to_string()),
            Some(Point::ZERO),
        );
        let mut drag = DragController::new();
        let mode = DragMode::Resize {
            direction: ResizeDirection::Bottom,
            aspect_locked: false,
        };
        drag.begin(&store, &id, mode, Point::ZERO);
        drag.update(&mut store, Point::new(0.0, 10.0));
        assert_eq!(bounds_of(&store, &id), Bounds::new(0.0, 0.0, 40.0, 30.0));
        assert_eq!(drag.mode(), Some(mode));
    }
}
