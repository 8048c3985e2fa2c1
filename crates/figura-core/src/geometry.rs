//! Bounding rectangles and resize math.
//!
//! [`resize_bounds`] is a pure function of the bounds captured when a resize
//! started and the cumulative pointer delta since then, so it can be called
//! once per pointer frame without accumulating drift.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest width or height a resize may produce.
pub const DEFAULT_MIN_EXTENT: f64 = 1.0;

/// Axis-aligned rectangle in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// X coordinate of the left edge.
    pub left: f64,
    /// Y coordinate of the top edge.
    pub top: f64,
    /// Horizontal extent, non-negative.
    pub width: f64,
    /// Vertical extent, non-negative.
    pub height: f64,
}

impl Bounds {
    /// Create bounds from the top-left corner and size.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bounds of the given size centered on a canvas of `canvas_width` x `canvas_height`.
    pub fn centered_in(width: f64, height: f64, canvas_width: f64, canvas_height: f64) -> Self {
        Self::new(
            (canvas_width - width) / 2.0,
            (canvas_height - height) / 2.0,
            width,
            height,
        )
    }

    /// X coordinate of the right edge.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Y coordinate of the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Center point of the bounds.
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Same size, moved by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.left + delta.x, self.top + delta.y, self.width, self.height)
    }

    /// Check if a point lies within the bounds grown by `tolerance` on every side.
    pub fn contains(&self, point: Point, tolerance: f64) -> bool {
        self.to_rect().inflate(tolerance, tolerance).contains(point)
    }

    /// Convert to a kurbo rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.right(), self.bottom())
    }

    /// Convert from a kurbo rectangle, normalizing inverted corners.
    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    /// Smallest bounds containing both.
    pub fn union(&self, other: &Bounds) -> Self {
        Self::from_rect(self.to_rect().union(other.to_rect()))
    }
}

impl From<Rect> for Bounds {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}

impl From<Bounds> for Rect {
    fn from(bounds: Bounds) -> Self {
        bounds.to_rect()
    }
}

/// Path-local coordinate window, independent of an element's [`Bounds`].
///
/// Path data is drawn in view box space and stretched to fill the bounds,
/// which allows non-uniform scaling of the vector content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Affine mapping view box space onto `bounds`.
    pub fn transform_to(&self, bounds: &Bounds) -> kurbo::Affine {
        let sx = if self.width.abs() > f64::EPSILON { bounds.width / self.width } else { 1.0 };
        let sy = if self.height.abs() > f64::EPSILON { bounds.height / self.height } else { 1.0 };
        kurbo::Affine::translate(Vec2::new(bounds.left, bounds.top))
            * kurbo::Affine::scale_non_uniform(sx, sy)
            * kurbo::Affine::translate(Vec2::new(-self.min_x, -self.min_y))
    }
}

impl Default for ViewBox {
    fn default() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }
}

/// Anchor being dragged during a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeDirection {
    Top,
    Right,
    Bottom,
    Left,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeDirection {
    pub fn all() -> &'static [ResizeDirection] {
        &[
            ResizeDirection::Top,
            ResizeDirection::Right,
            ResizeDirection::Bottom,
            ResizeDirection::Left,
            ResizeDirection::TopLeft,
            ResizeDirection::TopRight,
            ResizeDirection::BottomLeft,
            ResizeDirection::BottomRight,
        ]
    }

    fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeDirection::Left | ResizeDirection::TopLeft | ResizeDirection::BottomLeft
        )
    }

    fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeDirection::Right | ResizeDirection::TopRight | ResizeDirection::BottomRight
        )
    }

    fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeDirection::Top | ResizeDirection::TopLeft | ResizeDirection::TopRight
        )
    }

    fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeDirection::Bottom | ResizeDirection::BottomLeft | ResizeDirection::BottomRight
        )
    }

    /// Check if this is one of the four corner anchors.
    pub fn is_corner(self) -> bool {
        (self.moves_left() || self.moves_right()) && (self.moves_top() || self.moves_bottom())
    }
}

/// Compute new bounds for dragging `direction` by (`delta_x`, `delta_y`).
///
/// Uses [`DEFAULT_MIN_EXTENT`] as the smallest allowed width and height.
pub fn resize_bounds(
    original: Bounds,
    direction: ResizeDirection,
    delta_x: f64,
    delta_y: f64,
    aspect_locked: bool,
) -> Bounds {
    resize_bounds_clamped(original, direction, delta_x, delta_y, aspect_locked, DEFAULT_MIN_EXTENT)
}

/// Like [`resize_bounds`] with an explicit minimum extent.
///
/// The edge opposite the dragged anchor never moves. Dragging past it stops
/// the moving edge `min_extent` away instead of flipping the rectangle.
/// With `aspect_locked`, corner anchors scale both sides by whichever axis
/// changed more, and edge anchors grow the other axis evenly about the center.
pub fn resize_bounds_clamped(
    original: Bounds,
    direction: ResizeDirection,
    delta_x: f64,
    delta_y: f64,
    aspect_locked: bool,
    min_extent: f64,
) -> Bounds {
    let min_extent = min_extent.max(0.0);

    let mut width = original.width;
    let mut height = original.height;
    if direction.moves_left() {
        width -= delta_x;
    } else if direction.moves_right() {
        width += delta_x;
    }
    if direction.moves_top() {
        height -= delta_y;
    } else if direction.moves_bottom() {
        height += delta_y;
    }

    let ratio_defined = original.width > f64::EPSILON && original.height > f64::EPSILON;
    if aspect_locked && ratio_defined {
        let scale_x = width / original.width;
        let scale_y = height / original.height;
        let scale = if direction.is_corner() {
            if (scale_x - 1.0).abs() >= (scale_y - 1.0).abs() { scale_x } else { scale_y }
        } else if direction.moves_left() || direction.moves_right() {
            scale_x
        } else {
            scale_y
        };
        let scale = scale
            .max(min_extent / original.width)
            .max(min_extent / original.height);
        width = original.width * scale;
        height = original.height * scale;
    } else {
        // Only the dragged axes are clamped; a flat line stays flat.
        if direction.moves_left() || direction.moves_right() {
            width = width.max(min_extent);
        }
        if direction.moves_top() || direction.moves_bottom() {
            height = height.max(min_extent);
        }
    }

    let left = if direction.moves_left() {
        original.right() - width
    } else if direction.moves_right() || !aspect_locked {
        original.left
    } else {
        original.center().x - width / 2.0
    };
    let top = if direction.moves_top() {
        original.bottom() - height
    } else if direction.moves_bottom() || !aspect_locked {
        original.top
    } else {
        original.center().y - height / 2.0
    };

    Bounds::new(left, top, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Bounds {
        Bounds::new(0.0, 0.0, 100.0, 100.0)
    }

    fn approx(a: Bounds, b: Bounds) -> bool {
        (a.left - b.left).abs() < 1e-9
            && (a.top - b.top).abs() < 1e-9
            && (a.width - b.width).abs() < 1e-9
            && (a.height - b.height).abs() < 1e-9
    }

    #[test]
    fn test_right_edge_grows_width() {
        let result = resize_bounds(square(), ResizeDirection::Right, 20.0, 0.0, false);
        assert_eq!(result, Bounds::new(0.0, 0.0, 120.0, 100.0));
    }

    #[test]
    fn test_top_left_corner_moves_origin() {
        let result = resize_bounds(square(), ResizeDirection::TopLeft, 10.0, 10.0, false);
        assert_eq!(result, Bounds::new(10.0, 10.0, 90.0, 90.0));
    }

    #[test]
    fn test_edges_ignore_perpendicular_delta() {
        let result = resize_bounds(square(), ResizeDirection::Left, 10.0, 50.0, false);
        assert_eq!(result, Bounds::new(10.0, 0.0, 90.0, 100.0));

        let result = resize_bounds(square(), ResizeDirection::Top, 50.0, -10.0, false);
        assert_eq!(result, Bounds::new(0.0, -10.0, 100.0, 110.0));

        let result = resize_bounds(square(), ResizeDirection::Bottom, 50.0, 30.0, false);
        assert_eq!(result, Bounds::new(0.0, 0.0, 100.0, 130.0));
    }

    #[test]
    fn test_every_corner_keeps_opposite_corner_fixed() {
        let original = Bounds::new(10.0, 20.0, 100.0, 50.0);
        for &direction in ResizeDirection::all() {
            if !direction.is_corner() {
                continue;
            }
            let result = resize_bounds(original, direction, 7.0, -3.0, false);
            match direction {
                ResizeDirection::TopLeft => {
                    assert_eq!(result.right(), original.right());
                    assert_eq!(result.bottom(), original.bottom());
                }
                ResizeDirection::TopRight => {
                    assert_eq!(result.left, original.left);
                    assert_eq!(result.bottom(), original.bottom());
                }
                ResizeDirection::BottomLeft => {
                    assert_eq!(result.right(), original.right());
                    assert_eq!(result.top, original.top);
                }
                ResizeDirection::BottomRight => {
                    assert_eq!(result.left, original.left);
                    assert_eq!(result.top, original.top);
                }
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn test_clamps_instead_of_inverting() {
        let result = resize_bounds(square(), ResizeDirection::Right, -250.0, 0.0, false);
        assert_eq!(result, Bounds::new(0.0, 0.0, DEFAULT_MIN_EXTENT, 100.0));

        let result = resize_bounds(square(), ResizeDirection::TopLeft, 500.0, 500.0, false);
        assert_eq!(result.width, DEFAULT_MIN_EXTENT);
        assert_eq!(result.height, DEFAULT_MIN_EXTENT);
        assert_eq!(result.right(), 100.0);
        assert_eq!(result.bottom(), 100.0);
    }

    #[test]
    fn test_flat_bounds_keep_zero_height_on_edge_drag() {
        let line = Bounds::new(0.0, 50.0, 100.0, 0.0);
        let result = resize_bounds(line, ResizeDirection::Right, 20.0, 0.0, false);
        assert_eq!(result, Bounds::new(0.0, 50.0, 120.0, 0.0));

        let result = resize_bounds(line, ResizeDirection::Left, 10.0, 0.0, false);
        assert_eq!(result, Bounds::new(10.0, 50.0, 90.0, 0.0));

        // No ratio to keep, so the lock leaves the flat axis alone too.
        let result = resize_bounds(line, ResizeDirection::Right, 20.0, 0.0, true);
        assert_eq!(result, Bounds::new(0.0, 50.0, 120.0, 0.0));

        // Dragging the collapsed axis itself still honors the minimum.
        let result = resize_bounds(line, ResizeDirection::Top, 0.0, 5.0, false);
        assert_eq!(result, Bounds::new(0.0, 49.0, 100.0, DEFAULT_MIN_EXTENT));

        let result = resize_bounds(line, ResizeDirection::Bottom, 0.0, 8.0, false);
        assert_eq!(result, Bounds::new(0.0, 50.0, 100.0, 8.0));

        let tall = Bounds::new(5.0, 0.0, 0.0, 40.0);
        let result = resize_bounds(tall, ResizeDirection::Bottom, 3.0, 10.0, false);
        assert_eq!(result, Bounds::new(5.0, 0.0, 0.0, 50.0));
    }

    #[test]
    fn test_custom_min_extent() {
        let result =
            resize_bounds_clamped(square(), ResizeDirection::Bottom, 0.0, -99.0, false, 10.0);
        assert_eq!(result.height, 10.0);
    }

    #[test]
    fn test_aspect_locked_corner_uses_dominant_axis() {
        let original = Bounds::new(0.0, 0.0, 200.0, 100.0);
        let result = resize_bounds(original, ResizeDirection::BottomRight, 100.0, 10.0, true);
        assert!(approx(result, Bounds::new(0.0, 0.0, 300.0, 150.0)));

        let result = resize_bounds(original, ResizeDirection::TopLeft, -100.0, 0.0, true);
        assert!(approx(result, Bounds::new(-100.0, -50.0, 300.0, 150.0)));
    }

    #[test]
    fn test_aspect_locked_edge_grows_about_center() {
        let result = resize_bounds(square(), ResizeDirection::Right, 50.0, 0.0, true);
        assert!(approx(result, Bounds::new(0.0, -25.0, 150.0, 150.0)));
    }

    #[test]
    fn test_aspect_lock_ignored_for_degenerate_bounds() {
        let flat = Bounds::new(0.0, 0.0, 100.0, 0.0);
        let result = resize_bounds(flat, ResizeDirection::BottomRight, 10.0, 10.0, true);
        assert_eq!(result, Bounds::new(0.0, 0.0, 110.0, 10.0));
    }

    #[test]
    fn test_resize_is_deterministic() {
        let a = resize_bounds(square(), ResizeDirection::BottomLeft, 13.5, -4.25, true);
        let b = resize_bounds(square(), ResizeDirection::BottomLeft, 13.5, -4.25, true);
        assert_eq!(a, b);
    }

    #[test]
    fn test_viewbox_maps_onto_bounds() {
        let view_box = ViewBox::new(0.0, 0.0, 10.0, 20.0);
        let bounds = Bounds::new(100.0, 100.0, 50.0, 50.0);
        let affine = view_box.transform_to(&bounds);
        let p = affine * Point::new(10.0, 20.0);
        assert!((p.x - 150.0).abs() < 1e-9);
        assert!((p.y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_centered_in_canvas() {
        let bounds = Bounds::centered_in(100.0, 50.0, 800.0, 600.0);
        assert_eq!(bounds, Bounds::new(350.0, 275.0, 100.0, 50.0));
    }
}
