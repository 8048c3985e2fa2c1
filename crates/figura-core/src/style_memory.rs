//! Stroke and fill toggling with memory of the last active style.
//!
//! Disabling a stroke or fill copies the live value into the shape's
//! `remembered_stroke` / `remembered_fill` before removing it from the paths.
//! Re-enabling without explicit values restores that remembered style rather
//! than a hardcoded default.

use crate::elements::{Fill, Shape, Stroke};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Three-way change of an optional style property.
///
/// In JSON an absent key is [`Unchanged`](Self::Unchanged), `null` is
/// [`Disable`](Self::Disable) and an object is [`Set`](Self::Set).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StylePatch<T> {
    #[default]
    Unchanged,
    Disable,
    Set(T),
}

impl<T> StylePatch<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, StylePatch::Unchanged)
    }
}

impl<T: Serialize> Serialize for StylePatch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StylePatch::Set(value) => serializer.serialize_some(value),
            StylePatch::Unchanged | StylePatch::Disable => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for StylePatch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => StylePatch::Set(value),
            None => StylePatch::Disable,
        })
    }
}

/// Requested stroke; missing fields fall back to the current or remembered stroke.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StrokeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dasharray: Option<String>,
}

impl StrokeSpec {
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn dasharray(mut self, dasharray: impl Into<String>) -> Self {
        self.dasharray = Some(dasharray.into());
        self
    }

    fn merge_over(&self, base: Stroke) -> Stroke {
        Stroke {
            color: self.color.clone().unwrap_or(base.color),
            weight: self.weight.unwrap_or(base.weight),
            dasharray: self.dasharray.clone().or(base.dasharray),
        }
    }
}

/// Requested fill; a missing color falls back to the current or remembered fill.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FillSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl FillSpec {
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Attribute change applied to one or more shapes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleChange {
    #[serde(default, skip_serializing_if = "StylePatch::is_unchanged")]
    pub stroke: StylePatch<StrokeSpec>,
    #[serde(default, skip_serializing_if = "StylePatch::is_unchanged")]
    pub fill: StylePatch<FillSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<f64>,
}

impl StyleChange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stroke(mut self, spec: StrokeSpec) -> Self {
        self.stroke = StylePatch::Set(spec);
        self
    }

    pub fn disable_stroke(mut self) -> Self {
        self.stroke = StylePatch::Disable;
        self
    }

    pub fn fill(mut self, spec: FillSpec) -> Self {
        self.fill = StylePatch::Set(spec);
        self
    }

    pub fn disable_fill(mut self) -> Self {
        self.fill = StylePatch::Disable;
        self
    }

    pub fn transparency(mut self, transparency: f64) -> Self {
        self.transparency = Some(transparency);
        self
    }

    /// Short label for the history entry this change produces.
    pub fn describe(&self) -> &'static str {
        match (&self.stroke, &self.fill) {
            (StylePatch::Disable, StylePatch::Unchanged) => "Disable stroke",
            (StylePatch::Set(_), StylePatch::Unchanged) => "Update stroke",
            (StylePatch::Unchanged, StylePatch::Disable) => "Disable fill",
            (StylePatch::Unchanged, StylePatch::Set(_)) => "Update fill",
            (StylePatch::Unchanged, StylePatch::Unchanged) if self.transparency.is_some() => {
                "Update transparency"
            }
            _ => "Update style",
        }
    }
}

/// Styles used when nothing live or remembered is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleDefaults {
    /// Stroke enabled with partial data on a shape that never had one.
    pub stroke: Stroke,
    /// Fill injected when disabling stroke leaves a path invisible, and used
    /// when a fill is enabled without a color.
    pub fallback_fill: Fill,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            stroke: Stroke::default(),
            fallback_fill: Fill::new(Fill::FALLBACK_COLOR),
        }
    }
}

/// Apply `change` to `shape`, maintaining its remembered styles.
pub fn apply_style_change(shape: &mut Shape, change: &StyleChange, defaults: &StyleDefaults) {
    match &change.stroke {
        StylePatch::Unchanged => {}
        StylePatch::Disable => {
            if let Some(live) = shape.stroke().cloned() {
                shape.remembered_stroke = Some(live);
            }
            for path in &mut shape.paths {
                path.stroke = None;
            }
        }
        StylePatch::Set(spec) => {
            let base = shape
                .stroke()
                .or(shape.remembered_stroke.as_ref())
                .cloned()
                .unwrap_or_else(|| Stroke {
                    dasharray: None,
                    ..defaults.stroke.clone()
                });
            let stroke = spec.merge_over(base);
            for path in &mut shape.paths {
                path.stroke = Some(stroke.clone());
            }
            shape.remembered_stroke = Some(stroke);
        }
    }

    match &change.fill {
        StylePatch::Unchanged => {}
        StylePatch::Disable => {
            if let Some(live) = shape.fill().cloned() {
                shape.remembered_fill = Some(live);
            }
            for path in &mut shape.paths {
                path.fill = None;
            }
        }
        StylePatch::Set(spec) => {
            let base = shape
                .fill()
                .or(shape.remembered_fill.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.fallback_fill.clone());
            let fill = Fill {
                color: spec.color.clone().unwrap_or(base.color),
            };
            for path in &mut shape.paths {
                path.fill = Some(fill.clone());
            }
            shape.remembered_fill = Some(fill);
        }
    }

    // A shape left with neither stroke nor fill would vanish from the canvas.
    if matches!(change.stroke, StylePatch::Disable) {
        for path in &mut shape.paths {
            if path.is_invisible() {
                path.fill = Some(defaults.fallback_fill.clone());
            }
        }
    }

    if let Some(transparency) = change.transparency.filter(|t| t.is_finite()) {
        shape.transparency = Some(transparency.clamp(0.0, 1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Path;
    use crate::geometry::{Bounds, ViewBox};

    fn shape_with(stroke: Option<Stroke>, fill: Option<Fill>) -> Shape {
        let mut path = Path::new("M 0 0 L 10 10");
        path.stroke = stroke;
        path.fill = fill;
        Shape::new(Bounds::new(0.0, 0.0, 10.0, 10.0), vec![path.clone(), path], ViewBox::default())
    }

    #[test]
    fn test_stroke_round_trip_restores_remembered() {
        let defaults = StyleDefaults::default();
        let mut shape = shape_with(Some(Stroke::new("#ff0000", 5.0)), None);

        apply_style_change(&mut shape, &StyleChange::new().disable_stroke(), &defaults);
        assert!(shape.paths.iter().all(|p| p.stroke.is_none()));
        assert_eq!(shape.remembered_stroke, Some(Stroke::new("#ff0000", 5.0)));

        apply_style_change(&mut shape, &StyleChange::new().stroke(StrokeSpec::default()), &defaults);
        assert!(shape.paths.iter().all(|p| p.stroke == Some(Stroke::new("#ff0000", 5.0))));
    }

    #[test]
    fn test_enable_stroke_without_memory_uses_defaults() {
        let defaults = StyleDefaults::default();
        let mut shape = shape_with(None, Some(Fill::new("#123456")));

        apply_style_change(
            &mut shape,
            &StyleChange::new().stroke(StrokeSpec::default().color("#00ff00")),
            &defaults,
        );
        let expected = Stroke::new("#00ff00", 4.0);
        assert_eq!(shape.stroke(), Some(&expected));
        assert_eq!(shape.remembered_stroke, Some(expected));
        assert_eq!(shape.stroke().unwrap().dasharray, None);
    }

    #[test]
    fn test_partial_update_keeps_live_fields() {
        let defaults = StyleDefaults::default();
        let mut shape = shape_with(Some(Stroke::new("#ff0000", 5.0).with_dasharray("2,2")), None);

        apply_style_change(
            &mut shape,
            &StyleChange::new().stroke(StrokeSpec::default().weight(8.0)),
            &defaults,
        );
        assert_eq!(
            shape.stroke(),
            Some(&Stroke::new("#ff0000", 8.0).with_dasharray("2,2"))
        );
    }

    #[test]
    fn test_disabling_stroke_injects_fallback_fill() {
        let defaults = StyleDefaults::default();
        let mut shape = shape_with(Some(Stroke::default()), None);

        apply_style_change(&mut shape, &StyleChange::new().disable_stroke(), &defaults);
        assert!(shape.paths.iter().all(|p| p.fill == Some(Fill::new("#f8f9fa"))));
        // The injected fill is live only.
        assert_eq!(shape.remembered_fill, None);
    }

    #[test]
    fn test_disabling_fill_alone_does_not_inject() {
        let defaults = StyleDefaults::default();
        let mut shape = shape_with(None, Some(Fill::new("#abcdef")));

        apply_style_change(&mut shape, &StyleChange::new().disable_fill(), &defaults);
        assert!(shape.paths.iter().all(|p| p.is_invisible()));
        assert_eq!(shape.remembered_fill, Some(Fill::new("#abcdef")));

        apply_style_change(&mut shape, &StyleChange::new().fill(FillSpec::default()), &defaults);
        assert_eq!(shape.fill(), Some(&Fill::new("#abcdef")));
    }

    #[test]
    fn test_disable_twice_keeps_memory() {
        let defaults = StyleDefaults::default();
        let mut shape = shape_with(Some(Stroke::new("#ff0000", 5.0)), Some(Fill::new("#fff")));

        apply_style_change(&mut shape, &StyleChange::new().disable_stroke(), &defaults);
        apply_style_change(&mut shape, &StyleChange::new().disable_stroke(), &defaults);
        assert_eq!(shape.remembered_stroke, Some(Stroke::new("#ff0000", 5.0)));
    }

    #[test]
    fn test_transparency_is_clamped() {
        let defaults = StyleDefaults::default();
        let mut shape = shape_with(None, None);
        apply_style_change(&mut shape, &StyleChange::new().transparency(3.0), &defaults);
        assert_eq!(shape.transparency, Some(1.0));

        apply_style_change(&mut shape, &StyleChange::new().transparency(f64::NAN), &defaults);
        assert_eq!(shape.transparency, Some(1.0));
    }

    #[test]
    fn test_change_json_distinguishes_absent_and_null() {
        let change: StyleChange = serde_json::from_str(r#"{"stroke": null}"#).unwrap();
        assert_eq!(change.stroke, StylePatch::Disable);
        assert_eq!(change.fill, StylePatch::Unchanged);

        let change: StyleChange =
            serde_json::from_str(r##"{"fill": {"color": "#000"}, "transparency": 0.5}"##).unwrap();
        assert_eq!(change.fill, StylePatch::Set(FillSpec::default().color("#000")));
        assert!(change.stroke.is_unchanged());
        assert_eq!(change.describe(), "Update fill");
    }
}
