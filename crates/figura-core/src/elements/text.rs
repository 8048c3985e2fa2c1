//! Text element.

use super::ElementTrait;
use crate::geometry::Bounds;
use crate::id::ElementId;
use serde::{Deserialize, Serialize};

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// Flip between normal and bold.
    pub fn toggled(self) -> Self {
        match self {
            FontWeight::Normal => FontWeight::Bold,
            FontWeight::Bold => FontWeight::Normal,
        }
    }
}

/// A text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub(crate) id: ElementId,
    pub bounds: Bounds,
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    pub color: String,
    #[serde(default)]
    pub font_weight: FontWeight,
    pub font_family: String,
}

impl Text {
    /// Default font size (M = Medium).
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;
    pub const DEFAULT_COLOR: &'static str = "#000000";
    pub const DEFAULT_FONT_FAMILY: &'static str = "sans-serif";

    /// Create a new text element with default styling.
    pub fn new(bounds: Bounds, content: String) -> Self {
        Self {
            id: ElementId::new(),
            bounds,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            color: Self::DEFAULT_COLOR.to_string(),
            font_weight: FontWeight::default(),
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
        }
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = weight;
        self
    }

    /// Rough layout size of `content` at `font_size`.
    ///
    /// Used to size new text boxes before a renderer has measured them.
    pub fn approximate_size(content: &str, font_size: f64, weight: FontWeight) -> (f64, f64) {
        let widest = content.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let char_width_factor = match weight {
            FontWeight::Normal => 0.55,
            FontWeight::Bold => 0.6,
        };
        let mut lines = content.lines().count().max(1);
        if content.ends_with('\n') {
            lines += 1;
        }
        (
            widest as f64 * font_size * char_width_factor,
            lines as f64 * font_size * 1.2,
        )
    }
}

impl ElementTrait for Text {
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
