//! Image element referencing an external or embedded raster resource.

use super::ElementTrait;
use crate::geometry::Bounds;
use crate::id::ElementId;
use serde::{Deserialize, Serialize};

/// Image format of embedded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
    Svg,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Svg => "image/svg+xml",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            "gif" => Some(ImageFormat::Gif),
            "svg" => Some(ImageFormat::Svg),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // GIF87a / GIF89a
        if data.starts_with(b"GIF8") {
            return Some(ImageFormat::Gif);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        None
    }

    /// Encode raw bytes as a `data:` URI usable as an image `src`.
    pub fn data_uri(&self, data: &[u8]) -> String {
        use base64::{Engine, engine::general_purpose::STANDARD};
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(data))
    }
}

/// An image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: ElementId,
    pub bounds: Bounds,
    /// Opaque resource reference (URL or `data:` URI).
    pub src: String,
    /// Opacity in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl Image {
    /// Create a new image element with a fresh id.
    pub fn new(bounds: Bounds, src: String) -> Self {
        Self {
            id: ElementId::new(),
            bounds,
            src,
            opacity: None,
        }
    }

    /// Create an image embedding `data`, sniffing its format.
    ///
    /// Returns `None` when the bytes are not a recognized raster format.
    pub fn from_bytes(bounds: Bounds, data: &[u8]) -> Option<Self> {
        let format = ImageFormat::from_magic_bytes(data)?;
        Some(Self::new(bounds, format.data_uri(data)))
    }

    /// Decode the embedded bytes if `src` is a base64 `data:` URI.
    pub fn embedded_data(&self) -> Option<Vec<u8>> {
        use base64::{Engine, engine::general_purpose::STANDARD};
        let rest = self.src.strip_prefix("data:")?;
        let (_, payload) = rest.split_once(";base64,")?;
        STANDARD.decode(payload).ok()
    }

    /// Scale the image to fit within max dimensions while preserving aspect ratio.
    pub fn fit_within(mut self, max_width: f64, max_height: f64) -> Self {
        let Bounds { width, height, .. } = self.bounds;
        if width <= 0.0 || height <= 0.0 || (width <= max_width && height <= max_height) {
            return self;
        }
        let aspect = width / height;
        let target_aspect = max_width / max_height;

        if aspect > target_aspect {
            // Image is wider than target - fit to width
            self.bounds.width = max_width;
            self.bounds.height = max_width / aspect;
        } else {
            // Image is taller than target - fit to height
            self.bounds.height = max_height;
            self.bounds.width = max_height * aspect;
        }

        self
    }
}

impl ElementTrait for Image {
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
