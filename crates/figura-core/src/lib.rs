//! Figura Core Library
//!
//! Editing core of the Figura vector editor: the document model, the
//! historied and live mutation tiers, undo/redo, style memory, resize
//! geometry and pointer drag sessions. Rendering, export codecs and
//! collaboration transports live outside this crate and talk to it through
//! [`DocumentStore`].

pub mod config;
pub mod document;
pub mod drag;
pub mod edit;
pub mod elements;
pub mod geometry;
pub mod history;
pub mod id;
pub mod normalize;
pub mod storage;
pub mod store;
pub mod style_memory;

pub use config::{ConfigError, EditorConfig};
pub use document::{Attributes, Document, DocumentError, ElementKind, ElementMut, ElementRef};
pub use drag::{DragController, DragMode, PointerEvent};
pub use edit::{Editor, ImageUpdate, LiveEditor, TextUpdate};
pub use elements::{
    Element, ElementTrait, Fill, FontWeight, Image, ImageFormat, Path, Shape, Stroke, Text,
};
pub use geometry::{Bounds, ResizeDirection, ViewBox, resize_bounds, resize_bounds_clamped};
pub use history::{Command, History, DEFAULT_HISTORY_CAPACITY};
pub use id::ElementId;
pub use normalize::Normalize;
pub use storage::{MemoryStorage, Storage, StorageError, StorageResult};
pub use store::{DocumentStore, Selection, StoreState, SubscriptionId};
pub use style_memory::{FillSpec, StrokeSpec, StyleChange, StyleDefaults, StylePatch};
