//! Tableplan Core Library
//!
//! Platform-agnostic scene graph, selection, and history logic for the
//! tableplan floor-plan editor.

pub mod command;
pub mod controller;
pub mod editor;
pub mod element;
pub mod history;
pub mod scene;
pub mod snap;
pub mod viewport;

pub use command::Command;
pub use controller::{Key, Modifiers, PointerButton};
pub use editor::{EditorState, InteractionMode};
pub use element::{Element, ElementId, ElementKind, ElementStyle, ElementType};
pub use history::History;
pub use scene::{GeometryPatch, SceneDocument, SceneGraph};
pub use snap::{clamp_position, clamp_zoom, snap_angle, snap_point, snap_value, GRID_SIZE};
pub use viewport::Viewport;
