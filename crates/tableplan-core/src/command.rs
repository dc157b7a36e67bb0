//! Enumerable mutation surface of the editor.
//!
//! Every discrete user action becomes one [`Command`], consumed by
//! [`EditorState::apply`](crate::editor::EditorState::apply). This keeps the
//! set of possible scene mutations testable independent of any UI toolkit.

use crate::element::{ElementId, ElementType};
use kurbo::{Point, Size, Vec2};

/// A discrete scene mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Place a new element of the given type.
    Create {
        element_type: ElementType,
        position: Point,
    },
    /// Move elements by a delta (keyboard nudges, programmatic moves).
    Move { ids: Vec<ElementId>, delta: Vec2 },
    /// Resize an element to a target bounding box.
    Resize { id: ElementId, size: Size },
    /// Rotate an element to an absolute angle in degrees.
    Rotate { id: ElementId, degrees: f64 },
    /// Delete one or more elements.
    Delete { ids: Vec<ElementId> },
    /// Clone an element with a fresh id and an offset.
    Duplicate { id: ElementId },
    /// Replace the text of a label element, or the caption of any other.
    SetLabel { id: ElementId, text: String },
    /// Raise an element to the top of the z-order.
    BringToFront { id: ElementId },
    /// Lower an element to the bottom of the z-order.
    SendToBack { id: ElementId },
    /// Remove every element, keeping the viewport.
    Clear,
}
