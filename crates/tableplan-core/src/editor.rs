//! Editor state: one owner for scene, history, and selection.
//!
//! There are no ambient globals; everything a gesture needs lives here and
//! is passed by reference to the pieces that mutate it.

use crate::command::Command;
use crate::element::ElementId;
use crate::history::History;
use crate::scene::{GeometryPatch, SceneDocument, SceneGraph};
use kurbo::Point;

/// Current interaction mode of the controller (see `controller` module for
/// the transitions).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionMode {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Pointer down on an element, not yet moved.
    Selecting { pressed: ElementId, start: Point },
    /// Moving the selection with the pointer.
    Dragging {
        start: Point,
        /// Original positions keyed by element id, for preview and revert.
        origins: Vec<(ElementId, Point)>,
    },
    /// Scaling one element from a gesture anchor.
    Resizing {
        id: ElementId,
        start: Point,
        original_size: kurbo::Size,
    },
    /// Rotating one element around its center.
    Rotating { id: ElementId, original_degrees: f64 },
    /// Panning the viewport (pointer down on empty canvas).
    Panning { last_screen: Point },
    /// Editing the text content of an element.
    EditingLabel { id: ElementId },
}

/// Complete state of one editing session.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub scene: SceneGraph,
    pub history: History,
    /// Active element ids, in selection order.
    selection: Vec<ElementId>,
    pub mode: InteractionMode,
    /// Monotonic mutation counter; bumps on every committed change.
    revision: u64,
}

impl EditorState {
    /// Create an editor over an empty scene.
    pub fn new() -> Self {
        Self::from_scene(SceneGraph::new())
    }

    /// Create an editor over an existing scene graph.
    pub fn from_scene(scene: SceneGraph) -> Self {
        let mut history = History::new();
        history.record(&scene.to_document());
        Self {
            scene,
            history,
            selection: Vec::new(),
            mode: InteractionMode::Idle,
            revision: 0,
        }
    }

    /// Hydrate an editor from a host-supplied load payload.
    ///
    /// Absent or malformed input resolves to an empty, valid scene; the
    /// editor never fails to start over bad input.
    pub fn from_load_payload(payload: Option<&str>) -> Self {
        let scene = match payload {
            None => SceneGraph::new(),
            Some(json) => match SceneDocument::from_json(json) {
                Ok(doc) => SceneGraph::from_document(doc),
                Err(err) => {
                    log::warn!("malformed load payload, starting empty: {err}");
                    SceneGraph::new()
                }
            },
        };
        Self::from_scene(scene)
    }

    /// Mutation counter; compare against a saved revision for dirt tracking.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply a discrete command and record one history entry.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Create {
                element_type,
                position,
            } => {
                let id = self.scene.create_element(element_type, position);
                self.select_only(id);
            }
            Command::Move { ids, delta } => {
                for id in ids {
                    if let Some(element) = self.scene.element(id) {
                        let target = element.position + delta;
                        self.scene
                            .update_geometry(id, GeometryPatch::position(target));
                    }
                }
            }
            Command::Resize { id, size } => {
                self.scene.update_geometry(id, GeometryPatch::size(size));
            }
            Command::Rotate { id, degrees } => {
                self.scene
                    .update_geometry(id, GeometryPatch::rotation(degrees));
            }
            Command::Delete { ids } => {
                self.scene.remove_elements(&ids);
                self.selection.retain(|id| !ids.contains(id));
            }
            Command::Duplicate { id } => {
                if let Some(new_id) = self.scene.duplicate_element(id) {
                    self.select_only(new_id);
                }
            }
            Command::SetLabel { id, text } => self.scene.set_label(id, text),
            Command::BringToFront { id } => self.scene.bring_to_front(id),
            Command::SendToBack { id } => self.scene.send_to_back(id),
            Command::Clear => {
                self.scene.clear();
                self.selection.clear();
            }
        }
        self.commit();
    }

    /// Mutate geometry without recording history (gesture previews).
    pub fn preview_geometry(&mut self, id: ElementId, patch: GeometryPatch) {
        self.scene.update_geometry(id, patch);
    }

    /// Record the current state as one history entry (end of a gesture).
    pub fn commit(&mut self) {
        self.history.record(&self.scene.to_document());
        self.revision += 1;
    }

    /// Restore the previous history entry. Returns true if anything changed.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(doc) => {
                self.restore(doc);
                true
            }
            None => false,
        }
    }

    /// Restore the next history entry. Returns true if anything changed.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(doc) => {
                self.restore(doc);
                true
            }
            None => false,
        }
    }

    /// Whole-document swap; selection is pruned to surviving ids.
    fn restore(&mut self, doc: SceneDocument) {
        self.scene = SceneGraph::from_document(doc);
        self.selection.retain(|&id| self.scene.contains(id));
        self.mode = InteractionMode::Idle;
        self.revision += 1;
    }

    // --- selection -------------------------------------------------------

    /// Currently selected ids, in selection order.
    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    /// Select a single element, clearing any previous selection.
    pub fn select_only(&mut self, id: ElementId) {
        self.selection.clear();
        self.selection.push(id);
    }

    /// Add or remove an element from a multi-selection.
    pub fn toggle_selection(&mut self, id: ElementId) {
        if let Some(pos) = self.selection.iter().position(|&s| s == id) {
            self.selection.remove(pos);
        } else {
            self.selection.push(id);
        }
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Whether the element is selected.
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection.contains(&id)
    }
}
