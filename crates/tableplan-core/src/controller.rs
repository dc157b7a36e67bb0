//! Pointer and keyboard handling for [`EditorState`].
//!
//! The host shell translates raw UI events into these calls; everything
//! here works in screen coordinates and converts through the viewport.
//! Gestures preview continuously and record exactly one history entry
//! when they complete.

use crate::command::Command;
use crate::editor::{EditorState, InteractionMode};
use crate::element::ElementId;
use crate::scene::GeometryPatch;
use crate::snap::{normalize_angle, snap_angle, snap_point, ANGLE_STEP, GRID_SIZE};
use kurbo::{Point, Size, Vec2};

/// Pointer travel (scene units) before a press becomes a drag.
const DRAG_THRESHOLD: f64 = 3.0;

/// Keyboard nudge distance in scene units.
const NUDGE_STEP: f64 = 1.0;
/// Nudge distance with shift held.
const NUDGE_STEP_LARGE: f64 = 10.0;

/// Which pointer button went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// Keys the editor core reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Delete,
    Backspace,
    Escape,
}

impl EditorState {
    /// Handle a pointer press at a screen position.
    pub fn pointer_down(&mut self, screen: Point, button: PointerButton, modifiers: Modifiers) {
        if self.mode != InteractionMode::Idle {
            return;
        }
        let scene_point = self.scene.viewport.screen_to_scene(screen);

        // Middle button always pans, as does any press on empty canvas.
        if button == PointerButton::Middle {
            self.mode = InteractionMode::Panning { last_screen: screen };
            return;
        }
        if button == PointerButton::Secondary {
            return;
        }

        match self.scene.elements_at_point(scene_point, 0.0).first() {
            Some(&hit) => {
                if modifiers.shift {
                    self.toggle_selection(hit);
                } else {
                    if !self.is_selected(hit) {
                        self.select_only(hit);
                    }
                    self.mode = InteractionMode::Selecting {
                        pressed: hit,
                        start: scene_point,
                    };
                }
            }
            None => {
                if !modifiers.shift {
                    self.clear_selection();
                }
                self.mode = InteractionMode::Panning { last_screen: screen };
            }
        }
    }

    /// Handle pointer movement at a screen position.
    pub fn pointer_move(&mut self, screen: Point) {
        let scene_point = self.scene.viewport.screen_to_scene(screen);

        match self.mode.clone() {
            InteractionMode::Selecting { start, .. } => {
                if (scene_point - start).hypot() < DRAG_THRESHOLD {
                    return;
                }
                // Promote to a drag of the whole selection.
                let origins: Vec<(ElementId, Point)> = self
                    .selection()
                    .iter()
                    .filter_map(|&id| self.scene.element(id).map(|e| (id, e.position)))
                    .collect();
                self.mode = InteractionMode::Dragging { start, origins };
                self.pointer_move(screen);
            }
            InteractionMode::Dragging { start, origins } => {
                let delta = scene_point - start;
                let snapping = self.scene.viewport.snap_to_grid;
                for (id, origin) in &origins {
                    let mut target = *origin + delta;
                    if snapping {
                        target = snap_point(target, GRID_SIZE);
                    }
                    self.preview_geometry(*id, GeometryPatch::position(target));
                }
            }
            InteractionMode::Resizing {
                id,
                start,
                original_size,
            } => {
                let Some(center) = self.scene.element(id).map(|e| e.center()) else {
                    self.mode = InteractionMode::Idle;
                    return;
                };
                let base = (start - center).hypot();
                if base < f64::EPSILON {
                    return;
                }
                let factor = (scene_point - center).hypot() / base;
                let target = Size::new(
                    original_size.width * factor,
                    original_size.height * factor,
                );
                self.preview_geometry(id, GeometryPatch::size(target));
            }
            InteractionMode::Rotating { id, .. } => {
                let Some(center) = self.scene.element(id).map(|e| e.center()) else {
                    self.mode = InteractionMode::Idle;
                    return;
                };
                let v = scene_point - center;
                // Pointing straight up from the center is zero degrees.
                let raw = v.y.atan2(v.x).to_degrees() + 90.0;
                let degrees = if self.scene.viewport.snap_to_grid {
                    snap_angle(raw, ANGLE_STEP)
                } else {
                    normalize_angle(raw)
                };
                self.preview_geometry(id, GeometryPatch::rotation(degrees));
            }
            InteractionMode::Panning { last_screen } => {
                self.scene.viewport.pan(screen - last_screen);
                self.mode = InteractionMode::Panning { last_screen: screen };
            }
            InteractionMode::Idle | InteractionMode::EditingLabel { .. } => {}
        }
    }

    /// Handle pointer release. Completed gestures commit one history entry.
    pub fn pointer_up(&mut self, _screen: Point) {
        match std::mem::take(&mut self.mode) {
            InteractionMode::Dragging { .. }
            | InteractionMode::Resizing { .. }
            | InteractionMode::Rotating { .. } => self.commit(),
            // Clicks, pans, and label editing record nothing.
            InteractionMode::Selecting { .. }
            | InteractionMode::Panning { .. }
            | InteractionMode::Idle => {}
            editing @ InteractionMode::EditingLabel { .. } => self.mode = editing,
        }
    }

    /// Start a resize gesture from a handle grab at a scene position.
    pub fn begin_resize(&mut self, id: ElementId, start: Point) {
        if let Some(element) = self.scene.element(id) {
            self.mode = InteractionMode::Resizing {
                id,
                start,
                original_size: element.size(),
            };
        }
    }

    /// Start a rotation gesture from a handle grab.
    pub fn begin_rotate(&mut self, id: ElementId) {
        if let Some(element) = self.scene.element(id) {
            self.mode = InteractionMode::Rotating {
                id,
                original_degrees: element.rotation,
            };
        }
    }

    /// Enter label editing on an element.
    pub fn begin_label_edit(&mut self, id: ElementId) {
        if self.scene.contains(id) {
            self.mode = InteractionMode::EditingLabel { id };
        }
    }

    /// Finish label editing, applying the new text.
    pub fn commit_label_edit(&mut self, text: String) {
        if let InteractionMode::EditingLabel { id } = self.mode {
            self.mode = InteractionMode::Idle;
            self.apply(Command::SetLabel { id, text });
        }
    }

    /// Abandon label editing without changes.
    pub fn cancel_label_edit(&mut self) {
        if matches!(self.mode, InteractionMode::EditingLabel { .. }) {
            self.mode = InteractionMode::Idle;
        }
    }

    /// Handle a key press. Returns true when the editor consumed it.
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> bool {
        if matches!(self.mode, InteractionMode::EditingLabel { .. }) {
            // Text input owns the keyboard while a label is being edited.
            return false;
        }
        let step = if modifiers.shift {
            NUDGE_STEP_LARGE
        } else {
            NUDGE_STEP
        };
        match key {
            Key::ArrowLeft => self.nudge(Vec2::new(-step, 0.0)),
            Key::ArrowRight => self.nudge(Vec2::new(step, 0.0)),
            Key::ArrowUp => self.nudge(Vec2::new(0.0, -step)),
            Key::ArrowDown => self.nudge(Vec2::new(0.0, step)),
            Key::Delete | Key::Backspace => {
                if self.selection().is_empty() {
                    return false;
                }
                let ids = self.selection().to_vec();
                self.apply(Command::Delete { ids });
                true
            }
            Key::Escape => self.cancel_gesture(),
        }
    }

    /// Zoom around the cursor. Factors above 1.0 zoom in.
    pub fn wheel_zoom(&mut self, screen: Point, factor: f64) {
        self.scene.viewport.zoom_at(screen, factor);
    }

    fn nudge(&mut self, delta: Vec2) -> bool {
        if self.selection().is_empty() {
            return false;
        }
        let ids = self.selection().to_vec();
        self.apply(Command::Move { ids, delta });
        true
    }

    /// Abort the gesture in progress, reverting any preview mutations.
    ///
    /// With no gesture active, Escape clears the selection instead.
    fn cancel_gesture(&mut self) -> bool {
        match std::mem::take(&mut self.mode) {
            InteractionMode::Dragging { origins, .. } => {
                for (id, origin) in origins {
                    self.preview_geometry(id, GeometryPatch::position(origin));
                }
                true
            }
            InteractionMode::Resizing {
                id, original_size, ..
            } => {
                self.preview_geometry(id, GeometryPatch::size(original_size));
                true
            }
            InteractionMode::Rotating {
                id,
                original_degrees,
            } => {
                self.preview_geometry(id, GeometryPatch::rotation(original_degrees));
                true
            }
            InteractionMode::Selecting { .. }
            | InteractionMode::Panning { .. }
            | InteractionMode::EditingLabel { .. } => true,
            InteractionMode::Idle => {
                if self.selection().is_empty() {
                    false
                } else {
                    self.clear_selection();
                    true
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;

    fn editor_with(element_type: ElementType, position: Point) -> (EditorState, ElementId) {
        let mut editor = EditorState::new();
        editor.apply(Command::Create {
            element_type,
            position,
        });
        let id = editor.selection()[0];
        editor.clear_selection();
        editor.mode = InteractionMode::Idle;
        (editor, id)
    }

    #[test]
    fn test_click_selects_topmost() {
        let (mut editor, id) = editor_with(ElementType::RoundTable, Point::new(200.0, 200.0));
        editor.pointer_down(
            Point::new(260.0, 260.0),
            PointerButton::Primary,
            Modifiers::default(),
        );
        editor.pointer_up(Point::new(260.0, 260.0));
        assert_eq!(editor.selection(), &[id]);
        assert_eq!(editor.mode, InteractionMode::Idle);
    }

    #[test]
    fn test_click_empty_clears_selection_and_pans() {
        let (mut editor, id) = editor_with(ElementType::Chair, Point::new(200.0, 200.0));
        editor.select_only(id);
        editor.pointer_down(
            Point::new(900.0, 900.0),
            PointerButton::Primary,
            Modifiers::default(),
        );
        assert!(editor.selection().is_empty());
        assert!(matches!(editor.mode, InteractionMode::Panning { .. }));

        editor.pointer_move(Point::new(910.0, 880.0));
        assert_eq!(editor.scene.viewport.offset, Vec2::new(10.0, -20.0));
        editor.pointer_up(Point::new(910.0, 880.0));
        // Panning leaves no history entry
        assert!(!editor.history.can_undo());
    }

    #[test]
    fn test_shift_click_toggles_selection() {
        let (mut editor, a) = editor_with(ElementType::Chair, Point::new(100.0, 100.0));
        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        editor.pointer_down(Point::new(110.0, 110.0), PointerButton::Primary, shift);
        assert_eq!(editor.selection(), &[a]);
        editor.pointer_up(Point::new(110.0, 110.0));
        editor.pointer_down(Point::new(110.0, 110.0), PointerButton::Primary, shift);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_drag_moves_with_snap_and_single_history_entry() {
        let (mut editor, id) = editor_with(ElementType::RectTable, Point::new(100.0, 100.0));
        let depth_before = editor.history.undo_depth();

        editor.pointer_down(
            Point::new(110.0, 110.0),
            PointerButton::Primary,
            Modifiers::default(),
        );
        editor.pointer_move(Point::new(145.0, 128.0));
        editor.pointer_move(Point::new(171.0, 133.0));
        editor.pointer_up(Point::new(171.0, 133.0));

        // Origin (100,100) plus delta (61,23), snapped to the 20 grid
        let el = editor.scene.element(id).unwrap();
        assert_eq!(el.position, Point::new(160.0, 120.0));
        assert_eq!(editor.history.undo_depth(), depth_before + 1);
        assert_eq!(editor.mode, InteractionMode::Idle);
    }

    #[test]
    fn test_small_movement_is_a_click_not_a_drag() {
        let (mut editor, id) = editor_with(ElementType::RectTable, Point::new(100.0, 100.0));
        let depth_before = editor.history.undo_depth();

        editor.pointer_down(
            Point::new(110.0, 110.0),
            PointerButton::Primary,
            Modifiers::default(),
        );
        editor.pointer_move(Point::new(111.0, 110.5));
        editor.pointer_up(Point::new(111.0, 110.5));

        assert_eq!(
            editor.scene.element(id).unwrap().position,
            Point::new(100.0, 100.0)
        );
        assert_eq!(editor.history.undo_depth(), depth_before);
    }

    #[test]
    fn test_escape_reverts_drag() {
        let (mut editor, id) = editor_with(ElementType::Stage, Point::new(200.0, 200.0));
        editor.pointer_down(
            Point::new(240.0, 240.0),
            PointerButton::Primary,
            Modifiers::default(),
        );
        editor.pointer_move(Point::new(340.0, 300.0));
        assert_ne!(
            editor.scene.element(id).unwrap().position,
            Point::new(200.0, 200.0)
        );

        assert!(editor.key_down(Key::Escape, Modifiers::default()));
        assert_eq!(
            editor.scene.element(id).unwrap().position,
            Point::new(200.0, 200.0)
        );
        assert_eq!(editor.mode, InteractionMode::Idle);
    }

    #[test]
    fn test_resize_gesture_scales_from_center() {
        let (mut editor, id) = editor_with(ElementType::RectTable, Point::new(100.0, 100.0));
        // 120x60 at (100,100): center (160,130)
        editor.begin_resize(id, Point::new(220.0, 130.0));
        editor.pointer_move(Point::new(280.0, 130.0));
        editor.pointer_up(Point::new(280.0, 130.0));

        let size = editor.scene.element(id).unwrap().size();
        assert!((size.width - 240.0).abs() < 1e-9);
        assert!((size.height - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_gesture_snaps_to_step() {
        let (mut editor, id) = editor_with(ElementType::Buffet, Point::new(100.0, 100.0));
        let center = editor.scene.element(id).unwrap().center();
        editor.begin_rotate(id);
        // Pointer to the right of the center reads as 90 degrees; offset it a
        // few degrees to prove snapping
        let p = center + Vec2::new(100.0, 6.0);
        editor.pointer_move(editor.scene.viewport.scene_to_screen(p));
        editor.pointer_up(p);
        assert_eq!(editor.scene.element(id).unwrap().rotation, 90.0);
    }

    #[test]
    fn test_rotate_without_snap_is_free() {
        let (mut editor, id) = editor_with(ElementType::Buffet, Point::new(100.0, 100.0));
        editor.scene.viewport.snap_to_grid = false;
        let center = editor.scene.element(id).unwrap().center();
        editor.begin_rotate(id);
        let p = center + Vec2::new(100.0, 6.0);
        editor.pointer_move(editor.scene.viewport.scene_to_screen(p));
        let rotation = editor.scene.element(id).unwrap().rotation;
        assert!(rotation > 90.0 && rotation < 95.0);
    }

    #[test]
    fn test_nudge_keys() {
        let (mut editor, id) = editor_with(ElementType::Chair, Point::new(100.0, 100.0));
        editor.select_only(id);
        assert!(editor.key_down(Key::ArrowRight, Modifiers::default()));
        assert_eq!(
            editor.scene.element(id).unwrap().position,
            Point::new(101.0, 100.0)
        );
        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        assert!(editor.key_down(Key::ArrowUp, shift));
        assert_eq!(
            editor.scene.element(id).unwrap().position,
            Point::new(101.0, 90.0)
        );
    }

    #[test]
    fn test_nudge_without_selection_not_consumed() {
        let (mut editor, _) = editor_with(ElementType::Chair, Point::new(100.0, 100.0));
        assert!(!editor.key_down(Key::ArrowLeft, Modifiers::default()));
    }

    #[test]
    fn test_delete_key_removes_selection() {
        let (mut editor, id) = editor_with(ElementType::DjBooth, Point::new(300.0, 300.0));
        editor.select_only(id);
        assert!(editor.key_down(Key::Delete, Modifiers::default()));
        assert!(editor.scene.is_empty());
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_label_edit_flow() {
        let (mut editor, id) = editor_with(ElementType::Label, Point::new(300.0, 300.0));
        editor.begin_label_edit(id);
        assert!(matches!(editor.mode, InteractionMode::EditingLabel { .. }));
        // Keys are not consumed while editing text
        assert!(!editor.key_down(Key::Delete, Modifiers::default()));

        editor.commit_label_edit("Buffet line".to_string());
        assert_eq!(editor.mode, InteractionMode::Idle);
        match &editor.scene.element(id).unwrap().kind {
            crate::element::ElementKind::Label { text, .. } => assert_eq!(text, "Buffet line"),
            other => panic!("expected label, got {other:?}"),
        }
    }

    #[test]
    fn test_wheel_zoom_anchors_cursor() {
        let (mut editor, _) = editor_with(ElementType::Chair, Point::new(100.0, 100.0));
        let anchor = Point::new(400.0, 300.0);
        let before = editor.scene.viewport.screen_to_scene(anchor);
        editor.wheel_zoom(anchor, 1.25);
        let after = editor.scene.viewport.screen_to_scene(anchor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_middle_button_pans() {
        let (mut editor, _) = editor_with(ElementType::Chair, Point::new(100.0, 100.0));
        editor.pointer_down(
            Point::new(110.0, 110.0),
            PointerButton::Middle,
            Modifiers::default(),
        );
        assert!(matches!(editor.mode, InteractionMode::Panning { .. }));
    }
}
