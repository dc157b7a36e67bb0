//! Scene document and graph management.

use crate::element::{Element, ElementId, ElementKind, ElementType, DUPLICATE_OFFSET};
use crate::snap::{clamp_position, clamp_zoom, snap_point, GRID_SIZE};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The unit of persistence: elements in z-order plus view state.
///
/// A document must always deserialize into a valid scene graph, even when
/// empty; every field has a default for that reason.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Storage identifier, assigned by the backend on first save.
    #[serde(default)]
    pub id: Option<String>,
    /// Optional linkage to an external event/business record.
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub viewport: Viewport,
    /// Elements in z-order (back to front).
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl SceneDocument {
    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A partial geometry change applied through [`SceneGraph::update_geometry`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryPatch {
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub rotation: Option<f64>,
}

impl GeometryPatch {
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn size(size: Size) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: Some(degrees),
            ..Self::default()
        }
    }
}

/// In-memory collection of placed elements plus the viewport.
///
/// Invariants: element ids are unique, and `z_order` is a total order
/// consistent with insertion sequence (creation and duplication always
/// insert at the top).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneGraph {
    pub id: Option<String>,
    pub event_id: Option<String>,
    pub viewport: Viewport,
    elements: HashMap<ElementId, Element>,
    z_order: Vec<ElementId>,
}

impl SceneGraph {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a scene graph from a document.
    ///
    /// Elements with duplicate ids are dropped (keeping the first) so the
    /// unique-id invariant holds even for hostile input.
    pub fn from_document(doc: SceneDocument) -> Self {
        let mut scene = Self {
            id: doc.id,
            event_id: doc.event_id,
            viewport: doc.viewport,
            elements: HashMap::with_capacity(doc.elements.len()),
            z_order: Vec::with_capacity(doc.elements.len()),
        };
        // Hydrated zoom obeys the same bounds as every mutation path; a
        // zero or non-finite zoom would poison the inverse transform.
        scene.viewport.zoom = clamp_zoom(scene.viewport.zoom);
        for element in doc.elements {
            if scene.elements.contains_key(&element.id) {
                log::warn!("dropping element with duplicate id {}", element.id);
                continue;
            }
            scene.z_order.push(element.id);
            scene.elements.insert(element.id, element);
        }
        scene
    }

    /// Capture the scene as a document (elements cloned in z-order).
    pub fn to_document(&self) -> SceneDocument {
        SceneDocument {
            id: self.id.clone(),
            event_id: self.event_id.clone(),
            viewport: self.viewport.clone(),
            elements: self.elements_ordered().cloned().collect(),
        }
    }

    /// Instantiate an element of `element_type` at `position`.
    ///
    /// The position is snapped when grid snapping is on, then clamped into
    /// the canvas. The new element goes on top of the z-order.
    pub fn create_element(&mut self, element_type: ElementType, position: Point) -> ElementId {
        let position = clamp_position(self.maybe_snap(position));
        let element = Element::new(element_type, position);
        let id = element.id;
        self.z_order.push(id);
        self.elements.insert(id, element);
        id
    }

    /// Insert an already-built element at the top of the z-order.
    ///
    /// Returns false (and leaves the scene untouched) if the id is taken.
    pub fn insert_element(&mut self, element: Element) -> bool {
        if self.elements.contains_key(&element.id) {
            return false;
        }
        self.z_order.push(element.id);
        self.elements.insert(element.id, element);
        true
    }

    /// Apply a partial geometry change.
    ///
    /// Silently a no-op when `id` is absent: selection state may lag a
    /// deletion within the same event-loop tick.
    pub fn update_geometry(&mut self, id: ElementId, patch: GeometryPatch) {
        let Some(element) = self.elements.get_mut(&id) else {
            log::debug!("update_geometry: no element {id}");
            return;
        };
        if let Some(position) = patch.position {
            element.position = clamp_position(position);
        }
        if let Some(size) = patch.size {
            element.kind.set_size(size);
        }
        if let Some(rotation) = patch.rotation {
            element.set_rotation(rotation);
        }
    }

    /// Replace the text of a label element, or the caption of any other.
    ///
    /// In-place: id and z-order position are preserved. Silent no-op when
    /// the id is absent.
    pub fn set_label(&mut self, id: ElementId, text: String) {
        let Some(element) = self.elements.get_mut(&id) else {
            log::debug!("set_label: no element {id}");
            return;
        };
        match &mut element.kind {
            ElementKind::Label { text: content, .. } => *content = text,
            _ => element.style.label = text,
        }
    }

    /// Remove one element. No error if the id is absent.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        self.z_order.retain(|&eid| eid != id);
        self.elements.remove(&id)
    }

    /// Remove a batch of elements (multi-select delete).
    pub fn remove_elements(&mut self, ids: &[ElementId]) {
        for &id in ids {
            self.remove_element(id);
        }
    }

    /// Clone an element with a fresh id, offset so it does not overlap the
    /// source, inserted at the top. Returns None if the id is absent.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<ElementId> {
        let mut copy = self.elements.get(&id)?.clone();
        copy.regenerate_id();
        copy.position = clamp_position(copy.position + Vec2::new(DUPLICATE_OFFSET, DUPLICATE_OFFSET));
        let new_id = copy.id;
        self.z_order.push(new_id);
        self.elements.insert(new_id, copy);
        Some(new_id)
    }

    /// Remove all elements, retaining viewport state.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.z_order.clear();
    }

    /// Get an element by id.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Whether an element with this id exists.
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Elements in z-order (back to front).
    pub fn elements_ordered(&self) -> impl Iterator<Item = &Element> {
        self.z_order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Ids of elements whose footprint contains the point, front to back.
    pub fn elements_at_point(&self, point: Point, tolerance: f64) -> Vec<ElementId> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|&id| {
                self.elements
                    .get(&id)
                    .filter(|e| e.hit_test(point, tolerance))
                    .map(|_| id)
            })
            .collect()
    }

    /// Ids of elements whose bounds intersect the rectangle, in z-order.
    pub fn elements_in_rect(&self, rect: Rect) -> Vec<ElementId> {
        self.z_order
            .iter()
            .filter_map(|&id| {
                self.elements
                    .get(&id)
                    .filter(|e| rect.intersect(e.bounds()).area() > 0.0)
                    .map(|_| id)
            })
            .collect()
    }

    /// Move an element to the top of the z-order.
    pub fn bring_to_front(&mut self, id: ElementId) {
        if self.elements.contains_key(&id) {
            self.z_order.retain(|&eid| eid != id);
            self.z_order.push(id);
        }
    }

    /// Move an element to the bottom of the z-order.
    pub fn send_to_back(&mut self, id: ElementId) {
        if self.elements.contains_key(&id) {
            self.z_order.retain(|&eid| eid != id);
            self.z_order.insert(0, id);
        }
    }

    /// Bounding box of all elements.
    pub fn bounds(&self) -> Option<Rect> {
        self.elements
            .values()
            .map(Element::bounds)
            .reduce(|acc, b| acc.union(b))
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the scene has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn maybe_snap(&self, point: Point) -> Point {
        if self.viewport.snap_to_grid {
            snap_point(point, GRID_SIZE)
        } else {
            point
        }
    }
}
