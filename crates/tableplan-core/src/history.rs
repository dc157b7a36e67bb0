//! Snapshot-based undo/redo over full scene documents.
//!
//! Each entry is a fully serialized document. Restoring always replaces the
//! whole scene (deserialize-and-swap), which keeps undo/redo correct no
//! matter what kind of mutation produced the entry.

use crate::scene::SceneDocument;

/// Maximum number of history entries per stack.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Bounded undo/redo stacks of serialized scene snapshots.
///
/// The top of the undo stack is always the live state, so undoing requires
/// at least two entries.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo: Vec<String>,
    redo: Vec<String>,
    capacity: usize,
}

impl History {
    /// Create an empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create an empty history with a custom capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record the document after a completed mutation.
    ///
    /// Clears the redo stack and evicts the oldest entry beyond capacity.
    pub fn record(&mut self, doc: &SceneDocument) {
        let snapshot = match doc.to_json() {
            Ok(json) => json,
            Err(err) => {
                log::error!("failed to serialize history snapshot: {err}");
                return;
            }
        };
        self.undo.push(snapshot);
        self.redo.clear();
        if self.undo.len() > self.capacity {
            self.undo.remove(0);
        }
    }

    /// Step back one entry, returning the document to restore.
    ///
    /// No-op (None) when there is nothing before the live state. A corrupt
    /// snapshot is discarded without touching the live state.
    pub fn undo(&mut self) -> Option<SceneDocument> {
        if self.undo.len() < 2 {
            return None;
        }
        let target_index = self.undo.len() - 2;
        match SceneDocument::from_json(&self.undo[target_index]) {
            Ok(doc) => {
                let current = self.undo.pop().expect("len checked above");
                self.redo.push(current);
                Some(doc)
            }
            Err(err) => {
                log::warn!("discarding corrupt undo snapshot: {err}");
                self.undo.remove(target_index);
                None
            }
        }
    }

    /// Step forward one entry, returning the document to restore.
    pub fn redo(&mut self) -> Option<SceneDocument> {
        let snapshot = self.redo.pop()?;
        match SceneDocument::from_json(&snapshot) {
            Ok(doc) => {
                self.undo.push(snapshot);
                if self.undo.len() > self.capacity {
                    self.undo.remove(0);
                }
                Some(doc)
            }
            Err(err) => {
                log::warn!("discarding corrupt redo snapshot: {err}");
                None
            }
        }
    }

    /// Whether an undo step is available.
    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    /// Whether a redo step is available.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undo entries currently held (including the live state).
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;
    use crate::scene::SceneGraph;
    use kurbo::Point;

    fn doc_with_elements(n: usize) -> SceneDocument {
        let mut scene = SceneGraph::new();
        for i in 0..n {
            scene.create_element(ElementType::Chair, Point::new(100.0 + 20.0 * i as f64, 100.0));
        }
        scene.to_document()
    }

    #[test]
    fn test_undo_requires_two_entries() {
        let mut history = History::new();
        assert!(history.undo().is_none());
        history.record(&doc_with_elements(0));
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_undo_redo_inverse() {
        let mut history = History::new();
        let docs: Vec<_> = (0..4).map(doc_with_elements).collect();
        for doc in &docs {
            history.record(doc);
        }

        // Undo back to the initial state
        for i in (0..3).rev() {
            let restored = history.undo().expect("undo available");
            assert_eq!(restored.elements.len(), docs[i].elements.len());
        }
        assert!(!history.can_undo());

        // Redo all the way forward again
        for i in 1..4 {
            let restored = history.redo().expect("redo available");
            assert_eq!(restored.elements.len(), docs[i].elements.len());
        }
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new();
        history.record(&doc_with_elements(0));
        history.record(&doc_with_elements(1));
        history.undo().unwrap();
        assert!(history.can_redo());

        history.record(&doc_with_elements(2));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_bounded_fifo_eviction() {
        let mut history = History::new();
        for i in 0..=60 {
            history.record(&doc_with_elements(i % 8));
        }
        assert_eq!(history.undo_depth(), DEFAULT_HISTORY_CAPACITY);

        // Oldest entries were dropped: undoing to the bottom lands on entry
        // 11 (the 50th from the end), not entry 0.
        let mut last = None;
        while let Some(doc) = history.undo() {
            last = Some(doc);
        }
        assert_eq!(last.unwrap().elements.len(), 11 % 8);
    }

    #[test]
    fn test_corrupt_undo_snapshot_discarded() {
        let mut history = History::new();
        history.record(&doc_with_elements(1));
        history.undo.insert(0, "{not json".to_string());
        history.record(&doc_with_elements(2));

        // Target snapshot (the middle one is fine) — first undo works
        assert!(history.undo().is_some());
        // Now the corrupt entry is the target: the operation is rejected
        // and the entry dropped, leaving the live state untouched.
        assert!(history.undo().is_none());
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_corrupt_redo_snapshot_discarded() {
        let mut history = History::new();
        history.record(&doc_with_elements(1));
        history.redo.push("garbage".to_string());
        assert!(history.redo().is_none());
        assert!(!history.can_redo());
    }
}
