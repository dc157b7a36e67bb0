//! In-memory store for tests and offline use.

use crate::store::{BoxFuture, SaveAck, SceneStore, StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::RwLock;
use tableplan_core::scene::SceneDocument;

/// Scene store held entirely in memory.
///
/// Assigns `scene-N` identifiers on first save and can be switched into a
/// failing mode to exercise retry paths.
#[derive(Default)]
pub struct MemoryStore {
    scenes: RwLock<HashMap<String, SceneDocument>>,
    assignments: RwLock<HashMap<String, String>>,
    thumbnails: RwLock<HashMap<String, Vec<u8>>>,
    documents: RwLock<HashMap<String, String>>,
    next_id: AtomicU64,
    save_count: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with a simulated network error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful saves performed.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// The record id a scene was assigned to, if any.
    pub fn assignment(&self, scene_id: &str) -> Option<String> {
        self.assignments
            .read()
            .ok()
            .and_then(|map| map.get(scene_id).cloned())
    }

    /// Thumbnail bytes submitted for a scene, if any.
    pub fn thumbnail(&self, scene_id: &str) -> Option<Vec<u8>> {
        self.thumbnails
            .read()
            .ok()
            .and_then(|map| map.get(scene_id).cloned())
    }

    /// Seed a scene directly, bypassing id assignment.
    pub fn put(&self, id: &str, document: SceneDocument) {
        if let Ok(mut scenes) = self.scenes.write() {
            scenes.insert(id.to_string(), document);
        }
    }

    fn check_failing(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Network("simulated failure".into()))
        } else {
            Ok(())
        }
    }

    fn lock_err(what: &str) -> StoreError {
        StoreError::Protocol(format!("poisoned lock: {what}"))
    }
}

impl SceneStore for MemoryStore {
    fn save(&self, document: &SceneDocument) -> BoxFuture<'_, StoreResult<SaveAck>> {
        let mut document = document.clone();
        Box::pin(async move {
            self.check_failing()?;
            let scene_id = match document.id.clone() {
                Some(id) => id,
                None => {
                    let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                    format!("scene-{n}")
                }
            };
            document.id = Some(scene_id.clone());
            let mut scenes = self
                .scenes
                .write()
                .map_err(|_| Self::lock_err("scenes"))?;
            scenes.insert(scene_id.clone(), document);
            self.save_count.fetch_add(1, Ordering::SeqCst);
            Ok(SaveAck { scene_id })
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StoreResult<SceneDocument>> {
        let id = id.to_string();
        Box::pin(async move {
            self.check_failing()?;
            let scenes = self.scenes.read().map_err(|_| Self::lock_err("scenes"))?;
            match scenes.get(&id) {
                Some(doc) => Ok(doc.clone()),
                None => {
                    log::warn!("scene {id} not found, starting from an empty document");
                    Ok(SceneDocument::default())
                }
            }
        })
    }

    fn export_image(&self, id: &str, png: Vec<u8>) -> BoxFuture<'_, StoreResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            self.check_failing()?;
            let mut thumbnails = self
                .thumbnails
                .write()
                .map_err(|_| Self::lock_err("thumbnails"))?;
            thumbnails.insert(id, png);
            Ok(())
        })
    }

    fn export_document(&self, id: &str, svg: String) -> BoxFuture<'_, StoreResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            self.check_failing()?;
            let mut documents = self
                .documents
                .write()
                .map_err(|_| Self::lock_err("documents"))?;
            documents.insert(id, svg);
            Ok(())
        })
    }

    fn assign(&self, scene_id: &str, record_id: &str) -> BoxFuture<'_, StoreResult<()>> {
        let scene_id = scene_id.to_string();
        let record_id = record_id.to_string();
        Box::pin(async move {
            self.check_failing()?;
            let scenes = self.scenes.read().map_err(|_| Self::lock_err("scenes"))?;
            if !scenes.contains_key(&scene_id) {
                return Err(StoreError::NotFound(scene_id));
            }
            drop(scenes);
            let mut assignments = self
                .assignments
                .write()
                .map_err(|_| Self::lock_err("assignments"))?;
            assignments.insert(scene_id, record_id);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        // Simple blocking executor; every MemoryStore future is ready
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {}
            }
        }
    }

    #[test]
    fn test_first_save_assigns_id() {
        let store = MemoryStore::new();
        let ack = block_on(store.save(&SceneDocument::default())).unwrap();
        assert_eq!(ack.scene_id, "scene-1");

        let loaded = block_on(store.load("scene-1")).unwrap();
        assert_eq!(loaded.id.as_deref(), Some("scene-1"));
    }

    #[test]
    fn test_save_with_id_overwrites() {
        let store = MemoryStore::new();
        let mut doc = SceneDocument::default();
        doc.id = Some("scene-9".to_string());
        doc.event_id = Some("event-1".to_string());
        block_on(store.save(&doc)).unwrap();

        doc.event_id = Some("event-2".to_string());
        let ack = block_on(store.save(&doc)).unwrap();
        assert_eq!(ack.scene_id, "scene-9");
        let loaded = block_on(store.load("scene-9")).unwrap();
        assert_eq!(loaded.event_id.as_deref(), Some("event-2"));
        assert_eq!(store.save_count(), 2);
    }

    #[test]
    fn test_load_missing_is_empty_document() {
        let store = MemoryStore::new();
        let doc = block_on(store.load("nope")).unwrap();
        assert!(doc.elements.is_empty());
        assert!(doc.id.is_none());
    }

    #[test]
    fn test_failing_mode() {
        let store = MemoryStore::new();
        store.set_failing(true);
        let result = block_on(store.save(&SceneDocument::default()));
        assert!(matches!(result, Err(StoreError::Network(_))));
        assert_eq!(store.save_count(), 0);

        store.set_failing(false);
        assert!(block_on(store.save(&SceneDocument::default())).is_ok());
    }

    #[test]
    fn test_assign_requires_saved_scene() {
        let store = MemoryStore::new();
        let result = block_on(store.assign("scene-1", "record-1"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));

        let ack = block_on(store.save(&SceneDocument::default())).unwrap();
        block_on(store.assign(&ack.scene_id, "record-1")).unwrap();
        assert_eq!(store.assignment(&ack.scene_id).as_deref(), Some("record-1"));
    }

    #[test]
    fn test_export_artifacts_recorded() {
        let store = MemoryStore::new();
        block_on(store.export_image("scene-1", vec![1, 2, 3])).unwrap();
        block_on(store.export_document("scene-1", "<svg/>".to_string())).unwrap();
        assert_eq!(store.thumbnail("scene-1"), Some(vec![1, 2, 3]));
    }
}
