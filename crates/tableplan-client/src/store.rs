//! Storage abstraction for scene persistence.

use std::future::Future;
use std::pin::Pin;
use tableplan_core::scene::SceneDocument;
use thiserror::Error;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("scene not found: {0}")]
    NotFound(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("scene has no identifier")]
    MissingSceneId,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future for async store operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Server acknowledgment of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveAck {
    /// Identifier of the saved scene. For a previously unsaved scene this
    /// is assigned by the backend.
    pub scene_id: String,
}

/// A backend that can persist scene documents.
///
/// Implementations talk HTTP in production and stay in memory for tests.
pub trait SceneStore: Send + Sync {
    /// Persist a document. The document's own `id` decides between
    /// creating a new scene and overwriting an existing one.
    fn save(&self, document: &SceneDocument) -> BoxFuture<'_, StoreResult<SaveAck>>;

    /// Fetch a document by scene id.
    ///
    /// A missing or malformed payload resolves to an empty valid document;
    /// load never fails over content.
    fn load(&self, id: &str) -> BoxFuture<'_, StoreResult<SceneDocument>>;

    /// Submit a rendered PNG thumbnail for a saved scene. One-way; success
    /// or failure is independent of the geometry save.
    fn export_image(&self, id: &str, png: Vec<u8>) -> BoxFuture<'_, StoreResult<()>>;

    /// Submit a rendered SVG document for a saved scene. One-way.
    fn export_document(&self, id: &str, svg: String) -> BoxFuture<'_, StoreResult<()>>;

    /// Link a saved scene to an external business record.
    fn assign(&self, scene_id: &str, record_id: &str) -> BoxFuture<'_, StoreResult<()>>;
}
