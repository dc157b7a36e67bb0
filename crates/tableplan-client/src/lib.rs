//! Persistence client for tableplan scenes.
//!
//! Talks to the external storage boundary on behalf of the editor core:
//! explicit saves, periodic autosave, thumbnail/document export, and
//! linking scenes to business records. Nothing in here mutates the scene.

pub mod export;
pub mod http;
pub mod memory;
pub mod scheduler;
pub mod store;

pub use export::{render_svg, render_thumbnail, ExportError};
pub use http::HttpStore;
pub use memory::MemoryStore;
pub use scheduler::{SaveScheduler, DEFAULT_AUTOSAVE_INTERVAL};
pub use store::{BoxFuture, SaveAck, SceneStore, StoreError, StoreResult};
