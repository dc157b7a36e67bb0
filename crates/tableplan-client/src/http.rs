//! HTTP backend for the scene store.

use crate::store::{BoxFuture, SaveAck, SceneStore, StoreError, StoreResult};
use serde::Deserialize;
use tableplan_core::scene::SceneDocument;

/// Scene store backed by the application's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

/// Body of a successful save response.
#[derive(Debug, Deserialize)]
struct SaveResponse {
    /// Present when the backend assigned a new scene id.
    #[serde(default)]
    id: Option<String>,
}

impl HttpStore {
    /// Create a store against an API base URL (e.g. `https://host/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a store with a preconfigured client (timeouts, auth headers).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/scenes{}", self.base_url, path)
    }

    fn check_status(status: reqwest::StatusCode) -> StoreResult<()> {
        if status.is_success() {
            Ok(())
        } else {
            Err(StoreError::Status(status.as_u16()))
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Network(err.to_string())
    }
}

impl SceneStore for HttpStore {
    fn save(&self, document: &SceneDocument) -> BoxFuture<'_, StoreResult<SaveAck>> {
        let url = match &document.id {
            Some(id) => self.endpoint(&format!("/{id}")),
            None => self.endpoint(""),
        };
        let existing_id = document.id.clone();
        let document = document.clone();
        Box::pin(async move {
            let response = self.client.post(&url).json(&document).send().await?;
            Self::check_status(response.status())?;
            let body: SaveResponse = response.json().await?;
            let scene_id = body
                .id
                .or(existing_id)
                .ok_or_else(|| StoreError::Protocol("save response missing scene id".into()))?;
            Ok(SaveAck { scene_id })
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StoreResult<SceneDocument>> {
        let url = self.endpoint(&format!("/{id}"));
        let id = id.to_string();
        Box::pin(async move {
            let response = self.client.get(&url).send().await?;
            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                log::warn!("scene {id} not found, starting from an empty document");
                return Ok(SceneDocument::default());
            }
            Self::check_status(status)?;
            let text = response.text().await?;
            match SceneDocument::from_json(&text) {
                Ok(doc) => Ok(doc),
                Err(err) => {
                    log::warn!("malformed payload for scene {id}, starting empty: {err}");
                    Ok(SceneDocument::default())
                }
            }
        })
    }

    fn export_image(&self, id: &str, png: Vec<u8>) -> BoxFuture<'_, StoreResult<()>> {
        let url = self.endpoint(&format!("/{id}/thumbnail"));
        Box::pin(async move {
            let response = self
                .client
                .post(&url)
                .header(reqwest::header::CONTENT_TYPE, "image/png")
                .body(png)
                .send()
                .await?;
            Self::check_status(response.status())
        })
    }

    fn export_document(&self, id: &str, svg: String) -> BoxFuture<'_, StoreResult<()>> {
        let url = self.endpoint(&format!("/{id}/export"));
        Box::pin(async move {
            let response = self
                .client
                .post(&url)
                .header(reqwest::header::CONTENT_TYPE, "image/svg+xml")
                .body(svg)
                .send()
                .await?;
            Self::check_status(response.status())
        })
    }

    fn assign(&self, scene_id: &str, record_id: &str) -> BoxFuture<'_, StoreResult<()>> {
        let url = self.endpoint(&format!("/{scene_id}/assign"));
        let body = serde_json::json!({ "record_id": record_id });
        Box::pin(async move {
            let response = self.client.post(&url).json(&body).send().await?;
            Self::check_status(response.status())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = HttpStore::new("https://example.com/api///");
        assert_eq!(store.endpoint(""), "https://example.com/api/scenes");
        assert_eq!(
            store.endpoint("/abc/thumbnail"),
            "https://example.com/api/scenes/abc/thumbnail"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert!(HttpStore::check_status(reqwest::StatusCode::OK).is_ok());
        assert!(matches!(
            HttpStore::check_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
            Err(StoreError::Status(500))
        ));
    }
}
