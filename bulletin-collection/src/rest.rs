//! REST implementation of the collection source.
//!
//! Speaks the backend's JSON envelope over reqwest. Base URL and resource
//! path live in the config so tests can point a source at a local mock
//! server; the two per-collection oddities (the search parameter name and
//! the bulk id field) are config too, not subclasses.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{CollectionError, CollectionResult};
use crate::protocol::{
    ApiResponse, BulkDeleteData, ConflictData, ListPage, ResponseStatus, SearchData,
};
use crate::source::CollectionSource;
use bulletin_types::{Entity, EntityId, QueryParams};

/// Configuration for one REST collection endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestSourceConfig {
    /// Backend origin, e.g. `https://cms.example.edu`.
    pub base_url: String,
    /// Collection path, e.g. `/api/articles`.
    pub resource_path: String,
    /// Query parameter carrying the search keyword.
    pub search_param: String,
    /// Field name for the bulk-delete id array. File-backed collections
    /// use `filenames`.
    pub bulk_ids_field: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RestSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            resource_path: "/api/articles".to_string(),
            search_param: "search".to_string(),
            bulk_ids_field: "ids".to_string(),
            timeout_secs: 30,
        }
    }
}

impl RestSourceConfig {
    /// Config for a collection path on a backend origin.
    #[must_use]
    pub fn new(base_url: impl Into<String>, resource_path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            resource_path: resource_path.into(),
            ..Default::default()
        }
    }

    /// Overrides the search parameter name.
    #[must_use]
    pub fn with_search_param(mut self, search_param: impl Into<String>) -> Self {
        self.search_param = search_param.into();
        self
    }

    /// Overrides the bulk-delete id field name.
    #[must_use]
    pub fn with_bulk_ids_field(mut self, bulk_ids_field: impl Into<String>) -> Self {
        self.bulk_ids_field = bulk_ids_field.into();
        self
    }
}

/// REST-backed collection source.
///
/// `E` is the entity, `D` the create payload, `P` the patch payload.
pub struct RestCollectionSource<E, D, P> {
    config: RestSourceConfig,
    client: Client,
    token: Arc<RwLock<Option<String>>>,
    _marker: PhantomData<fn() -> (E, D, P)>,
}

impl<E, D, P> RestCollectionSource<E, D, P> {
    /// Creates a source for one collection endpoint.
    #[must_use]
    pub fn new(config: RestSourceConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create HTTP client");
        Self {
            config,
            client,
            token: Arc::new(RwLock::new(None)),
            _marker: PhantomData,
        }
    }

    /// Sets the bearer token attached to every request.
    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    /// Clears the bearer token.
    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.config.base_url, self.config.resource_path)
    }

    fn item_url(&self, id: &EntityId) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    fn bulk_url(&self) -> String {
        format!("{}/bulk-delete", self.collection_url())
    }

    async fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn query_pairs(params: &QueryParams) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), params.page.to_string()),
            ("limit".to_string(), params.limit.to_string()),
        ];
        if !params.status.is_all() {
            pairs.push(("status".to_string(), params.status.as_str().to_string()));
        }
        if let Some(category_id) = &params.category_id {
            pairs.push(("categoryId".to_string(), category_id.to_string()));
        }
        if let Some(author_id) = &params.author_id {
            pairs.push(("authorId".to_string(), author_id.to_string()));
        }
        pairs.push(("sortBy".to_string(), params.sort_by.clone()));
        pairs.push(("sortOrder".to_string(), params.sort_order.as_str().to_string()));
        if let Some(date_from) = params.date_from {
            pairs.push(("dateFrom".to_string(), date_from.format("%Y-%m-%d").to_string()));
        }
        if let Some(date_to) = params.date_to {
            pairs.push(("dateTo".to_string(), date_to.format("%Y-%m-%d").to_string()));
        }
        if let Some(featured) = params.featured {
            pairs.push(("featured".to_string(), featured.to_string()));
        }
        pairs
    }

    /// Maps a non-2xx response onto the error taxonomy. 409 bodies are
    /// parsed for referencing entities so the UI can link them.
    async fn error_for(response: Response) -> CollectionError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.to_string()
                } else {
                    body.clone()
                }
            });
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CollectionError::Auth(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                CollectionError::Validation(message)
            }
            StatusCode::CONFLICT => {
                let references = serde_json::from_str::<ApiResponse<ConflictData>>(&body)
                    .ok()
                    .and_then(|envelope| envelope.data)
                    .map(|data| data.references)
                    .unwrap_or_default();
                CollectionError::Conflict {
                    message,
                    references,
                }
            }
            _ => CollectionError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    fn unwrap_envelope<T>(envelope: ApiResponse<T>) -> CollectionResult<T> {
        match envelope.status {
            ResponseStatus::Success => envelope.data.ok_or_else(|| {
                CollectionError::Transport("response envelope missing data".to_string())
            }),
            ResponseStatus::Error => Err(CollectionError::Validation(
                envelope
                    .message
                    .unwrap_or_else(|| "request rejected".to_string()),
            )),
        }
    }

    async fn read_envelope<T: DeserializeOwned>(response: Response) -> CollectionResult<T> {
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| CollectionError::Transport(format!("failed to decode response: {e}")))?;
        Self::unwrap_envelope(envelope)
    }
}

#[async_trait]
impl<E, D, P> CollectionSource<E> for RestCollectionSource<E, D, P>
where
    E: Entity + DeserializeOwned,
    D: Serialize + Send + Sync,
    P: Serialize + Send + Sync,
{
    type Draft = D;
    type Patch = P;

    async fn fetch_page(&self, params: &QueryParams) -> CollectionResult<ListPage<E>> {
        debug!(path = %self.config.resource_path, page = params.page, "GET list");
        let request = self
            .client
            .get(self.collection_url())
            .query(&Self::query_pairs(params));
        let response = self
            .authorize(request)
            .await
            .send()
            .await
            .map_err(|e| CollectionError::Transport(format!("list request failed: {e}")))?;
        Self::read_envelope(response).await
    }

    async fn search(&self, keyword: &str, params: &QueryParams) -> CollectionResult<Vec<E>> {
        debug!(path = %self.config.resource_path, "GET search");
        let mut pairs = Self::query_pairs(params);
        pairs.push((self.config.search_param.clone(), keyword.to_string()));
        let request = self.client.get(self.collection_url()).query(&pairs);
        let response = self
            .authorize(request)
            .await
            .send()
            .await
            .map_err(|e| CollectionError::Transport(format!("search request failed: {e}")))?;
        let data: SearchData<E> = Self::read_envelope(response).await?;
        Ok(data.into_items())
    }

    async fn create(&self, draft: &D) -> CollectionResult<E> {
        debug!(path = %self.config.resource_path, "POST create");
        let request = self.client.post(self.collection_url()).json(draft);
        let response = self
            .authorize(request)
            .await
            .send()
            .await
            .map_err(|e| CollectionError::Transport(format!("create request failed: {e}")))?;
        Self::read_envelope(response).await
    }

    async fn update(&self, id: &EntityId, patch: &P) -> CollectionResult<E> {
        debug!(path = %self.config.resource_path, %id, "PATCH update");
        let request = self.client.patch(self.item_url(id)).json(patch);
        let response = self
            .authorize(request)
            .await
            .send()
            .await
            .map_err(|e| CollectionError::Transport(format!("update request failed: {e}")))?;
        Self::read_envelope(response).await
    }

    async fn delete(&self, id: &EntityId) -> CollectionResult<()> {
        debug!(path = %self.config.resource_path, %id, "DELETE item");
        let request = self.client.delete(self.item_url(id));
        let response = self
            .authorize(request)
            .await
            .send()
            .await
            .map_err(|e| CollectionError::Transport(format!("delete request failed: {e}")))?;
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        Ok(())
    }

    async fn delete_many(&self, ids: &[EntityId]) -> CollectionResult<BulkDeleteData> {
        debug!(path = %self.config.resource_path, count = ids.len(), "POST bulk delete");
        let mut body = serde_json::Map::new();
        body.insert(
            self.config.bulk_ids_field.clone(),
            serde_json::to_value(ids)?,
        );
        let request = self.client.post(self.bulk_url()).json(&body);
        let response = self
            .authorize(request)
            .await
            .send()
            .await
            .map_err(|e| CollectionError::Transport(format!("bulk delete request failed: {e}")))?;
        Self::read_envelope(response).await
    }
}
