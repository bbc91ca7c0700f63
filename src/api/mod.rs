//! Screening backend client
//!
//! Thin typed wrapper over the REST endpoints the filter screens use: the
//! compound screening query and the favorites CRUD resource.

use crate::error::{AppError, Result};
use crate::filter::{ActiveCriterion, FilterPayload};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::info;
use url::Url;

/// API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.vnscreener.vn/v1/".to_string(),
            timeout_secs: 15,
        }
    }
}

/// `{ data: ... }` envelope every response is wrapped in
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    result: QueryResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryResult {
    /// Result rows; columns depend on which criteria were queried
    pub items: Vec<Value>,
    #[serde(rename = "totalCount")]
    pub total_count: u64,
}

/// A server-side saved filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteFilter {
    pub id: String,
    pub name: String,
    pub active: Vec<ActiveCriterion>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// HTTP client for the screening backend
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| AppError::Config(format!("invalid API base URL: {}", e)))?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::Config(format!("invalid API path '{}': {}", path, e)))
    }

    /// Run the compound screening query
    pub async fn query_filter(&self, payload: &FilterPayload) -> Result<QueryResult> {
        info!(
            "screening query: page {} ({} tokens, {} ranges)",
            payload.page_number,
            payload.fa_keys.len(),
            payload.fa_filter_sub.len()
        );
        let response: Envelope<QueryResponse> =
            self.post_json("stock-filter/query", payload).await?;
        Ok(response.data.result)
    }

    /// List saved favorite filters
    pub async fn list_favorites(&self) -> Result<Vec<FavoriteFilter>> {
        let response: Envelope<Vec<FavoriteFilter>> = self.get_json("stock-filter/favorites").await?;
        Ok(response.data)
    }

    /// Create a favorite filter
    pub async fn create_favorite(&self, favorite: &FavoriteFilter) -> Result<FavoriteFilter> {
        let response: Envelope<FavoriteFilter> = self
            .post_json("stock-filter/favorites", favorite)
            .await?;
        Ok(response.data)
    }

    /// Update a favorite filter
    pub async fn update_favorite(&self, favorite: &FavoriteFilter) -> Result<FavoriteFilter> {
        let url = self.endpoint(&format!("stock-filter/favorites/{}", favorite.id))?;
        let response = self.http.put(url).json(favorite).send().await?;
        Self::decode::<Envelope<FavoriteFilter>>(response)
            .await
            .map(|e| e.data)
    }

    /// Delete a favorite filter
    pub async fn delete_favorite(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&format!("stock-filter/favorites/{}", id))?;
        let response = self.http.delete(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Api(format!(
                "DELETE favorite {} failed: {}",
                id, status
            )));
        }
        Ok(())
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let url = self.endpoint(path)?;
        let response = self.http.get(url).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let url = self.endpoint(path)?;
        let response = self.http.post(url).json(body).send().await?;
        Self::decode(response).await
    }

    /// Surface HTTP-level failures with the server's message attached
    async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::Api(format!("{}: {}", status, message)));
        }
        Ok(response.json().await?)
    }
}
