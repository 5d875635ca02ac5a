//! HTTP client for the embedding sidecar service.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The service rejects requests with more texts than this.
pub const MAX_TEXTS_PER_REQUEST: usize = 100;

/// Default base URL for local development.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8001";

/// Request timeout. Embedding a full batch of 100 abstracts stays well
/// under this on CPU.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the embedding service client.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingClientError {
    #[error("Failed to reach embedding service: {0}")]
    Connection(String),

    #[error("Embedding service returned an error (status {status}): {detail}")]
    Service { status: u16, detail: String },

    #[error("Failed to decode embedding service response: {0}")]
    Decode(String),
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    texts: &'a [String],
    normalize: bool,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
    model: String,
    dimensions: usize,
}

/// Health payload from `GET /health`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingServiceHealth {
    pub status: String,
    pub model: String,
    pub model_loaded: bool,
}

/// Client for one embedding service instance.
#[derive(Debug, Clone)]
pub struct EmbeddingClient {
    base_url: String,
    http: reqwest::Client,
}

impl EmbeddingClient {
    /// Create a client for the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client construction cannot fail with static config");
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    /// Create a client from `EMBEDDING_SERVICE_URL`, falling back to the
    /// local development default.
    pub fn from_env() -> Self {
        let url = std::env::var("EMBEDDING_SERVICE_URL")
            .unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string());
        Self::new(url)
    }

    /// Base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Embed a list of texts. Normalized vectors are requested so cosine
    /// similarity reduces to a dot product downstream.
    ///
    /// Inputs longer than [`MAX_TEXTS_PER_REQUEST`] are embedded in
    /// chunks and the results concatenated in order.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingClientError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(MAX_TEXTS_PER_REQUEST) {
            let response = self.embed_chunk(chunk).await?;
            tracing::debug!(
                count = response.embeddings.len(),
                model = %response.model,
                dimensions = response.dimensions,
                "Embedded text chunk"
            );
            all.extend(response.embeddings);
        }
        Ok(all)
    }

    async fn embed_chunk(&self, texts: &[String]) -> Result<EmbedResponse, EmbeddingClientError> {
        let url = format!("{}/embed", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&EmbedRequest {
                texts,
                normalize: true,
            })
            .send()
            .await
            .map_err(|e| EmbeddingClientError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EmbeddingClientError::Service {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<EmbedResponse>()
            .await
            .map_err(|e| EmbeddingClientError::Decode(e.to_string()))
    }

    /// Check service health via `GET /health`.
    pub async fn health(&self) -> Result<EmbeddingServiceHealth, EmbeddingClientError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| EmbeddingClientError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EmbeddingClientError::Service {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<EmbeddingServiceHealth>()
            .await
            .map_err(|e| EmbeddingClientError::Decode(e.to_string()))
    }
}
