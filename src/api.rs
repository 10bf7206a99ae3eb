//! HTTP access to the prediction backend

use crate::error::RequestError;
use crate::types::{OptionSet, PredictRequest, PredictResponse};
use async_trait::async_trait;
use tracing::{debug, warn};

/// The two calls the orchestrator makes. Implemented over HTTP and by test doubles.
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    async fn options(&self) -> Result<OptionSet, RequestError>;
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, RequestError>;
}

#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn chart_url(&self, name: &str, cache_bust: Option<i64>) -> String {
        match cache_bust {
            Some(t) => format!("{}/visualizations/{}?t={}", self.base_url, name, t),
            None => format!("{}/visualizations/{}", self.base_url, name),
        }
    }

    /// Raw bytes of a pre-rendered chart image.
    pub async fn chart(&self, name: &str, cache_bust: Option<i64>) -> Result<Vec<u8>, RequestError> {
        let url = self.chart_url(name, cache_bust);
        let response = ensure_success(self.client.get(&url).send().await?).await?;
        let bytes = response.bytes().await?;
        debug!(chart = name, bytes = bytes.len(), "Chart downloaded");
        Ok(bytes.to_vec())
    }
}

/// Turn a non-2xx response into `RequestError::Http` carrying the body text.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RequestError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(status = status.as_u16(), error = %e, "Failed to read error response body");
            String::new()
        }
    };
    Err(RequestError::Http {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl PredictionBackend for HttpBackend {
    async fn options(&self) -> Result<OptionSet, RequestError> {
        let url = format!("{}/options", self.base_url);
        let response = ensure_success(self.client.get(&url).send().await?).await?;
        Ok(response.json::<OptionSet>().await?)
    }

    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, RequestError> {
        let url = format!("{}/predict", self.base_url);
        let response =
            ensure_success(self.client.post(&url).json(request).send().await?).await?;
        Ok(response.json::<PredictResponse>().await?)
    }
}
