use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:4000/";

/// Body of the /convert request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConvertRequest {
    pub url: String,
}

/// Error body sent by the backend on a non-2xx answer.
/// Every field is optional; an unparseable body is treated as empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    /// FastAPI puts `HTTPException` messages here. Validation failures carry a
    /// list instead of a string, so keep it loose.
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<String> {
        let error = self.error.as_deref().filter(|e| !e.is_empty());
        let detail = self
            .detail
            .as_ref()
            .and_then(|d| d.as_str())
            .filter(|d| !d.is_empty());

        error.or(detail).map(str::to_string)
    }
}

/// Response from the /health endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        // Url::join replaces the last segment unless the path ends with '/'
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    pub fn convert_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.base_url)?.join("convert")
    }

    pub fn health_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.base_url)?.join("health")
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL)
    }
}
