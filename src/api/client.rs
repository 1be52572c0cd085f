use reqwest::header::CONTENT_DISPOSITION;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

use super::models::{ApiConfig, ConvertRequest, ErrorBody, HealthResponse};
use crate::domain::{AppError, ConvertedAudio, DEFAULT_FILENAME};
use crate::utils::{extract_filename, FilenameError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Invalid backend URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// Non-2xx status, carrying the message the user gets to see.
    #[error("{0}")]
    ServerError(String),

    #[error("{0}")]
    InvalidFilename(#[from] FilenameError),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::ServerError(message) => AppError::Server(message),
            ApiError::InvalidFilename(e) => AppError::InvalidResponse(e.to_string()),
            other => AppError::Transport(other.to_string()),
        }
    }
}

/// Message for a failed conversion: the backend's own message when the body
/// carries one, otherwise a generic one naming the status code.
fn server_error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .unwrap_or_default()
        .message()
        .unwrap_or_else(|| format!("Server error: {}", status.as_u16()))
}

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Ask the backend to convert `video_url` and return the audio it sends
    /// back, together with the filename to save it under.
    pub async fn convert(&self, video_url: &str) -> Result<ConvertedAudio> {
        let endpoint = self.config.convert_url()?;

        let response = self
            .http
            .post(endpoint)
            .json(&ConvertRequest {
                url: video_url.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // A body we cannot read is treated like an empty one
            let body = response.bytes().await.unwrap_or_default();
            let message = server_error_message(status, &body);
            warn!(status = status.as_u16(), %message, "Conversion rejected by backend");
            return Err(ApiError::ServerError(message));
        }

        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
        let filename = extract_filename(disposition.as_deref())
            .inspect_err(|e| {
                warn!(?disposition, error = %e, "Rejected Content-Disposition filename");
            })?
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

        let bytes = response.bytes().await?;
        debug!(size = bytes.len(), %filename, "Received converted audio");

        Ok(ConvertedAudio { bytes, filename })
    }

    /// Check whether the backend is up and reports itself healthy.
    pub async fn health(&self) -> Result<bool> {
        let endpoint = self.config.health_url()?;
        let response = self.http.get(endpoint).send().await?;

        if !response.status().is_success() {
            return Ok(false);
        }

        let healthy = response
            .json::<HealthResponse>()
            .await
            .map(|h| h.status == "ok")
            .unwrap_or(false);
        Ok(healthy)
    }
}
