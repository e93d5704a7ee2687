//! Asynchronous retrieval of a video payload
//!
//! Posts the validated URL, form-encoded, to the retrieval endpoint and
//! returns the binary body. Any non-success status is a failure. There is no
//! timeout and no abort: a hung request keeps the submission in flight.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::core::error_handling::SubmissionError;

/// Form field carrying the video URL
pub const DEFAULT_FIELD_NAME: &str = "video_url";

#[async_trait]
pub trait RetrievalClient: Send + Sync {
    /// Fetch the payload for an already validated URL
    async fn retrieve(&self, video_url: &str) -> Result<Bytes, SubmissionError>;
}

/// reqwest-backed client for `POST /download`
#[derive(Debug, Clone)]
pub struct HttpRetrievalClient {
    client: Client,
    endpoint: Url,
    field_name: String,
}

impl HttpRetrievalClient {
    pub fn new(client: Client, endpoint: Url, field_name: impl Into<String>) -> Self {
        Self {
            client,
            endpoint,
            field_name: field_name.into(),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }
}

#[async_trait]
impl RetrievalClient for HttpRetrievalClient {
    async fn retrieve(&self, video_url: &str) -> Result<Bytes, SubmissionError> {
        debug!("POST {} ({}={})", self.endpoint, self.field_name, video_url);

        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&[(self.field_name.as_str(), video_url)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmissionError::Server {
                status: status.as_u16(),
            });
        }

        let payload = response.bytes().await?;
        info!("Retrieved {} bytes for {}", payload.len(), video_url);
        Ok(payload)
    }
}
