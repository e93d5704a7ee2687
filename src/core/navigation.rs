//! Native form navigation, as a browser would perform it
//!
//! When the controller answers a submit with `Navigate`, the page is expected
//! to post the form itself and let the browser store the attachment. Hosts
//! without a browser use [`NativeNavigator`] to play that role. The controller
//! never learns the outcome.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use url::Url;

use crate::core::models::{AppError, AppResult, NativeSubmission};
use crate::utils::file_utils::{ensure_dir_exists, format_file_size, sanitize_filename};

pub struct NativeNavigator {
    client: Client,
    base_url: Url,
    downloads_dir: PathBuf,
}

impl NativeNavigator {
    pub fn new(client: Client, base_url: Url, downloads_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            base_url,
            downloads_dir: downloads_dir.into(),
        }
    }

    /// Post the form and stream the attachment to disk.
    ///
    /// `fallback_name` is used when the response names no file.
    pub async fn navigate(
        &self,
        submission: &NativeSubmission,
        fallback_name: &str,
    ) -> AppResult<PathBuf> {
        let target = self
            .base_url
            .join(&submission.action)
            .map_err(|e| AppError::Config(format!("Invalid form action: {}", e)))?;

        let response = self
            .client
            .post(target)
            .form(&[(submission.field_name.as_str(), submission.video_url.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_attachment_filename)
            .map(|name| sanitize_filename(&name))
            .unwrap_or_else(|| {
                warn!("Response carried no attachment filename, using {}", fallback_name);
                fallback_name.to_string()
            });

        ensure_dir_exists(&self.downloads_dir).map_err(|e| AppError::Save(e.to_string()))?;
        let output_path = self.downloads_dir.join(&filename);
        let written = stream_to_file(response, &output_path).await?;

        info!(
            "Saved attachment {:?} ({})",
            output_path,
            format_file_size(written)
        );
        Ok(output_path)
    }
}

async fn stream_to_file(response: reqwest::Response, output_path: &Path) -> AppResult<u64> {
    let mut file = File::create(output_path).await?;
    let mut stream = response.bytes_stream();
    let mut total_size = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        total_size += chunk.len() as u64;
        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    Ok(total_size)
}

/// Extract the filename of a `Content-Disposition` header value.
///
/// Handles quoted and token `filename=` values. Returns `None` for empty
/// names.
pub fn parse_attachment_filename(header_value: &str) -> Option<String> {
    header_value.split(';').find_map(|param| {
        let (name, value) = param.trim().split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("filename") {
            return None;
        }

        let value = value.trim();
        let unquoted = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);

        (!unquoted.is_empty()).then(|| unquoted.replace("\\\"", "\""))
    })
}
