//! Network utilities and helpers

use reqwest::Client;

use crate::core::models::AppResult;

/// User agent sent by the HTTP client
pub const DEFAULT_USER_AGENT: &str = concat!("TikTokDownloader/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client.
///
/// No request timeout is set; submissions are never aborted.
pub fn build_client(user_agent: &str) -> AppResult<Client> {
    let client = Client::builder().user_agent(user_agent).build()?;
    Ok(client)
}
