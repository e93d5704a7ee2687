//! URL and input validation utilities

use anyhow::{anyhow, Result};
use url::Url;

/// Join the endpoint base URL and path into the retrieval URL
pub fn endpoint_url(base_url: &str, path: &str) -> Result<Url> {
    let base = Url::parse(base_url).map_err(|e| anyhow!("Invalid URL format: {}", e))?;

    if !matches!(base.scheme(), "http" | "https") {
        return Err(anyhow!("Unsupported endpoint scheme: {}", base.scheme()));
    }

    base.join(path)
        .map_err(|e| anyhow!("Invalid endpoint path {:?}: {}", path, e))
}
