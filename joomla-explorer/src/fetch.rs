//! Manifest download.

use crate::utils::{ExplorerError, Result};
use reqwest::StatusCode;
use tracing::{debug, info};

/// GET `url` and return the body. Anything but a 200 is fatal.
pub async fn fetch_manifest(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    debug!("Fetching manifest from {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ExplorerError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(ExplorerError::Fetch {
            url: url.to_string(),
            reason: format!("HTTP {}", status),
        });
    }

    let bytes = response.bytes().await.map_err(ExplorerError::BodyRead)?;
    info!("Fetched manifest ({} bytes, HTTP {})", bytes.len(), status.as_u16());

    Ok(bytes.to_vec())
}
