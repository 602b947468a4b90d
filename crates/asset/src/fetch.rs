//! HTTP retrieval of raw texture bytes.

use reqwest::Client;

use crate::FetchError;

/// Fetch the raw bytes at `url`.
///
/// Non-2xx statuses are failures; transport problems surface as
/// [`FetchError::Transport`]. The client is passed in so callers control
/// connection reuse.
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    log::debug!("Fetching {}", url);
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }
    let bytes = response.bytes().await?;
    log::debug!("Fetched {} bytes from {}", bytes.len(), url);
    Ok(bytes.to_vec())
}
