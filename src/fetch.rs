use tracing::debug;

/// Downloads the body at `url`, treating any non-success status as an error.
pub fn fetch_bytes(url: &str) -> reqwest::Result<Vec<u8>> {
    let resp = reqwest::blocking::get(url)?.error_for_status()?;
    let bytes = resp.bytes()?.to_vec();
    debug!(url, bytes = bytes.len(), "Fetched remote source");
    Ok(bytes)
}
