//! Publication PDF download.
//!
//! One blocking GET per manifest entry, sequential. The source behavior had
//! no timeout at all; the bounded timeout here does not change the success
//! path. Validation mirrors what the download sources demand: http(s) URL,
//! %PDF magic bytes, bounded size.

use reqwest::blocking::Client;
use std::time::Duration;

const FETCH_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("pubwords/", env!("CARGO_PKG_VERSION"));

/// Size cap per document (20MB).
pub const MAX_PDF_BYTES: usize = 20 * 1024 * 1024;

pub fn build_client() -> Result<Client, String> {
    Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {}", e))
}

/// Validate URL for document download
fn is_valid_download_url(url_str: &str) -> bool {
    let parsed = match url::Url::parse(url_str) {
        Ok(u) => u,
        Err(_) => return false,
    };

    // Must be http/https
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    // Check hostname
    if let Some(host) = parsed.host_str() {
        if host == "localhost" || host == "127.0.0.1" || !host.contains('.') {
            return false;
        }
    } else {
        return false;
    }
    true
}

/// Download one publication's PDF bytes.
pub fn fetch_pdf(client: &Client, url: &str) -> Result<Vec<u8>, String> {
    if !is_valid_download_url(url) {
        return Err(format!("Invalid download URL: {}", url));
    }

    let response = client
        .get(url)
        .send()
        .map_err(|e| format!("Failed to download {}: {}", url, e))?;

    if !response.status().is_success() {
        return Err(format!("{} returned status {}", url, response.status()));
    }

    let bytes = response
        .bytes()
        .map_err(|e| format!("Failed to read response bytes from {}: {}", url, e))?
        .to_vec();

    // Validate PDF magic bytes
    if bytes.len() < 4 || &bytes[0..4] != b"%PDF" {
        return Err(format!("{} did not return a valid PDF", url));
    }

    if bytes.len() > MAX_PDF_BYTES {
        return Err(format!(
            "PDF too large: {} MB from {}",
            bytes.len() / 1024 / 1024,
            url
        ));
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_download_urls() {
        assert!(is_valid_download_url("https://example.org/paper.pdf"));
        assert!(is_valid_download_url("http://repo.example.org/files/1.pdf"));
    }

    #[test]
    fn test_invalid_download_urls() {
        assert!(!is_valid_download_url("ftp://example.org/paper.pdf"));
        assert!(!is_valid_download_url("file:///etc/passwd"));
        assert!(!is_valid_download_url("https://localhost/paper.pdf"));
        assert!(!is_valid_download_url("https://127.0.0.1/paper.pdf"));
        assert!(!is_valid_download_url("https://intranet/paper.pdf"));
        assert!(!is_valid_download_url("not a url"));
    }
}
