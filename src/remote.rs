//! Remote word-count store client.
//!
//! Document-store variant of the query surface: the same three capabilities
//! as the local database, answered by a server (see `http_server`) over
//! HTTP/JSON. Queries only; ingestion always writes to a local store.

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::db::{PublicationCount, PublicationMeta, StoreTotals};
use crate::store::WordStore;

const REQUEST_TIMEOUT_SECS: u64 = 10;

pub struct RemoteStore {
    base_url: String,
    client: Client,
}

impl RemoteStore {
    pub fn new(base_url: &str) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("pubwords/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, String> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| format!("Failed to reach {}: {}", url, e))?;

        if !response.status().is_success() {
            return Err(format!("{} returned status {}", url, response.status()));
        }

        response
            .json::<T>()
            .map_err(|e| format!("Invalid JSON from {}: {}", url, e))
    }
}

impl WordStore for RemoteStore {
    fn query_by_word(&self, word: &str) -> Result<Vec<PublicationCount>, String> {
        let path = format!("/words/{}", urlencoding::encode(word));
        self.get_json(&path)
    }

    fn query_totals(&self) -> Result<StoreTotals, String> {
        self.get_json("/stats")
    }

    fn query_metadata(&self) -> Result<Vec<PublicationMeta>, String> {
        self.get_json("/publications")
    }
}
