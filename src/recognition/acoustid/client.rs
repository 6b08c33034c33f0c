//! AcoustID HTTP client
//!
//! Handles communication with the AcoustID web service.
//! See: https://acoustid.org/webservice
//!
//! ## URL encoding of the meta parameter
//! The API uses `+` as a separator in `meta` (e.g. `recordings+releasegroups`).
//! Standard URL encoding turns `+` into `%2B`, which the API does not treat as a
//! separator, and the results then come back without metadata. The URL is
//! therefore built by hand and `.query()` is not used for `meta`.
//!
//! Responses are gzip-compressed when the `gzip` reqwest feature is on.

use super::dto;
use crate::recognition::domain::{AudioFingerprint, RecognitionError};

/// AcoustID API client
pub struct AcoustIdClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
}

impl AcoustIdClient {
    /// Create a new client with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self, RecognitionError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| RecognitionError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key: api_key.into(),
            http_client,
            base_url: "https://api.acoustid.org/v2/lookup".to_string(),
        })
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn lookup_url(&self, fingerprint: &AudioFingerprint) -> String {
        // The + separators must stay literal.
        format!(
            "{}?client={}&duration={}&fingerprint={}&meta=recordings+releasegroups+compress",
            self.base_url,
            urlencoding::encode(&self.api_key),
            fingerprint.duration_secs,
            urlencoding::encode(&fingerprint.fingerprint)
        )
    }

    /// Send the lookup request and parse the response
    pub async fn lookup(
        &self,
        fingerprint: &AudioFingerprint,
    ) -> Result<dto::LookupResponse, RecognitionError> {
        let url = self.lookup_url(fingerprint);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| RecognitionError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RecognitionError::Network(format!(
                "HTTP {}: {} - {}",
                status,
                status.canonical_reason().unwrap_or("Unknown"),
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json::<dto::LookupResponse>()
            .await
            .map_err(|e| RecognitionError::Parse(e.to_string()))
    }
}
