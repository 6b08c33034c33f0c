//! Cover art download.
//!
//! Recognition results carry a cover URL (Shazam's `coverart` image, or the
//! Cover Art Archive front image of an AcoustID release group). The image is
//! downloaded once per file and embedded as the front cover.

use async_trait::async_trait;

/// Cover Art Archive base URL
pub const COVER_ART_ARCHIVE: &str = "https://coverartarchive.org";

/// Desired cover art size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverSize {
    /// 250px thumbnail
    Small,
    /// 500px thumbnail (default)
    #[default]
    Medium,
    /// 1200px thumbnail
    Large,
    /// Original full-size image
    Original,
}

impl CoverSize {
    fn suffix(self) -> &'static str {
        match self {
            CoverSize::Small => "-250",
            CoverSize::Medium => "-500",
            CoverSize::Large => "-1200",
            CoverSize::Original => "",
        }
    }
}

/// Redirecting URL of a release group's front cover
pub fn release_group_front_url(release_group_id: &str, size: CoverSize) -> String {
    format!(
        "{}/release-group/{}/front{}",
        COVER_ART_ARCHIVE,
        release_group_id,
        size.suffix()
    )
}

/// Downloaded cover art
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    /// Image data (JPEG or PNG)
    pub data: Vec<u8>,
    /// MIME type (image/jpeg or image/png)
    pub mime_type: String,
    /// Source URL
    pub url: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CoverError {
    #[error("No cover art at {0}")]
    NotFound(String),

    #[error("HTTP {status} fetching {url}")]
    Http { status: u16, url: String },

    #[error("Network error: {0}")]
    Network(String),
}

/// Something that can turn a cover URL into image bytes.
#[async_trait]
pub trait CoverFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<CoverImage, CoverError>;
}

/// Plain HTTP fetcher, following redirects
pub struct HttpCoverFetcher {
    http_client: reqwest::Client,
}

impl HttpCoverFetcher {
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("auto-tag/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { http_client }
    }
}

impl Default for HttpCoverFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// MIME type from a Content-Type header, ignoring parameters
fn mime_from_header(value: Option<&str>) -> String {
    value
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .filter(|v| v.starts_with("image/"))
        .unwrap_or("image/jpeg")
        .to_string()
}

#[async_trait]
impl CoverFetcher for HttpCoverFetcher {
    async fn fetch(&self, url: &str) -> Result<CoverImage, CoverError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| CoverError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CoverError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            return Err(CoverError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let mime_type = mime_from_header(
            response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        );

        let data = response
            .bytes()
            .await
            .map_err(|e| CoverError::Network(e.to_string()))?
            .to_vec();

        tracing::debug!("Downloaded {} bytes of cover art from {}", data.len(), url);

        Ok(CoverImage {
            data,
            mime_type,
            url: url.to_string(),
        })
    }
}
