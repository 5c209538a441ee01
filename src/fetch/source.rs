//! Sources of encoded image bytes.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};

use crate::error::FetchError;

/// Default timeout for a single image request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent with every image request.
///
/// Some image hosts refuse requests without a browser-like user agent.
pub const LEGACY_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; WOW64; rv:45.0) Gecko/20100101 Firefox/45.0";

/// Content type header sent with every image request.
pub const IMAGE_CONTENT_TYPE: &str = "image/*";

// =============================================================================
// ImageSource Trait
// =============================================================================

/// Trait for retrieving the encoded bytes of an image by URL.
///
/// This abstraction lets the fetch cache work against the network in
/// production and against in-memory fixtures in tests.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch the raw payload for `url`.
    ///
    /// Implementations perform exactly one request per call and never retry.
    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, FetchError>;
}

// =============================================================================
// HTTP Source
// =============================================================================

/// `ImageSource` backed by a single HTTP GET per call.
///
/// # Example
///
/// ```ignore
/// use picpix::fetch::{HttpImageSource, ImageSource};
///
/// let source = HttpImageSource::new()?;
/// let bytes = source.fetch_bytes("https://example.com/cat.png").await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: reqwest::Client,
}

impl HttpImageSource {
    /// Create a source with the default timeout and user agent.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_options(DEFAULT_FETCH_TIMEOUT, LEGACY_USER_AGENT)
    }

    /// Create a source with a custom timeout and user agent.
    ///
    /// The timeout covers the whole request, body included.
    pub fn with_options(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let user_agent = HeaderValue::from_str(user_agent)
            .map_err(|e| FetchError::UnknownNetwork(format!("invalid user agent: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, user_agent);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(IMAGE_CONTENT_TYPE));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, FetchError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?)
    }
}
