//! Test utilities for integration tests.
//!
//! This module provides a mock image source and helpers for building test
//! images, routers and request URIs.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tokio::sync::RwLock;
use url::form_urlencoded;

use picpix::error::FetchError;
use picpix::fetch::{FetchCache, ImageSource};
use picpix::render::RenderService;
use picpix::window::WindowService;
use picpix::{create_router, RouterConfig};

pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// Base-36 token for opaque red.
pub const RED_TOKEN: &str = "1Z12NEO";

/// Base-36 token for opaque green.
pub const GREEN_TOKEN: &str = "1YR5UYO";

// =============================================================================
// Mock Image Source
// =============================================================================

/// A mock image source that serves pre-configured payloads.
///
/// Unknown URLs fail with a connection error. Clones share request counters,
/// so a test can keep a handle after moving the source into a service.
#[derive(Clone)]
pub struct MockImageSource {
    payloads: Arc<HashMap<String, Bytes>>,
    request_counts: Arc<RwLock<HashMap<String, usize>>>,
    transient_failures: Arc<RwLock<HashMap<String, usize>>>,
    delay: Option<Duration>,
}

impl MockImageSource {
    pub fn new() -> Self {
        Self {
            payloads: Arc::new(HashMap::new()),
            request_counts: Arc::new(RwLock::new(HashMap::new())),
            transient_failures: Arc::new(RwLock::new(HashMap::new())),
            delay: None,
        }
    }

    /// Serve `image` as PNG at `url`.
    pub fn with_image(self, url: impl Into<String>, image: RgbaImage) -> Self {
        self.with_payload(url, png_bytes(image))
    }

    /// Serve raw bytes at `url`.
    pub fn with_payload(mut self, url: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Arc::make_mut(&mut self.payloads).insert(url.into(), data.into());
        self
    }

    /// Fail the first `times` requests for `url` with a connection error.
    pub fn with_transient_failure(self, url: impl Into<String>, times: usize) -> Self {
        self.transient_failures
            .try_write()
            .expect("fresh mock is not shared")
            .insert(url.into(), times);
        self
    }

    /// Sleep before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn request_count(&self, url: &str) -> usize {
        self.request_counts
            .read()
            .await
            .get(url)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl ImageSource for MockImageSource {
    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, FetchError> {
        *self
            .request_counts
            .write()
            .await
            .entry(url.to_string())
            .or_insert(0) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(remaining) = self.transient_failures.write().await.get_mut(url) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(FetchError::Connection("mock outage".to_string()));
            }
        }

        self.payloads
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Connection(format!("no route to {}", url)))
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Encode an RGBA image as PNG.
pub fn png_bytes(image: RgbaImage) -> Bytes {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    Bytes::from(buf)
}

/// Create a single-color image.
pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// Build a router over `source` with the given cache capacities.
pub fn router_with(
    source: MockImageSource,
    fetch_capacity: usize,
    render_capacity: usize,
) -> Router {
    let fetch_cache = Arc::new(FetchCache::with_capacity(source, fetch_capacity));
    let renderer = RenderService::with_cache_capacity(fetch_cache, render_capacity);
    let window_service = WindowService::new(renderer);
    create_router(window_service, RouterConfig::new().with_tracing(false))
}

/// Build a router over `source` with default cache capacities.
pub fn router(source: MockImageSource) -> Router {
    router_with(source, 10, 10)
}

/// Build a `/picpix` URI, percent-encoding the image URL.
pub fn picpix_uri(url: &str, i: i64, cap: i64, width: i64, height: i64) -> String {
    let img_url: String = form_urlencoded::byte_serialize(url.as_bytes()).collect();
    format!(
        "/picpix?img_url={}&i={}&cap={}&width={}&height={}",
        img_url, i, cap, width, height
    )
}

/// Build a GET request for `uri`.
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Collect a response body as UTF-8 text.
pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Get a header value as a string.
pub fn header<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
}
