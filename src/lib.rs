//! # picpix
//!
//! An HTTP service that turns remote images into windows of packed pixel data.
//!
//! A client names an image URL, a target size and a window `[i, i + cap)`.
//! The service downloads and decodes the image, resizes it to the target
//! size (stretching or letterboxing), packs every pixel into a 32-bit ARGB
//! value, and answers with the requested window as space-separated base-36
//! tokens. Clients page through large images by issuing successive windows.
//!
//! ## Features
//!
//! - **Two bounded caches**: decoded source images keyed by URL, and rendered
//!   pixel sequences keyed by `(url, width, height, keep_aspect_ratio)`
//! - **Single-flight fetches**: concurrent misses for one URL share one download
//! - **In-band fetch errors**: unreachable or undecodable images are reported
//!   as `!`-prefixed text so thin clients need no status handling
//!
//! ## Architecture
//!
//! - [`pixels`] - Decoding, resizing and ARGB packing
//! - [`fetch`] - Image sources and the fetch cache
//! - [`render`] - Rendered pixel sequences and the render cache
//! - [`window`] - Request validation, slicing and base-36 encoding
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use picpix::{create_router, FetchCache, HttpImageSource, RenderService, RouterConfig, WindowService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetch_cache = Arc::new(FetchCache::new(HttpImageSource::new()?));
//!     let window_service = WindowService::new(RenderService::new(fetch_cache));
//!     let router = create_router(window_service, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod pixels;
pub mod render;
pub mod server;
pub mod window;

// Re-export commonly used types
pub use config::Config;
pub use error::{FetchError, FetchErrorKind, WindowError};
pub use fetch::{FetchCache, HttpImageSource, ImageSource};
pub use pixels::{fit, pack, resize_exact, SourceImage};
pub use render::{RenderCache, RenderKey, RenderOutput, RenderService};
pub use server::{
    create_router, health_handler, picpix_handler, AppState, ErrorResponse, HealthResponse,
    PicpixQueryParams, RouterConfig,
};
pub use window::{
    encode_window, to_base36, WindowRequest, WindowResponse, WindowService, ERROR_PREFIX,
};
