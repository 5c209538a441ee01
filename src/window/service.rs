//! Window Service for serving slices of packed pixels.
//!
//! The WindowService is the main entry point for pixel requests. It:
//! - Validates request parameters
//! - Resolves the rendered pixels via the render service
//! - Extracts the requested window
//! - Encodes it as base-36 text
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         WindowService                           │
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │                      serve()                            │    │
//! │  │  1. Validate params   3. Slice [start, start + cap)     │    │
//! │  │  2. Render (cached)   4. Encode base-36                 │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! │                              │                                  │
//! │                              ▼                                  │
//! │                     ┌────────────────┐                          │
//! │                     │ RenderService  │                          │
//! │                     └────────────────┘                          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use crate::error::{FetchError, WindowError};
use crate::fetch::ImageSource;
use crate::render::{RenderKey, RenderService};

use super::encoder::{encode_window, ERROR_PREFIX};

/// Default upper bound on the requested width and height.
pub const DEFAULT_MAX_DIMENSION: u32 = 4096;

// =============================================================================
// Window Request
// =============================================================================

/// A request for a window of packed pixels.
///
/// Integer fields are signed so that out-of-contract values from clients can
/// be reported with the proper validation error.
#[derive(Debug, Clone)]
pub struct WindowRequest {
    /// Source image URL
    pub url: String,

    /// Inclusive start index into the packed sequence
    pub start: i64,

    /// Maximum number of values to return
    pub capacity: i64,

    /// Target width in pixels
    pub width: i64,

    /// Target height in pixels
    pub height: i64,

    /// Letterbox instead of stretching
    pub keep_aspect_ratio: bool,
}

impl WindowRequest {
    /// Create a new window request that stretches to the target size.
    pub fn new(url: impl Into<String>, start: i64, capacity: i64, width: i64, height: i64) -> Self {
        Self {
            url: url.into(),
            start,
            capacity,
            width,
            height,
            keep_aspect_ratio: false,
        }
    }

    /// Set the aspect-preserving flag.
    pub fn with_keep_aspect_ratio(mut self, keep_aspect_ratio: bool) -> Self {
        self.keep_aspect_ratio = keep_aspect_ratio;
        self
    }
}

// =============================================================================
// Window Response
// =============================================================================

/// Outcome of a validated window request.
#[derive(Debug, Clone)]
pub enum WindowResponse {
    /// Encoded window
    Pixels {
        /// Space-separated base-36 tokens
        body: String,

        /// Number of tokens in `body`
        count: usize,

        /// Whether the rendered pixels came from the render cache
        cache_hit: bool,
    },

    /// The source image could not be fetched or decoded
    FetchFailed(FetchError),
}

impl WindowResponse {
    /// Get the response body, `!`-prefixed for fetch failures.
    pub fn into_body(self) -> String {
        match self {
            WindowResponse::Pixels { body, .. } => body,
            WindowResponse::FetchFailed(err) => format!("{}{}", ERROR_PREFIX, err),
        }
    }
}

/// Validated request parameters.
struct Window {
    key: RenderKey,
    start: usize,
    capacity: usize,
}

// =============================================================================
// Window Service
// =============================================================================

/// Service for serving windows of rendered pixels.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use picpix::fetch::{FetchCache, HttpImageSource};
/// use picpix::render::RenderService;
/// use picpix::window::{WindowRequest, WindowService};
///
/// let fetch_cache = Arc::new(FetchCache::new(HttpImageSource::new()?));
/// let service = WindowService::new(RenderService::new(fetch_cache));
///
/// let request = WindowRequest::new("https://example.com/cat.png", 0, 16, 8, 8);
/// let body = service.serve(&request).await?.into_body();
/// ```
pub struct WindowService<S: ImageSource> {
    /// Render service resolving packed pixels
    renderer: Arc<RenderService<S>>,

    /// Largest accepted width or height
    max_dimension: u32,
}

impl<S: ImageSource> WindowService<S> {
    /// Create a new window service with the default dimension limit.
    pub fn new(renderer: RenderService<S>) -> Self {
        Self::with_shared_renderer(Arc::new(renderer))
    }

    /// Create a new window service with a shared render service.
    pub fn with_shared_renderer(renderer: Arc<RenderService<S>>) -> Self {
        Self {
            renderer,
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }

    /// Set the largest accepted width or height.
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    /// Serve a window request.
    ///
    /// Parameters are checked in order, and the first failure is returned:
    /// 1. `start < 0`
    /// 2. `capacity <= 0`
    /// 3. `start >= width * height`
    /// 4. non-positive width or height
    /// 5. width or height above the configured maximum
    ///
    /// Fetch and decode failures are not errors at this level; they come back
    /// as [`WindowResponse::FetchFailed`]. The window may be shorter than
    /// `capacity` when it runs past the end of the sequence.
    pub async fn serve(&self, request: &WindowRequest) -> Result<WindowResponse, WindowError> {
        let window = self.validate(request)?;

        let output = match self.renderer.render(&window.key).await {
            Ok(output) => output,
            Err(err) => return Ok(WindowResponse::FetchFailed(err)),
        };

        let end = window
            .start
            .saturating_add(window.capacity)
            .min(output.pixels.len());
        let slice = &output.pixels[window.start..end];

        Ok(WindowResponse::Pixels {
            body: encode_window(slice),
            count: slice.len(),
            cache_hit: output.cache_hit,
        })
    }

    fn validate(&self, request: &WindowRequest) -> Result<Window, WindowError> {
        let WindowRequest {
            start,
            capacity,
            width,
            height,
            ..
        } = *request;

        if start < 0 {
            return Err(WindowError::NegativeStart { start });
        }
        if capacity <= 0 {
            return Err(WindowError::NonPositiveCapacity { capacity });
        }

        let pixel_count = i128::from(width) * i128::from(height);
        if i128::from(start) >= pixel_count {
            return Err(WindowError::StartOutOfRange { start, pixel_count });
        }

        if width <= 0 || height <= 0 {
            return Err(WindowError::InvalidDimensions { width, height });
        }

        let too_large = || WindowError::DimensionTooLarge {
            width,
            height,
            max_dimension: self.max_dimension,
        };
        let max_dimension = i64::from(self.max_dimension);
        if width > max_dimension || height > max_dimension {
            return Err(too_large());
        }
        let width = u32::try_from(width).map_err(|_| too_large())?;
        let height = u32::try_from(height).map_err(|_| too_large())?;

        Ok(Window {
            key: RenderKey::new(
                request.url.as_str(),
                width,
                height,
                request.keep_aspect_ratio,
            ),
            // start < width * height, which fits in memory by the checks above
            start: start as usize,
            capacity: usize::try_from(capacity).unwrap_or(usize::MAX),
        })
    }

    /// Get a reference to the underlying render service.
    pub fn renderer(&self) -> &Arc<RenderService<S>> {
        &self.renderer
    }

    /// Get the largest accepted width or height.
    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }
}

// =============================================================================
// Tests
// =============================================================================
