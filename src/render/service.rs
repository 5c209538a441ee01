//! Render Service for producing packed pixel sequences.
//!
//! The RenderService orchestrates:
//! - Render cache lookups
//! - Source image access via the fetch cache
//! - Resizing (stretched or letterboxed)
//! - Packing and result caching

use std::sync::Arc;

use tracing::debug;

use crate::error::FetchError;
use crate::fetch::{FetchCache, ImageSource};
use crate::pixels::{self, SourceImage};

use super::cache::{RenderCache, RenderKey};

// =============================================================================
// Render Output
// =============================================================================

/// Packed pixels for a render key.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Row-major `0xAARRGGBB` values, `width * height` long
    pub pixels: Arc<[u32]>,

    /// Whether the sequence was served from the render cache
    pub cache_hit: bool,
}

// =============================================================================
// Render Service
// =============================================================================

/// Service for rendering and caching packed pixel sequences.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use picpix::fetch::{FetchCache, HttpImageSource};
/// use picpix::render::{RenderKey, RenderService};
///
/// let fetch_cache = FetchCache::new(HttpImageSource::new()?);
/// let service = RenderService::new(Arc::new(fetch_cache));
///
/// let key = RenderKey::new("https://example.com/cat.png", 64, 64, true);
/// let output = service.render(&key).await?;
/// assert_eq!(output.pixels.len(), 64 * 64);
/// ```
pub struct RenderService<S: ImageSource> {
    /// Shared cache of decoded source images
    fetch_cache: Arc<FetchCache<S>>,

    /// Cache for packed sequences
    cache: RenderCache,
}

impl<S: ImageSource> RenderService<S> {
    /// Create a render service with the default render cache capacity.
    pub fn new(fetch_cache: Arc<FetchCache<S>>) -> Self {
        Self {
            fetch_cache,
            cache: RenderCache::new(),
        }
    }

    /// Create a render service with a custom render cache capacity.
    pub fn with_cache_capacity(fetch_cache: Arc<FetchCache<S>>, cache_capacity: usize) -> Self {
        Self {
            fetch_cache,
            cache: RenderCache::with_capacity(cache_capacity),
        }
    }

    /// Get the packed pixels for `key`, using the cache when available.
    ///
    /// # Errors
    ///
    /// Propagates any [`FetchError`] from fetching the source image. Errors
    /// are not cached.
    pub async fn render(&self, key: &RenderKey) -> Result<RenderOutput, FetchError> {
        if let Some(pixels) = self.cache.get(key).await {
            debug!(url = %key.url, width = key.width, height = key.height, "render cache hit");
            return Ok(RenderOutput {
                pixels,
                cache_hit: true,
            });
        }

        let source = self.fetch_cache.fetch(&key.url).await?;

        // Resizing is CPU bound; keep it off the async workers
        let job_key = key.clone();
        let pixels: Arc<[u32]> =
            match tokio::task::spawn_blocking(move || rasterize(&source, &job_key)).await {
                Ok(pixels) => pixels.into(),
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                Err(err) => {
                    return Err(FetchError::Decode(format!("render task cancelled: {}", err)))
                }
            };

        self.cache.put(key.clone(), Arc::clone(&pixels)).await;

        Ok(RenderOutput {
            pixels,
            cache_hit: false,
        })
    }

    /// Get render cache statistics.
    ///
    /// Returns `(entry_count, capacity)`.
    pub async fn cache_stats(&self) -> (usize, usize) {
        (self.cache.len().await, self.cache.capacity())
    }

    /// Get a reference to the underlying fetch cache.
    pub fn fetch_cache(&self) -> &Arc<FetchCache<S>> {
        &self.fetch_cache
    }
}

/// Resize `source` for `key` and pack the result.
fn rasterize(source: &SourceImage, key: &RenderKey) -> Vec<u32> {
    let resized = if key.keep_aspect_ratio {
        pixels::fit(source.as_rgba(), key.width, key.height)
    } else {
        pixels::resize_exact(source.as_rgba(), key.width, key.height)
    };
    pixels::pack(&resized)
}

// =============================================================================
// Tests
// =============================================================================
