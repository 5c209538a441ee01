//! Image Fetch Cache.
//!
//! The fetch cache provides:
//! - LRU caching of decoded images keyed by the exact URL string
//! - Singleflight so concurrent misses for one URL share a single request
//! - RGBA normalization of every decoded payload
//!
//! Failures are never stored. Callers already waiting on a failing fetch
//! receive its error; later callers trigger a fresh request.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tokio::sync::{Mutex, OnceCell, RwLock};
use tracing::{debug, info};

use crate::error::FetchError;
use crate::pixels::SourceImage;

use super::source::ImageSource;

/// Default number of decoded images to keep.
pub const DEFAULT_FETCH_CACHE_CAPACITY: usize = 10;

type FetchResult = Result<Arc<SourceImage>, FetchError>;

/// Result cell shared by all callers waiting on the same URL.
type InFlight = Arc<OnceCell<FetchResult>>;

// =============================================================================
// FetchCache
// =============================================================================

/// Bounded cache of decoded remote images.
///
/// # Example
///
/// ```ignore
/// use picpix::fetch::{FetchCache, HttpImageSource};
///
/// let cache = FetchCache::with_capacity(HttpImageSource::new()?, 10);
///
/// // First call hits the network, the second is served from memory
/// let image = cache.fetch("https://example.com/cat.png").await?;
/// let again = cache.fetch("https://example.com/cat.png").await?;
/// ```
pub struct FetchCache<S: ImageSource> {
    /// Where image bytes come from on a miss
    source: S,

    /// Decoded images indexed by URL
    cache: RwLock<LruCache<String, Arc<SourceImage>>>,

    /// Fetches currently in progress
    in_flight: Mutex<HashMap<String, InFlight>>,

    /// Maximum number of cached images
    capacity: usize,
}

impl<S: ImageSource> FetchCache<S> {
    /// Create a fetch cache with the default capacity.
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, DEFAULT_FETCH_CACHE_CAPACITY)
    }

    /// Create a fetch cache holding at most `capacity` images (minimum 1).
    pub fn with_capacity(source: S, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            source,
            cache: RwLock::new(LruCache::new(capacity)),
            in_flight: Mutex::new(HashMap::new()),
            capacity: capacity.get(),
        }
    }

    /// Get the decoded image for `url`, fetching it on a miss.
    ///
    /// A hit marks the entry as recently used and performs no network access.
    pub async fn fetch(&self, url: &str) -> FetchResult {
        // Fast path: check cache
        if let Some(image) = self.cache.write().await.get(url) {
            debug!(url, "fetch cache hit");
            return Ok(Arc::clone(image));
        }

        // Slow path: join an existing flight or start one
        let cell = {
            let mut in_flight = self.in_flight.lock().await;

            // The previous leader may have finished since the fast path
            if let Some(image) = self.cache.write().await.get(url) {
                return Ok(Arc::clone(image));
            }

            Arc::clone(in_flight.entry(url.to_string()).or_default())
        };

        cell.get_or_init(|| self.lead(url, &cell)).await.clone()
    }

    /// Run one flight: load, publish a success to the cache, then retire the
    /// in-flight entry.
    ///
    /// All of this happens before `cell` is set. If the flight is dropped
    /// part way, the cell stays empty and the next caller runs it again, so an
    /// initialized cell is never reachable from `in_flight`.
    async fn lead(&self, url: &str, cell: &InFlight) -> FetchResult {
        let result = self.load(url).await;

        if let Ok(ref image) = result {
            let mut cache = self.cache.write().await;
            if let Some((evicted, _)) = cache.push(url.to_string(), Arc::clone(image)) {
                if evicted != url {
                    debug!(url = %evicted, "fetch cache evicted");
                }
            }
        }

        let mut in_flight = self.in_flight.lock().await;
        if in_flight
            .get(url)
            .is_some_and(|current| Arc::ptr_eq(current, cell))
        {
            in_flight.remove(url);
        }

        result
    }

    /// Fetch and decode without touching the cache.
    async fn load(&self, url: &str) -> FetchResult {
        debug!(url, "fetch cache miss");
        let bytes = self.source.fetch_bytes(url).await?;
        let image = SourceImage::decode(&bytes)?;
        info!(
            url,
            width = image.width(),
            height = image.height(),
            bytes = bytes.len(),
            "fetched image"
        );
        Ok(Arc::new(image))
    }

    /// Check if `url` is cached without updating LRU order.
    pub async fn contains(&self, url: &str) -> bool {
        self.cache.read().await.contains(url)
    }

    /// Get the number of cached images.
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    /// Get the maximum number of cached images.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get a reference to the underlying image source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

// =============================================================================
// Tests
// =============================================================================
