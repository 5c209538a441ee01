//! Render cache for packed pixel sequences.
//!
//! # Cache Key
//!
//! Entries are keyed by value on all four of:
//! - Source URL (exact string)
//! - Target width
//! - Target height
//! - Aspect-preserving flag
//!
//! Two keys that differ only in aspect mode are distinct entries.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tokio::sync::RwLock;
use tracing::debug;

/// Default number of rendered sequences to keep.
pub const DEFAULT_RENDER_CACHE_CAPACITY: usize = 10;

// =============================================================================
// Cache Key
// =============================================================================

/// Cache key for a rendered pixel sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderKey {
    /// Source image URL
    pub url: Arc<str>,

    /// Target width in pixels
    pub width: u32,

    /// Target height in pixels
    pub height: u32,

    /// Letterbox instead of stretching
    pub keep_aspect_ratio: bool,
}

impl RenderKey {
    /// Create a new render key.
    pub fn new(url: impl Into<Arc<str>>, width: u32, height: u32, keep_aspect_ratio: bool) -> Self {
        Self {
            url: url.into(),
            width,
            height,
            keep_aspect_ratio,
        }
    }

    /// Number of packed values a render for this key produces.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

// =============================================================================
// Render Cache
// =============================================================================

/// LRU cache of packed pixel sequences with an entry-count capacity.
///
/// Values are handed out as `Arc<[u32]>`, so evicting an entry never affects a
/// caller still reading it.
pub struct RenderCache {
    cache: RwLock<LruCache<RenderKey, Arc<[u32]>>>,
    capacity: usize,
}

impl RenderCache {
    /// Create a render cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RENDER_CACHE_CAPACITY)
    }

    /// Create a render cache holding at most `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(capacity)),
            capacity: capacity.get(),
        }
    }

    /// Get a sequence from the cache, marking it as recently used.
    pub async fn get(&self, key: &RenderKey) -> Option<Arc<[u32]>> {
        let mut cache = self.cache.write().await;
        cache.get(key).cloned()
    }

    /// Check if a key is cached without updating LRU order.
    pub async fn contains(&self, key: &RenderKey) -> bool {
        let cache = self.cache.read().await;
        cache.contains(key)
    }

    /// Store a sequence, evicting the least recently used entry if full.
    pub async fn put(&self, key: RenderKey, pixels: Arc<[u32]>) {
        let mut cache = self.cache.write().await;
        if let Some((evicted, _)) = cache.push(key.clone(), pixels) {
            if evicted != key {
                debug!(
                    url = %evicted.url,
                    width = evicted.width,
                    height = evicted.height,
                    keep_aspect_ratio = evicted.keep_aspect_ratio,
                    "render cache evicted"
                );
            }
        }
    }

    /// Get the current number of cached sequences.
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    /// Get the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
