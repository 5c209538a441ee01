//! Remote image fetching and caching.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Render Service               │
//! └────────────────────┬────────────────────┘
//!                      │ fetch(url)
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              FetchCache                 │
//! │  (LRU of decoded images, single-flight) │
//! └────────────────────┬────────────────────┘
//!                      │ fetch_bytes(url), on miss
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          ImageSource Trait              │
//! │  HttpImageSource (reqwest GET)          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Only successful decodes are cached. A failed fetch is returned to every
//! caller waiting on that fetch and then forgotten, so the next request for
//! the same URL goes back to the network.

mod cache;
mod source;

pub use cache::{FetchCache, DEFAULT_FETCH_CACHE_CAPACITY};
pub use source::{
    HttpImageSource, ImageSource, DEFAULT_FETCH_TIMEOUT, IMAGE_CONTENT_TYPE, LEGACY_USER_AGENT,
};
