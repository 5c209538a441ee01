//! Rendered-pixel layer.
//!
//! Turns a source image into the packed pixel sequence for one requested
//! size and aspect mode, and caches the result.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             Window Service              │
//! └────────────────────┬────────────────────┘
//!                      │ render(key)
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │             RenderService               │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │ RenderCache  │  │ fit / resize    │  │
//! │  │ (packed u32  │  │   → pack        │  │
//! │  │  sequences)  │  │                 │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │ fetch(url), on miss
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              FetchCache                 │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`RenderService`]: resolves a [`RenderKey`] to packed pixels
//! - [`RenderCache`]: LRU cache bounded by entry count
//! - [`RenderKey`]: (url, width, height, keep-aspect-ratio)
//!
//! Rendered entries are derived from whatever image the fetch cache held at
//! render time and are not invalidated when that image is later refetched.

mod cache;
mod service;

pub use cache::{RenderCache, RenderKey, DEFAULT_RENDER_CACHE_CAPACITY};
pub use service::{RenderOutput, RenderService};
