//! Pixel transformations.
//!
//! Pure functions that turn a decoded [`SourceImage`] into the packed
//! representation served to clients:
//!
//! ```text
//! SourceImage ──► fit / resize_exact ──► RgbaImage (width × height) ──► pack ──► Vec<u32>
//! ```
//!
//! - [`fit`]: letterboxed resize that preserves aspect ratio
//! - [`resize_exact`]: direct resize to the requested size
//! - [`pack`]: row-major ARGB packing, one `u32` per pixel

mod pack;
mod resize;
mod source;

pub use pack::{pack, pack_pixel, unpack};
pub use resize::{fit, resize_exact};
pub use source::SourceImage;
