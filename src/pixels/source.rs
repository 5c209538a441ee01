use image::RgbaImage;

use crate::error::FetchError;

/// A decoded remote image, normalized to 8-bit RGBA.
///
/// Immutable after construction; shared between cache and callers via `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    /// Decode an encoded image payload (any supported format) into RGBA.
    ///
    /// Palette, grayscale and RGB sources are expanded to four channels.
    /// Animated formats contribute their first frame.
    pub fn decode(data: &[u8]) -> Result<Self, FetchError> {
        let decoded = image::load_from_memory(data)?;
        Self::from_rgba(decoded.into_rgba8())
    }

    /// Wrap an already decoded RGBA buffer.
    ///
    /// Fails with a decode error if either dimension is zero.
    pub fn from_rgba(pixels: RgbaImage) -> Result<Self, FetchError> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(FetchError::Decode(format!(
                "image has empty dimensions {}x{}",
                pixels.width(),
                pixels.height()
            )));
        }
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Borrow the underlying RGBA buffer.
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }
}
