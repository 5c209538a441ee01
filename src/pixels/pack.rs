//! Pixel packing.
//!
//! Each RGBA pixel becomes one `u32` laid out as `0xAARRGGBB`. Output order is
//! the buffer's row-major order; window offsets index directly into it.

use image::{Rgba, RgbaImage};

/// Pack an RGBA image into row-major `0xAARRGGBB` values.
pub fn pack(image: &RgbaImage) -> Vec<u32> {
    image
        .as_raw()
        .chunks_exact(4)
        .map(|px| pack_pixel(Rgba([px[0], px[1], px[2], px[3]])))
        .collect()
}

/// Pack a single pixel.
#[inline]
pub fn pack_pixel(pixel: Rgba<u8>) -> u32 {
    let [r, g, b, a] = pixel.0;
    (u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Recover the RGBA channels of a packed value.
#[inline]
pub fn unpack(value: u32) -> Rgba<u8> {
    let [a, r, g, b] = value.to_be_bytes();
    Rgba([r, g, b, a])
}
