//! Image resizing.
//!
//! Both resize modes use Catmull-Rom, the cubic convolution kernel commonly
//! referred to as "bicubic".
//!
//! # Aspect-Fit Rule
//!
//! [`fit`] picks its driving axis by comparing the source width and height,
//! not by computing the largest box that fits. A wide source always scales to
//! the target width and a tall source always scales to the target height. When
//! the scaled size on the other axis exceeds the target, the overflow is
//! clipped when pasting onto the canvas.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Interpolation filter used by both resize modes.
const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Resize to exactly `width` x `height`, ignoring aspect ratio.
pub fn resize_exact(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    imageops::resize(image, width, height, RESIZE_FILTER)
}

/// Resize preserving aspect ratio, centered on a transparent canvas.
///
/// The result is always exactly `width` x `height`. Pixels outside the pasted
/// content have every channel set to zero.
pub fn fit(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let mut canvas = RgbaImage::new(width, height);
    let (src_width, src_height) = image.dimensions();

    if src_width >= src_height {
        let k = f64::from(width) / f64::from(src_width);
        let scaled = resize_exact(image, width, scale_dimension(src_height, k));
        let y = centered_offset(height, scaled.height());
        imageops::replace(&mut canvas, &scaled, 0, y);
    } else {
        let k = f64::from(height) / f64::from(src_height);
        let scaled = resize_exact(image, scale_dimension(src_width, k), height);
        let x = centered_offset(width, scaled.width());
        imageops::replace(&mut canvas, &scaled, x, 0);
    }

    canvas
}

/// Scale a source dimension by `k`, rounding to the nearest pixel (at least 1).
fn scale_dimension(len: u32, k: f64) -> u32 {
    ((f64::from(len) * k).round() as u32).max(1)
}

/// Floor-divided centering offset; negative when content overflows the canvas.
fn centered_offset(canvas: u32, content: u32) -> i64 {
    (i64::from(canvas) - i64::from(content)).div_euclid(2)
}
