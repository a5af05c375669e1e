//! Frame preprocessing: grayscale, blur, and difference masks.

use image::{GrayImage, Luma, RgbImage};
use imageproc::filter::separable_filter_equal;

/// Mask value for a pixel that changed between frames.
pub const MOTION_PIXEL: u8 = 255;

/// Build a normalized 1D Gaussian kernel of `size` taps.
///
/// Sigma is derived from the size the same way OpenCV does when it is
/// left unspecified: `0.3 * ((size - 1) * 0.5 - 1) + 0.8`. Even sizes are
/// bumped to the next odd size.
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    let size = size.max(1) | 1;
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let center = (size / 2) as f32;
    let denom = 2.0 * sigma * sigma;

    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / denom).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for tap in &mut kernel {
        *tap /= sum;
    }
    kernel
}

/// Grayscale conversion followed by a separable Gaussian blur.
///
/// Borders are clamped to the edge pixel rather than reflected as OpenCV's
/// default `BORDER_REFLECT_101` does, so blurred values within half a
/// kernel of the frame edge differ slightly. Zones sit well inside the
/// frame and a shared border rule cancels out in the frame difference.
pub fn preprocess(frame: &RgbImage, kernel: &[f32]) -> GrayImage {
    let gray = image::imageops::grayscale(frame);
    separable_filter_equal(&gray, kernel)
}

/// Binary mask of pixels whose absolute difference exceeds `threshold`.
///
/// Both frames must have the same dimensions; the mask takes the
/// dimensions of `current`.
pub fn motion_mask(previous: &GrayImage, current: &GrayImage, threshold: u8) -> GrayImage {
    debug_assert_eq!(previous.dimensions(), current.dimensions());

    GrayImage::from_fn(current.width(), current.height(), |x, y| {
        let before = previous.get_pixel(x, y)[0];
        let after = current.get_pixel(x, y)[0];
        if before.abs_diff(after) > threshold {
            Luma([MOTION_PIXEL])
        } else {
            Luma([0])
        }
    })
}
