//! Image preprocessing for scanned documents.
//!
//! Scanned legal notices are frequently low-contrast photocopies or phone
//! photos. A fixed three-step pass (grayscale, contrast boost, sharpen)
//! makes weak type legible to the recognition engine without any
//! per-document tuning.

use image::{imageops, DynamicImage, GrayImage, Luma};

/// Contrast multiplier applied around the image's mean luminance.
const CONTRAST_FACTOR: f32 = 2.0;

/// 3x3 edge-emphasis kernel, 1/16 scale. Weights sum to 1, so flat
/// regions pass through unchanged.
#[rustfmt::skip]
const SHARPEN_KERNEL: [f32; 9] = [
    -2.0 / 16.0, -2.0 / 16.0, -2.0 / 16.0,
    -2.0 / 16.0, 32.0 / 16.0, -2.0 / 16.0,
    -2.0 / 16.0, -2.0 / 16.0, -2.0 / 16.0,
];

/// Prepare a scanned document image for text recognition.
///
/// Converts to grayscale, doubles the contrast around the image's
/// midtone, and sharpens the interior. Border pixels keep their
/// contrast-adjusted value. Pure transform: the output always has the
/// input's dimensions, and a zero-dimension input passes through as an
/// empty grayscale image.
pub fn preprocess(image: &DynamicImage) -> GrayImage {
    let gray = image.to_luma8();
    if gray.width() == 0 || gray.height() == 0 {
        return gray;
    }

    let boosted = adjust_contrast(&gray, CONTRAST_FACTOR);
    let mut sharpened = imageops::filter3x3(&boosted, &SHARPEN_KERNEL);
    restore_border(&mut sharpened, &boosted);
    sharpened
}

/// Scale pixel values away from the image's mean luminance.
///
/// Values below the mean darken and values above it lighten, in
/// proportion to `factor`. A uniform image is unchanged.
fn adjust_contrast(image: &GrayImage, factor: f32) -> GrayImage {
    let midtone = mean_luminance(image);
    let mut output = image.clone();
    for pixel in output.pixels_mut() {
        let value = pixel[0] as f32;
        let adjusted = factor * (value - midtone) + midtone;
        *pixel = Luma([adjusted.clamp(0.0, 255.0) as u8]);
    }
    output
}

fn mean_luminance(image: &GrayImage) -> f32 {
    let total: u64 = image.pixels().map(|p| p[0] as u64).sum();
    total as f32 / (image.width() as u64 * image.height() as u64) as f32
}

/// `filter3x3` convolves interior pixels only and leaves the one-pixel
/// output border zeroed. Copy the unfiltered border values back in.
fn restore_border(output: &mut GrayImage, source: &GrayImage) {
    let (width, height) = source.dimensions();
    for x in 0..width {
        output.put_pixel(x, 0, *source.get_pixel(x, 0));
        output.put_pixel(x, height - 1, *source.get_pixel(x, height - 1));
    }
    for y in 0..height {
        output.put_pixel(0, y, *source.get_pixel(0, y));
        output.put_pixel(width - 1, y, *source.get_pixel(width - 1, y));
    }
}
