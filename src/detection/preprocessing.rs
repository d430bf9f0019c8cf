use image::{GrayImage, RgbImage};
use imageproc::edges::canny;
use imageproc::filter::{gaussian_blur_f32, median_filter};

/// Convert image to grayscale
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    image::imageops::grayscale(img)
}

/// Apply Gaussian blur to reduce noise
pub fn apply_blur(img: &GrayImage, sigma: f32) -> GrayImage {
    gaussian_blur_f32(img, sigma)
}

/// Detect edges using Canny edge detector
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny(img, low_threshold, high_threshold)
}

/// Remap every pixel through a 256-entry lookup table
fn apply_lut(img: &GrayImage, lut: &[u8; 256]) -> GrayImage {
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        pixel[0] = lut[pixel[0] as usize];
    }
    out
}

/// Stretch the range [min, max] actually present in the image to [0, 255].
/// Flat images are returned unchanged.
pub fn auto_contrast(img: &GrayImage) -> GrayImage {
    let (lo, hi) = img
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));
    if hi <= lo {
        return img.clone();
    }

    let scale = 255.0 / (hi - lo) as f32;
    let offset = -(lo as f32) * scale;
    let mut lut = [0u8; 256];
    for (ix, entry) in lut.iter_mut().enumerate() {
        *entry = (ix as f32 * scale + offset).clamp(0.0, 255.0) as u8;
    }
    apply_lut(img, &lut)
}

/// Binarize: strictly brighter than `level` becomes white, everything else black
pub fn binarize(img: &GrayImage, level: u8) -> GrayImage {
    let mut lut = [0u8; 256];
    for (ix, entry) in lut.iter_mut().enumerate() {
        *entry = if ix > level as usize { 255 } else { 0 };
    }
    apply_lut(img, &lut)
}

pub fn mean_luminance(img: &GrayImage) -> f32 {
    let count = img.width() as u64 * img.height() as u64;
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = img.pixels().map(|p| p[0] as u64).sum();
    sum as f32 / count as f32
}

pub fn invert(img: &GrayImage) -> GrayImage {
    let mut out = img.clone();
    image::imageops::invert(&mut out);
    out
}

/// Square median filter of side `2 * radius + 1`
pub fn apply_median(img: &GrayImage, radius: u32) -> GrayImage {
    median_filter(img, radius, radius)
}
