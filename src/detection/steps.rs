use std::sync::Arc;

use image::GrayImage;

use crate::detection::preprocessing;
use crate::models::{NormalizedTile, Tile};

/// One stage of tile normalization
pub trait NormalizeStep: Send + Sync {
    fn apply(&self, img: GrayImage) -> GrayImage;

    /// Human-readable name for this step (used in logs and debug output)
    fn name(&self) -> &str;
}

/// Stretch contrast to the tile's own min/max
pub struct AutoContrastStep;

impl NormalizeStep for AutoContrastStep {
    fn apply(&self, img: GrayImage) -> GrayImage {
        preprocessing::auto_contrast(&img)
    }

    fn name(&self) -> &str {
        "Auto Contrast"
    }
}

/// Hard threshold into pure black and white
pub struct ThresholdStep {
    pub level: u8,
}

impl NormalizeStep for ThresholdStep {
    fn apply(&self, img: GrayImage) -> GrayImage {
        preprocessing::binarize(&img, self.level)
    }

    fn name(&self) -> &str {
        "Threshold"
    }
}

/// Invert mostly-dark tiles so digits always end up dark on light
pub struct PolarityStep {
    pub dark_mean: f32,
}

impl NormalizeStep for PolarityStep {
    fn apply(&self, img: GrayImage) -> GrayImage {
        if preprocessing::mean_luminance(&img) < self.dark_mean {
            preprocessing::invert(&img)
        } else {
            img
        }
    }

    fn name(&self) -> &str {
        "Polarity"
    }
}

/// Median filter against thresholding specks
pub struct MedianStep {
    pub radius: u32,
}

impl NormalizeStep for MedianStep {
    fn apply(&self, img: GrayImage) -> GrayImage {
        preprocessing::apply_median(&img, self.radius)
    }

    fn name(&self) -> &str {
        "Median Filter"
    }
}

/// Cut a fixed fraction off every edge to drop tile borders
pub struct TrimBorderStep {
    pub margin_ratio: f64,
}

impl NormalizeStep for TrimBorderStep {
    fn apply(&self, img: GrayImage) -> GrayImage {
        let (w, h) = img.dimensions();
        let left = (w as f64 * self.margin_ratio) as u32;
        let top = (h as f64 * self.margin_ratio) as u32;
        let right = (w as f64 * (1.0 - self.margin_ratio)) as u32;
        let bottom = (h as f64 * (1.0 - self.margin_ratio)) as u32;
        let width = right.saturating_sub(left);
        let height = bottom.saturating_sub(top);
        image::imageops::crop_imm(&img, left, top, width, height).to_image()
    }

    fn name(&self) -> &str {
        "Trim Border"
    }
}

/// Parameters of the standard normalization chain
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    pub threshold: u8,
    pub dark_mean: f32,
    pub median_radius: u32,
    pub margin_ratio: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            threshold: 150,
            dark_mean: 100.0,
            median_radius: 1,
            margin_ratio: 0.15,
        }
    }
}

/// Turns a color tile into a recognizer-ready binary image.
/// Holds no mutable state, so one instance can serve every tile concurrently.
#[derive(Clone)]
pub struct TileNormalizer {
    steps: Vec<Arc<dyn NormalizeStep>>,
}

impl TileNormalizer {
    /// Normalizer that only converts to grayscale
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Grayscale, contrast, threshold, polarity, median, trim
    pub fn standard(config: &NormalizerConfig) -> Self {
        Self::new()
            .add_step(Arc::new(AutoContrastStep))
            .add_step(Arc::new(ThresholdStep { level: config.threshold }))
            .add_step(Arc::new(PolarityStep { dark_mean: config.dark_mean }))
            .add_step(Arc::new(MedianStep { radius: config.median_radius }))
            .add_step(Arc::new(TrimBorderStep { margin_ratio: config.margin_ratio }))
    }

    pub fn add_step(mut self, step: Arc<dyn NormalizeStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn normalize(&self, tile: &Tile) -> NormalizedTile {
        let mut image = image::imageops::grayscale(&tile.image);
        for step in &self.steps {
            image = step.apply(image);
        }
        NormalizedTile { index: tile.index, image }
    }

    /// Like [`normalize`](Self::normalize), handing each intermediate image to `inspect`
    pub fn normalize_inspect<E>(
        &self,
        tile: &Tile,
        mut inspect: impl FnMut(usize, &str, &GrayImage) -> Result<(), E>,
    ) -> Result<NormalizedTile, E> {
        let mut image = image::imageops::grayscale(&tile.image);
        for (i, step) in self.steps.iter().enumerate() {
            image = step.apply(image);
            inspect(i, step.name(), &image)?;
        }
        Ok(NormalizedTile { index: tile.index, image })
    }
}

impl Default for TileNormalizer {
    fn default() -> Self {
        Self::standard(&NormalizerConfig::default())
    }
}
