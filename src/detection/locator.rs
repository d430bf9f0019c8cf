use image::RgbImage;
use log::debug;

use crate::detection::{contours, preprocessing};
use crate::error::PipelineError;
use crate::models::BoundingBox;

/// Thresholds for finding the board inside a screenshot
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    pub blur_sigma: f32,
    pub canny_low: f32,
    pub canny_high: f32,
    /// Inclusive width/height bounds for a candidate
    pub min_aspect: f32,
    pub max_aspect: f32,
    /// A candidate's box area must be strictly larger than this
    pub min_area: u64,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.1,
            canny_low: 50.0,
            canny_high: 150.0,
            min_aspect: 0.85,
            max_aspect: 1.15,
            min_area: 30_000,
        }
    }
}

impl LocatorConfig {
    pub fn accepts(&self, bbox: &BoundingBox) -> bool {
        let aspect = bbox.aspect_ratio();
        aspect >= self.min_aspect && aspect <= self.max_aspect && bbox.area() > self.min_area
    }
}

/// Keep roughly square, large enough boxes
pub fn filter_candidates(boxes: &[BoundingBox], config: &LocatorConfig) -> Vec<BoundingBox> {
    boxes.iter().filter(|b| config.accepts(b)).copied().collect()
}

/// Largest candidate by area; the first one wins a tie
pub fn select_largest(candidates: &[BoundingBox]) -> Option<BoundingBox> {
    candidates
        .iter()
        .copied()
        .reduce(|best, b| if b.area() > best.area() { b } else { best })
}

/// Find the board's bounding box in a full screenshot
pub fn locate_board(img: &RgbImage, config: &LocatorConfig) -> Result<BoundingBox, PipelineError> {
    let gray = preprocessing::to_grayscale(img);
    let blurred = preprocessing::apply_blur(&gray, config.blur_sigma);
    let edges = preprocessing::detect_edges(&blurred, config.canny_low, config.canny_high);

    let boxes = contours::external_bounding_boxes(&edges);
    let candidates = filter_candidates(&boxes, config);
    debug!(
        "Locator: {} external contours, {} board candidates",
        boxes.len(),
        candidates.len()
    );

    let bbox = select_largest(&candidates).ok_or(PipelineError::BoardNotFound)?;
    debug!(
        "Locator: board at ({}, {}) {}x{}",
        bbox.x, bbox.y, bbox.width, bbox.height
    );
    Ok(bbox)
}

/// Locate the board and crop it out of the screenshot
pub fn crop_board(img: &RgbImage, config: &LocatorConfig) -> Result<RgbImage, PipelineError> {
    let bbox = locate_board(img, config)?;
    Ok(image::imageops::crop_imm(img, bbox.x, bbox.y, bbox.width, bbox.height).to_image())
}
