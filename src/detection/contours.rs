use image::GrayImage;
use imageproc::contours::{find_contours, BorderType, Contour};
use crate::models::BoundingBox;

/// Bounding boxes of the outermost contours in a binary edge image.
/// Contours nested inside another contour are ignored.
pub fn external_bounding_boxes(edges: &GrayImage) -> Vec<BoundingBox> {
    find_contours::<u32>(edges)
        .iter()
        .filter(|c| c.parent.is_none() && matches!(c.border_type, BorderType::Outer))
        .filter_map(bounding_box)
        .collect()
}

fn bounding_box(contour: &Contour<u32>) -> Option<BoundingBox> {
    let first = contour.points.first()?;
    let (min_x, min_y, max_x, max_y) = contour.points.iter().fold(
        (first.x, first.y, first.x, first.y),
        |(min_x, min_y, max_x, max_y), p| {
            (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
        },
    );
    Some(BoundingBox::from_extent(min_x, min_y, max_x, max_y))
}
