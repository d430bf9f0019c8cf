use image::RgbImage;
use log::{debug, warn};

use crate::models::{BoundingBox, Tile, BOARD_SIDE};

/// Edge length of one tile. Taken from the shorter board side so every
/// tile stays inside the image when the located box is not quite square.
pub fn tile_size(board: &RgbImage) -> u32 {
    board.width().min(board.height()) / BOARD_SIDE as u32
}

/// Cut the board into 16 equal squares in row-major order
pub fn split_into_tiles(board: &RgbImage) -> Vec<Tile> {
    let (width, height) = board.dimensions();
    if width != height {
        warn!("Board is {}x{}, tiling from the shorter side", width, height);
    }

    let size = tile_size(board);
    debug!("Splitting board into {}x{} tiles", size, size);

    (0..BOARD_SIDE * BOARD_SIDE)
        .map(|index| {
            let row = (index / BOARD_SIDE) as u32;
            let col = (index % BOARD_SIDE) as u32;
            let bbox = BoundingBox::new(col * size, row * size, size, size);
            let image = image::imageops::crop_imm(board, bbox.x, bbox.y, size, size).to_image();
            Tile { index, bbox, image }
        })
        .collect()
}
