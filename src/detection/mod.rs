//! Image-side stages of board reading: finding the board, cutting tiles,
//! normalizing them, and the OCR engine they are handed to.

pub mod preprocessing;
pub mod contours;
pub mod locator;
pub mod tiles;
pub mod steps;
pub mod ocr;

pub use locator::{crop_board, locate_board, LocatorConfig};
pub use ocr::{DigitReader, OcrsDigitReader};
pub use steps::{NormalizerConfig, TileNormalizer};
pub use tiles::split_into_tiles;
