use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use tile2048_ocr::DigitReader;

pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub const BOARD: Rgb<u8> = Rgb([60, 60, 60]);
pub const GLYPH: Rgb<u8> = Rgb([250, 250, 250]);

/// Origin and side of the board drawn by [`board_image`]
pub const BOARD_ORIGIN: u32 = 20;
pub const BOARD_SIDE_PX: u32 = 360;

/// 400x400 white image with a centered 360x360 dark board.
/// Tiles listed in `glyph_tiles` get a light block in their center.
pub fn board_image(glyph_tiles: &[usize]) -> RgbImage {
    let mut img = RgbImage::from_pixel(400, 400, BACKGROUND);
    fill(&mut img, BOARD_ORIGIN, BOARD_ORIGIN, BOARD_SIDE_PX, BOARD_SIDE_PX, BOARD);

    let cell = BOARD_SIDE_PX / 4;
    for &index in glyph_tiles {
        let x = BOARD_ORIGIN + (index % 4) as u32 * cell + 32;
        let y = BOARD_ORIGIN + (index / 4) as u32 * cell + 28;
        fill(&mut img, x, y, 26, 34, GLYPH);
    }
    img
}

pub fn fill(img: &mut RgbImage, x0: u32, y0: u32, width: u32, height: u32, color: Rgb<u8>) {
    for y in y0..y0 + height {
        for x in x0..x0 + width {
            img.put_pixel(x, y, color);
        }
    }
}

pub fn png_bytes(img: RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("Failed to encode test image");
    bytes
}

fn has_ink(tile: &GrayImage) -> bool {
    tile.pixels().any(|p| p[0] == 0)
}

/// Returns `text` for tiles with dark pixels and nothing for blank tiles
pub struct InkReader {
    pub text: &'static str,
    pub calls: AtomicUsize,
}

impl InkReader {
    pub fn new(text: &'static str) -> Self {
        Self { text, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DigitReader for InkReader {
    fn read_text(&self, tile: &GrayImage) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(if has_ink(tile) { self.text.to_string() } else { String::new() })
    }
}

/// Returns the same text for every tile
pub struct ConstReader(pub &'static str);

impl DigitReader for ConstReader {
    fn read_text(&self, _tile: &GrayImage) -> anyhow::Result<String> {
        Ok(self.0.to_string())
    }
}

/// Engine error on inked tiles
pub struct FailingReader;

impl DigitReader for FailingReader {
    fn read_text(&self, tile: &GrayImage) -> anyhow::Result<String> {
        if has_ink(tile) {
            anyhow::bail!("engine crashed");
        }
        Ok(String::new())
    }
}

/// Panics on inked tiles
pub struct PanickingReader;

impl DigitReader for PanickingReader {
    fn read_text(&self, tile: &GrayImage) -> anyhow::Result<String> {
        if has_ink(tile) {
            panic!("ocr engine went away");
        }
        Ok(String::new())
    }
}

/// Blocks for a while before answering
pub struct SlowReader(pub Duration);

impl DigitReader for SlowReader {
    fn read_text(&self, _tile: &GrayImage) -> anyhow::Result<String> {
        std::thread::sleep(self.0);
        Ok(String::new())
    }
}
