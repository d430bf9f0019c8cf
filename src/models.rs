use std::fmt;

use image::{GrayImage, RgbImage};
use serde::Serialize;

/// Number of tiles along each side of the board
pub const BOARD_SIDE: usize = 4;

/// Number of tiles on the board
pub const TILE_COUNT: usize = BOARD_SIDE * BOARD_SIDE;

/// Tile numbers the game can actually show
pub const ACCEPTED_VALUES: [u32; 11] = [2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048];

/// Axis-aligned region in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Build the box spanned by two inclusive corner points
    pub fn from_extent(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f32 / self.height as f32
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// One cell of the board, cut from the located board image
#[derive(Debug, Clone)]
pub struct Tile {
    /// Row-major position on the board, 0..16
    pub index: usize,
    /// Region of the board image this tile was cut from
    pub bbox: BoundingBox,
    pub image: RgbImage,
}

impl Tile {
    pub fn row(&self) -> usize {
        self.index / BOARD_SIDE
    }

    pub fn col(&self) -> usize {
        self.index % BOARD_SIDE
    }
}

/// Recognizer-ready form of a tile: single channel, binarized, border trimmed
#[derive(Debug, Clone)]
pub struct NormalizedTile {
    pub index: usize,
    pub image: GrayImage,
}

/// A whitelisted tile number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TileValue(u32);

impl TileValue {
    /// Accept `value` only if it is one of [`ACCEPTED_VALUES`]
    pub fn new(value: u32) -> Option<Self> {
        ACCEPTED_VALUES.contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// What the recognizer made of a single tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileReading {
    /// A whitelisted tile number
    Recognized(TileValue),
    /// The engine returned no text at all
    Blank,
    /// The engine returned text that is not a whitelisted number
    Rejected(String),
}

impl TileReading {
    /// Classify raw engine output
    pub fn from_text(raw: &str) -> Self {
        let text = raw.trim();
        if text.is_empty() {
            return TileReading::Blank;
        }
        if !text.chars().all(|c| c.is_ascii_digit()) {
            return TileReading::Rejected(text.to_string());
        }
        match text.parse::<u32>().ok().and_then(TileValue::new) {
            Some(value) => TileReading::Recognized(value),
            None => TileReading::Rejected(text.to_string()),
        }
    }

    /// Board value for this reading; anything not recognized counts as an empty tile
    pub fn value(&self) -> u32 {
        match self {
            TileReading::Recognized(v) => v.get(),
            TileReading::Blank | TileReading::Rejected(_) => 0,
        }
    }
}

/// Final 4x4 grid of tile values, 0 meaning empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Board([[u32; BOARD_SIDE]; BOARD_SIDE]);

impl Board {
    pub fn from_rows(rows: [[u32; BOARD_SIDE]; BOARD_SIDE]) -> Self {
        Self(rows)
    }

    pub fn rows(&self) -> &[[u32; BOARD_SIDE]; BOARD_SIDE] {
        &self.0
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        self.0.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Values in row-major order
    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().flatten().copied()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.0.iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            let cells: Vec<String> = row
                .iter()
                .map(|&v| if v == 0 { format!("{:>5}", ".") } else { format!("{:>5}", v) })
                .collect();
            write!(f, "{}", cells.join(""))?;
        }
        Ok(())
    }
}

/// Board plus the per-tile readings it was built from
#[derive(Debug, Clone)]
pub struct BoardReading {
    pub board: Board,
    pub readings: [TileReading; TILE_COUNT],
}

/// Successful response body: `{"board": [[...], ...]}`
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub board: Board,
}

/// Failure response body: `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
