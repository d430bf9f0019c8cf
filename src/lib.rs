//! Reads the state of a 2048 game board from a screenshot or photo.
//!
//! The board is located by its roughly square outline, cut into 16 tiles,
//! and every tile is normalized and run through digit OCR in parallel.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use tile2048_ocr::{BoardReader, OcrsDigitReader};
//! # async fn run() -> anyhow::Result<()> {
//! let engine = OcrsDigitReader::from_model_dir(std::path::Path::new("models"))?;
//! let reader = BoardReader::new(Arc::new(engine));
//! let bytes = std::fs::read("screenshot.png")?;
//! let reading = reader.read_bytes(&bytes).await?;
//! println!("{}", reading.board);
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod recognizer;

pub use detection::{DigitReader, LocatorConfig, NormalizerConfig, OcrsDigitReader, TileNormalizer};
pub use error::PipelineError;
pub use models::{
    Board, BoardReading, BoardResponse, BoundingBox, ErrorResponse, NormalizedTile, Tile, TileReading,
    TileValue, ACCEPTED_VALUES, BOARD_SIDE, TILE_COUNT,
};
pub use pipeline::{BoardReader, DebugConfig, ReaderConfig};
pub use recognizer::ConcurrentRecognizer;
