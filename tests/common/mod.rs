mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from tile2048_ocr for tests
pub use tile2048_ocr::{Board, BoardReader, DigitReader, PipelineError, TileReading};
