use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::task::JoinSet;

use crate::detection::{DigitReader, TileNormalizer};
use crate::error::PipelineError;
use crate::models::{Tile, TileReading, TILE_COUNT};
use crate::pipeline::DebugConfig;

/// One slot per tile; `None` until that tile's task reports back
pub type ReadingSlots = [Option<TileReading>; TILE_COUNT];

/// Runs normalization and OCR for every tile in parallel.
///
/// Each tile gets its own blocking task that returns `(index, reading)`.
/// Results are collected as they complete and placed by index, so the
/// completion order never affects the board.
pub struct ConcurrentRecognizer {
    reader: Arc<dyn DigitReader>,
    normalizer: TileNormalizer,
    timeout: Duration,
    debug: Option<DebugConfig>,
}

impl ConcurrentRecognizer {
    pub fn new(reader: Arc<dyn DigitReader>, normalizer: TileNormalizer, timeout: Duration) -> Self {
        Self {
            reader,
            normalizer,
            timeout,
            debug: None,
        }
    }

    pub fn with_debug(mut self, debug: Option<DebugConfig>) -> Self {
        self.debug = debug;
        self
    }

    /// Recognize all tiles and wait for every task to finish.
    ///
    /// Fails fast on the first task that errors or panics, and aborts the
    /// outstanding tasks when the timeout expires.
    pub async fn recognize(&self, tiles: Vec<Tile>) -> Result<ReadingSlots, PipelineError> {
        let mut tasks = JoinSet::new();

        for tile in tiles {
            let reader = Arc::clone(&self.reader);
            let normalizer = self.normalizer.clone();
            let debug = self.debug.clone();

            tasks.spawn_blocking(move || {
                let index = tile.index;
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    recognize_tile(reader.as_ref(), &normalizer, &tile, debug.as_ref())
                }))
                .unwrap_or_else(|payload| {
                    Err(PipelineError::RecognitionTaskFailed {
                        index,
                        reason: panic_message(payload.as_ref()),
                    })
                });
                (index, outcome)
            });
        }

        let collect = async {
            let mut slots: ReadingSlots = Default::default();
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((index, Ok(reading))) => match slots.get_mut(index) {
                        Some(slot) => *slot = Some(reading),
                        None => warn!("Dropping reading for out-of-range tile {}", index),
                    },
                    Ok((_, Err(err))) => return Err(err),
                    // Slot stays empty; assembly reports it
                    Err(join_err) => warn!("Recognition task did not complete: {}", join_err),
                }
            }
            Ok(slots)
        };

        let outcome = tokio::time::timeout(self.timeout, collect).await;
        match outcome {
            Ok(result) => result,
            Err(_) => {
                tasks.abort_all();
                Err(PipelineError::RecognitionTimeout(self.timeout))
            }
        }
    }
}

fn recognize_tile(
    reader: &dyn DigitReader,
    normalizer: &TileNormalizer,
    tile: &Tile,
    debug: Option<&DebugConfig>,
) -> Result<TileReading, PipelineError> {
    let normalized = match debug {
        Some(debug) => normalizer.normalize_inspect(tile, |step_index, name, image| {
            debug.save_step(step_index, name, tile.index, image)
        })?,
        None => normalizer.normalize(tile),
    };

    let text = reader
        .read_text(&normalized.image)
        .map_err(|e| PipelineError::RecognitionTaskFailed {
            index: tile.index,
            reason: format!("{:#}", e),
        })?;

    let reading = TileReading::from_text(&text);
    debug!(
        "Tile {} (row {}, col {}): {:?} -> {:?}",
        tile.index,
        tile.row(),
        tile.col(),
        text,
        reading
    );
    Ok(reading)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}
