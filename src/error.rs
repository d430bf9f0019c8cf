use std::time::Duration;

use thiserror::Error;

/// Everything that can stop a board from being read
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input bytes are not a decodable image
    #[error("image could not be decoded")]
    DecodeFailed(#[source] image::ImageError),
    /// No region passed the aspect-ratio and area filters
    #[error("board not found in the image")]
    BoardNotFound,
    /// A recognition task crashed or its engine call failed
    #[error("recognition of tile {index} failed: {reason}")]
    RecognitionTaskFailed { index: usize, reason: String },
    /// Recognition did not finish within the configured time
    #[error("recognition timed out after {0:?}")]
    RecognitionTimeout(Duration),
    /// Some slots were never written after all tasks joined
    #[error("board assembly failed, unresolved tiles: {missing:?}")]
    BoardAssemblyFailed { missing: Vec<usize> },
    /// Writing debug artifacts failed
    #[error("could not write debug output to {path}")]
    DebugOutput {
        path: String,
        source: image::ImageError,
    },
}
