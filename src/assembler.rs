use crate::error::PipelineError;
use crate::models::{Board, BoardReading, TileReading, BOARD_SIDE, TILE_COUNT};
use crate::recognizer::ReadingSlots;

/// Reshape 16 row-major readings into a board.
///
/// Every slot must be filled; a board with an unresolved tile is never produced.
pub fn assemble(slots: ReadingSlots) -> Result<BoardReading, PipelineError> {
    let missing: Vec<usize> = slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.is_none())
        .map(|(index, _)| index)
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::BoardAssemblyFailed { missing });
    }

    let readings: [TileReading; TILE_COUNT] = slots
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .try_into()
        .map_err(|_| PipelineError::BoardAssemblyFailed { missing: Vec::new() })?;

    let mut rows = [[0u32; BOARD_SIDE]; BOARD_SIDE];
    for (index, reading) in readings.iter().enumerate() {
        rows[index / BOARD_SIDE][index % BOARD_SIDE] = reading.value();
    }

    Ok(BoardReading {
        board: Board::from_rows(rows),
        readings,
    })
}
