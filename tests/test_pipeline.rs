//! End-to-end board reading on synthetic screenshots.
//!
//! The OCR engine is replaced by small fake readers so the tests exercise
//! location, tiling, normalization, fan-out and assembly deterministically.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::*;

fn reader_with(engine: impl DigitReader + 'static) -> BoardReader {
    BoardReader::new(Arc::new(engine))
}

#[tokio::test]
async fn test_blank_board_reads_as_all_zeros() -> anyhow::Result<()> {
    let engine = Arc::new(InkReader::new("2"));
    let reader = BoardReader::new(engine.clone());

    let reading = reader.read_bytes(&png_bytes(board_image(&[]))).await?;

    assert_eq!(reading.board, Board::from_rows([[0; 4]; 4]));
    assert!(reading.readings.iter().all(|r| *r == TileReading::Blank));
    assert_eq!(engine.calls(), 16);
    Ok(())
}

#[tokio::test]
async fn test_digits_land_in_their_row_and_column() -> anyhow::Result<()> {
    let reader = reader_with(InkReader::new("2048"));

    let reading = reader.read_image(board_image(&[1, 6, 12])).await?;

    assert_eq!(
        reading.board,
        Board::from_rows([
            [0, 2048, 0, 0],
            [0, 0, 2048, 0],
            [0, 0, 0, 0],
            [2048, 0, 0, 0],
        ])
    );
    Ok(())
}

#[tokio::test]
async fn test_unlisted_value_is_an_empty_tile() -> anyhow::Result<()> {
    let reader = reader_with(ConstReader("7"));

    let reading = reader.read_image(board_image(&[])).await?;

    assert!(reading.board.values().all(|v| v == 0));
    assert!(reading
        .readings
        .iter()
        .all(|r| *r == TileReading::Rejected("7".to_string())));
    Ok(())
}

#[tokio::test]
async fn test_board_values_stay_in_domain() -> anyhow::Result<()> {
    for text in ["2", "32", "128", "512", "2048", "3", "abc", "0", "4096"] {
        let reading = reader_with(ConstReader(text)).read_image(board_image(&[])).await?;
        for v in reading.board.values() {
            assert!(v == 0 || (v.is_power_of_two() && (2..=2048).contains(&v)), "{} -> {}", text, v);
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_same_bytes_give_same_board() -> anyhow::Result<()> {
    let reader = reader_with(InkReader::new("64"));
    let bytes = png_bytes(board_image(&[0, 5, 10, 15]));

    let first = reader.read_bytes(&bytes).await?;
    let second = reader.read_bytes(&bytes).await?;

    assert_eq!(first.board, second.board);
    assert_eq!(first.board.get(2, 2), Some(64));
    Ok(())
}

#[tokio::test]
async fn test_small_square_is_not_a_board() {
    let engine = Arc::new(InkReader::new("2"));
    let reader = BoardReader::new(engine.clone());

    let mut img = image::RgbImage::from_pixel(400, 400, BACKGROUND);
    fill(&mut img, 150, 150, 100, 100, BOARD);

    let result = reader.read_image(img).await;
    assert!(matches!(result, Err(PipelineError::BoardNotFound)));
    assert_eq!(engine.calls(), 0, "no tile work before the board is found");
}

#[tokio::test]
async fn test_wide_rectangle_is_not_a_board() {
    let reader = reader_with(ConstReader("2"));

    let mut img = image::RgbImage::from_pixel(500, 300, BACKGROUND);
    fill(&mut img, 50, 75, 400, 150, BOARD);

    let result = reader.read_image(img).await;
    assert!(matches!(result, Err(PipelineError::BoardNotFound)));
}

#[tokio::test]
async fn test_garbage_bytes_fail_to_decode() {
    let reader = reader_with(ConstReader("2"));

    let result = reader.read_bytes(b"definitely not a png").await;
    assert!(matches!(result, Err(PipelineError::DecodeFailed(_))));
}

#[tokio::test]
async fn test_engine_error_fails_the_whole_board() {
    let reader = reader_with(FailingReader);

    match reader.read_image(board_image(&[9])).await {
        Err(PipelineError::RecognitionTaskFailed { index, reason }) => {
            assert_eq!(index, 9);
            assert!(reason.contains("engine crashed"), "reason: {}", reason);
        }
        other => panic!("expected task failure, got {:?}", other.map(|r| r.board)),
    }
}

#[tokio::test]
async fn test_panicking_task_fails_the_whole_board() {
    let reader = reader_with(PanickingReader);

    match reader.read_image(board_image(&[3])).await {
        Err(PipelineError::RecognitionTaskFailed { index, reason }) => {
            assert_eq!(index, 3);
            assert!(reason.contains("ocr engine went away"), "reason: {}", reason);
        }
        other => panic!("expected task failure, got {:?}", other.map(|r| r.board)),
    }
}

#[tokio::test]
async fn test_slow_engine_times_out() {
    let reader = reader_with(SlowReader(Duration::from_millis(400)))
        .with_timeout(Duration::from_millis(20));

    let result = reader.read_image(board_image(&[])).await;
    assert!(matches!(result, Err(PipelineError::RecognitionTimeout(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tiles_are_recognized_in_parallel() -> anyhow::Result<()> {
    let reader = reader_with(SlowReader(Duration::from_millis(150)));

    let started = Instant::now();
    reader.read_image(board_image(&[])).await?;

    // 16 sequential calls would take 2.4s
    assert!(started.elapsed() < Duration::from_millis(1500), "took {:?}", started.elapsed());
    Ok(())
}

#[tokio::test]
async fn test_debug_output_written_per_stage() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let out = dir.path().join("debug");
    let reader = reader_with(InkReader::new("4")).with_debug(out.clone())?;

    reader.read_image(board_image(&[2])).await?;

    for path in [
        "00_input/input.png",
        "01_board/board.png",
        "02_tiles/tile_00.png",
        "02_tiles/tile_15.png",
        "03_auto_contrast/tile_02.png",
        "05_polarity/tile_07.png",
        "07_trim_border/tile_15.png",
    ] {
        assert!(out.join(path).exists(), "missing {}", path);
    }
    Ok(())
}

#[tokio::test]
async fn test_debug_dir_must_be_empty() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    std::fs::write(dir.path().join("leftover.txt"), "x")?;

    let result = reader_with(ConstReader("2")).with_debug(dir.path().to_path_buf());
    assert!(result.is_err());
    Ok(())
}
