use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tile2048_ocr::{BoardReader, LocatorConfig, OcrsDigitReader, ReaderConfig, TileReading};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let mut args = std::env::args().skip(1);
    let image_path = PathBuf::from(args.next().unwrap_or_else(|| "test_board.png".to_string()));
    let model_dir = PathBuf::from(args.next().unwrap_or_else(|| "models".to_string()));

    let engine = OcrsDigitReader::from_model_dir(&model_dir)?;

    // Looser locator for photos taken at an angle
    let config = ReaderConfig {
        locator: LocatorConfig {
            min_aspect: 0.8,
            max_aspect: 1.25,
            ..LocatorConfig::default()
        },
        timeout: Duration::from_secs(10),
        ..ReaderConfig::default()
    };
    let reader = BoardReader::new(Arc::new(engine)).with_config(config);

    let reading = reader.read_bytes(&std::fs::read(&image_path)?).await?;
    println!("{}\n", reading.board);

    for (index, tile) in reading.readings.iter().enumerate() {
        match tile {
            TileReading::Recognized(value) => println!("  tile {:2}: {}", index, value.get()),
            TileReading::Blank => println!("  tile {:2}: blank", index),
            TileReading::Rejected(text) => println!("  tile {:2}: rejected {:?}", index, text),
        }
    }
    Ok(())
}
