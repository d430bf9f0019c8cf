use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use tile2048_ocr::{BoardReader, BoardResponse, ErrorResponse, OcrsDigitReader};

#[derive(Parser)]
#[command(name = "tile2048-ocr")]
#[command(about = "Read the tile values of a 2048 board from a screenshot")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Directory holding text-detection.rten and text-recognition.rten
    /// [default: $HOME/.cache/ocrs]
    #[arg(long, value_name = "DIR")]
    models: Option<PathBuf>,

    /// Give up on recognition after this many seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

/// Standard ocrs model cache location
fn default_model_dir() -> anyhow::Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Cannot locate home directory, pass --models")?;
    Ok(PathBuf::from(home_dir).join(".cache/ocrs"))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let model_dir = match args.models {
        Some(dir) => dir,
        None => default_model_dir()?,
    };
    log::debug!("Loading OCR models from {}", model_dir.display());
    let engine = OcrsDigitReader::from_model_dir(&model_dir)?;

    let mut reader = BoardReader::new(Arc::new(engine))
        .with_timeout(Duration::from_secs(args.timeout_secs));
    if let Some(debug_dir) = args.debug_out {
        reader = reader.with_debug(debug_dir)?;
    }

    let bytes = std::fs::read(&args.image_path)
        .with_context(|| format!("Failed to read {}", args.image_path.display()))?;

    match reader.read_bytes(&bytes).await {
        Ok(reading) => {
            log::info!("Recognized board:\n{}", reading.board);
            print_json(&BoardResponse { board: reading.board }, args.pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let error = err.to_string();
            log::error!("{:#}", anyhow::Error::from(err));
            print_json(&ErrorResponse { error }, args.pretty)?;
            Ok(ExitCode::FAILURE)
        }
    }
}
