use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use image::{DynamicImage, GrayImage, RgbImage};
use log::{debug, info};

use crate::assembler;
use crate::detection::{locator, tiles, DigitReader, LocatorConfig, NormalizerConfig, TileNormalizer};
use crate::error::PipelineError;
use crate::models::BoardReading;
use crate::recognizer::ConcurrentRecognizer;

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

impl DebugConfig {
    /// Save `img` as `<output_dir>/<dir_name>/<file_name>`
    pub fn save(&self, dir_name: &str, file_name: &str, img: DynamicImage) -> Result<(), PipelineError> {
        let step_dir = self.output_dir.join(dir_name);
        let output_path = step_dir.join(file_name);
        let to_error = |source: image::ImageError| PipelineError::DebugOutput {
            path: output_path.display().to_string(),
            source,
        };

        std::fs::create_dir_all(&step_dir).map_err(|e| to_error(image::ImageError::IoError(e)))?;
        img.save(&output_path).map_err(to_error)?;
        debug!("Debug: saved {}/{}", dir_name, file_name);
        Ok(())
    }

    /// Save one normalizer stage of one tile, e.g. `03_auto_contrast/tile_07.png`
    pub fn save_step(
        &self,
        step_index: usize,
        step_name: &str,
        tile_index: usize,
        image: &GrayImage,
    ) -> Result<(), PipelineError> {
        let dir_name = format!(
            "{:02}_{}",
            step_index + 3,
            step_name.to_lowercase().replace(' ', "_")
        );
        self.save(&dir_name, &tile_file_name(tile_index), DynamicImage::ImageLuma8(image.clone()))
    }
}

fn tile_file_name(index: usize) -> String {
    format!("tile_{:02}.png", index)
}

/// Tunables for one board read
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    pub locator: LocatorConfig,
    pub normalizer: NormalizerConfig,
    /// Upper bound on the whole recognition fan-out
    pub timeout: Duration,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            locator: LocatorConfig::default(),
            normalizer: NormalizerConfig::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Reads a 2048 board out of a screenshot or photo.
///
/// Stateless between calls: every read works on its own copies of the image,
/// board and tiles, so one reader can serve concurrent requests.
pub struct BoardReader {
    reader: Arc<dyn DigitReader>,
    config: ReaderConfig,
    debug: Option<DebugConfig>,
}

impl BoardReader {
    pub fn new(reader: Arc<dyn DigitReader>) -> Self {
        Self {
            reader,
            config: ReaderConfig::default(),
            debug: None,
        }
    }

    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Decode raw upload bytes and read the board
    pub async fn read_bytes(&self, bytes: &[u8]) -> Result<BoardReading, PipelineError> {
        let img = image::load_from_memory(bytes).map_err(PipelineError::DecodeFailed)?;
        debug!("Decoded {}x{} image", img.width(), img.height());
        self.read_image(img.to_rgb8()).await
    }

    /// Locate, split, recognize and assemble
    pub async fn read_image(&self, img: RgbImage) -> Result<BoardReading, PipelineError> {
        let started = Instant::now();

        if let Some(debug) = &self.debug {
            debug.save("00_input", "input.png", DynamicImage::ImageRgb8(img.clone()))?;
        }

        let board_image = locator::crop_board(&img, &self.config.locator)?;
        drop(img);

        if let Some(debug) = &self.debug {
            debug.save("01_board", "board.png", DynamicImage::ImageRgb8(board_image.clone()))?;
        }

        let tiles = tiles::split_into_tiles(&board_image);
        if let Some(debug) = &self.debug {
            for tile in &tiles {
                debug.save("02_tiles", &tile_file_name(tile.index), DynamicImage::ImageRgb8(tile.image.clone()))?;
            }
        }

        let recognizer = ConcurrentRecognizer::new(
            Arc::clone(&self.reader),
            TileNormalizer::standard(&self.config.normalizer),
            self.config.timeout,
        )
        .with_debug(self.debug.clone());

        let slots = recognizer.recognize(tiles).await?;
        let reading = assembler::assemble(slots)?;

        info!("Board read in {:?}", started.elapsed());
        Ok(reading)
    }
}
