use std::path::{Path, PathBuf};

use anyhow::Context;
use image::{GrayImage, Luma};
use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;

/// File names of the ocrs models inside a model directory
pub const DETECTION_MODEL: &str = "text-detection.rten";
pub const RECOGNITION_MODEL: &str = "text-recognition.rten";

/// Characters the engine may emit for a tile
pub const DIGITS: &str = "0123456789";

/// Reads the text on one normalized tile.
///
/// Implementations must be safe to call from many threads at once; the
/// recognizer shares one reader across all tile tasks.
pub trait DigitReader: Send + Sync {
    /// Raw recognized text; may be empty when nothing is readable
    fn read_text(&self, tile: &GrayImage) -> anyhow::Result<String>;
}

/// Where the ocrs model files live
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub detection: PathBuf,
    pub recognition: PathBuf,
}

impl ModelPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            detection: dir.join(DETECTION_MODEL),
            recognition: dir.join(RECOGNITION_MODEL),
        }
    }
}

/// [`DigitReader`] backed by the ocrs engine, restricted to digits
pub struct OcrsDigitReader {
    engine: OcrEngine,
    /// Tiles are centered on a white canvas of this size before recognition
    canvas_size: u32,
}

impl OcrsDigitReader {
    /// Load the detection and recognition models from `dir`
    pub fn from_model_dir(dir: &Path) -> anyhow::Result<Self> {
        Self::from_paths(&ModelPaths::in_dir(dir))
    }

    pub fn from_paths(paths: &ModelPaths) -> anyhow::Result<Self> {
        if !paths.detection.exists() || !paths.recognition.exists() {
            anyhow::bail!(
                "OCR models not found. Please run: ocrs-cli --help (or download models manually)\n\
                 Expected locations:\n  - {}\n  - {}",
                paths.detection.display(),
                paths.recognition.display()
            );
        }

        let detection_model = Model::load_file(&paths.detection)
            .with_context(|| format!("Failed to load {}", paths.detection.display()))?;
        let recognition_model = Model::load_file(&paths.recognition)
            .with_context(|| format!("Failed to load {}", paths.recognition.display()))?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            allowed_chars: Some(DIGITS.to_string()),
            ..Default::default()
        })?;

        Ok(Self { engine, canvas_size: 100 })
    }

    pub fn with_canvas_size(mut self, canvas_size: u32) -> Self {
        self.canvas_size = canvas_size;
        self
    }
}

impl DigitReader for OcrsDigitReader {
    fn read_text(&self, tile: &GrayImage) -> anyhow::Result<String> {
        let img = image::DynamicImage::ImageLuma8(fit_to_canvas(tile, self.canvas_size)).to_rgb8();
        let img_source = ImageSource::from_bytes(img.as_raw(), img.dimensions())
            .map_err(|e| anyhow::anyhow!("Invalid tile image: {:?}", e))?;
        let ocr_input = self.engine.prepare_input(img_source)?;
        let text = self.engine.get_text(&ocr_input)?;
        Ok(text.trim().to_string())
    }
}

/// Scale a tile to fit `target_size` keeping its aspect ratio, centered on white
pub fn fit_to_canvas(tile: &GrayImage, target_size: u32) -> GrayImage {
    let mut canvas = GrayImage::from_pixel(target_size, target_size, Luma([255u8]));
    let (width, height) = tile.dimensions();
    if width == 0 || height == 0 {
        return canvas;
    }

    let scale = (target_size as f32 / width as f32).min(target_size as f32 / height as f32);
    let scaled_w = ((width as f32 * scale) as u32).clamp(1, target_size);
    let scaled_h = ((height as f32 * scale) as u32).clamp(1, target_size);
    let scaled = image::imageops::resize(tile, scaled_w, scaled_h, image::imageops::FilterType::CatmullRom);

    let offset_x = (target_size - scaled_w) / 2;
    let offset_y = (target_size - scaled_h) / 2;
    image::imageops::overlay(&mut canvas, &scaled, offset_x.into(), offset_y.into());
    canvas
}
