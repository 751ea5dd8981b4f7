//! Local text recognition behind the `ReceiptOcr` port, using the ocrs
//! engine with rten model files. Keeps receipt photos on the device: no
//! image ever leaves the process.

use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use waribill_application::{ReceiptOcr, ReceiptOcrError, ReceiptPhoto};

/// Filesystem locations of the detection and recognition models.
#[derive(Clone, Copy, Debug)]
pub struct OcrModelPaths<'a> {
    pub detection: &'a str,
    pub recognition: &'a str,
}

pub struct OcrsReceiptReader {
    engine: OcrEngine,
}

impl OcrsReceiptReader {
    pub fn from_model_paths(paths: OcrModelPaths<'_>) -> Result<Self, ReceiptOcrError> {
        let detection = load_model(paths.detection)?;
        let recognition = load_model(paths.recognition)?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection),
            recognition_model: Some(recognition),
            ..OcrEngineParams::default()
        })
        .map_err(|err| ReceiptOcrError::EngineInit {
            detail: err.to_string(),
        })?;

        tracing::info!(
            "OCR engine ready (detection {:?}, recognition {:?})",
            paths.detection,
            paths.recognition
        );
        Ok(Self { engine })
    }
}

fn load_model(path: &str) -> Result<Model, ReceiptOcrError> {
    Model::load_file(path).map_err(|err| ReceiptOcrError::ModelLoad {
        path: path.to_owned(),
        detail: err.to_string(),
    })
}

impl ReceiptOcr for OcrsReceiptReader {
    fn extract_text(&self, photo: &ReceiptPhoto<'_>) -> Result<String, ReceiptOcrError> {
        let decoded =
            image::load_from_memory(photo.bytes).map_err(|err| ReceiptOcrError::ImageDecode {
                detail: err.to_string(),
            })?;
        let rgb = decoded.into_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            ReceiptOcrError::ImageDecode {
                detail: err.to_string(),
            }
        })?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| ReceiptOcrError::Recognition {
                detail: err.to_string(),
            })?;

        self.engine
            .get_text(&input)
            .map_err(|err| ReceiptOcrError::Recognition {
                detail: err.to_string(),
            })
    }
}
