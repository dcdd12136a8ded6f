use image::RgbImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
}

/// Abstraction over a text recognition engine.
///
/// Implementations receive the rectified receipt and return its text lines in
/// reading order. An engine is built once and shared across calls, so
/// `recognize` takes `&self` and must tolerate concurrent callers.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image: &RgbImage) -> Result<Vec<String>, OcrError>;
}

/// Non-empty, trimmed lines of an engine's text output.
pub fn text_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns the lines of a pre-set string, whatever the image.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image: &RgbImage) -> Result<Vec<String>, OcrError> {
        Ok(text_lines(&self.text))
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{text_lines, OcrBackend, OcrError};
    use crate::preprocess::encode_as_png;
    use image::RgbImage;
    use leptess::LepTess;
    use std::sync::mpsc;
    use std::thread::JoinHandle;

    type Job = (Vec<u8>, mpsc::Sender<Result<String, OcrError>>);

    /// Tesseract engine owned by a dedicated worker thread.
    ///
    /// The engine is loaded once in [`TesseractRecognizer::new`]; calls are
    /// queued to the worker and served one at a time. Dropping the recognizer
    /// stops and joins the worker.
    pub struct TesseractRecognizer {
        jobs: Option<mpsc::Sender<Job>>,
        worker: Option<JoinHandle<()>>,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>, lang: &str) -> Result<Self, OcrError> {
            let lang = lang.to_string();
            let (jobs_tx, jobs_rx) = mpsc::channel::<Job>();
            let (ready_tx, ready_rx) = mpsc::channel::<Result<(), OcrError>>();

            let worker = std::thread::Builder::new()
                .name("tesseract".into())
                .spawn(move || {
                    let mut lt = match LepTess::new(data_path.as_deref(), &lang) {
                        Ok(lt) => {
                            let _ = ready_tx.send(Ok(()));
                            lt
                        }
                        Err(e) => {
                            let _ = ready_tx.send(Err(OcrError::Engine(e.to_string())));
                            return;
                        }
                    };
                    for (png, reply) in jobs_rx {
                        let result = lt
                            .set_image_from_mem(&png)
                            .map_err(|e| OcrError::ImageDecode(e.to_string()))
                            .and_then(|()| {
                                lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))
                            });
                        let _ = reply.send(result);
                    }
                })
                .map_err(|e| OcrError::Engine(e.to_string()))?;

            ready_rx
                .recv()
                .map_err(|_| OcrError::Engine("tesseract worker exited during startup".into()))??;

            tracing::info!("Tesseract engine loaded");
            Ok(Self { jobs: Some(jobs_tx), worker: Some(worker) })
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image: &RgbImage) -> Result<Vec<String>, OcrError> {
            let png = encode_as_png(image).map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            let (reply_tx, reply_rx) = mpsc::channel();
            self.jobs
                .as_ref()
                .ok_or_else(|| OcrError::Engine("tesseract worker stopped".into()))?
                .send((png, reply_tx))
                .map_err(|_| OcrError::Engine("tesseract worker stopped".into()))?;
            let text = reply_rx
                .recv()
                .map_err(|_| OcrError::Engine("tesseract worker dropped the request".into()))??;
            Ok(text_lines(&text))
        }
    }

    impl Drop for TesseractRecognizer {
        fn drop(&mut self) {
            // Closing the queue ends the worker loop.
            drop(self.jobs.take());
            if let Some(worker) = self.worker.take() {
                let _ = worker.join();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_preset_lines() {
        let r = MockRecognizer::new("SHOPCO SRL\n2 x 9,99\nTOTAL 19,98");
        assert_eq!(
            r.recognize(&RgbImage::new(1, 1)).unwrap(),
            vec!["SHOPCO SRL", "2 x 9,99", "TOTAL 19,98"]
        );
    }

    #[test]
    fn mock_ignores_image_content() {
        let r = MockRecognizer::new("hello");
        assert_eq!(r.recognize(&RgbImage::new(8, 8)).unwrap(), vec!["hello"]);
        assert_eq!(r.recognize(&RgbImage::new(1, 1)).unwrap(), vec!["hello"]);
    }

    #[test]
    fn text_lines_drops_blank_lines() {
        assert_eq!(text_lines("  A  \n\n \r\nB\n"), vec!["A", "B"]);
        assert!(text_lines("").is_empty());
    }
}
