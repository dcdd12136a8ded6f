use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tillslip_core::{assemble, LabeledSpans, StructuredReceipt};
use tracing::{info, instrument};

use crate::config::{ConfigError, PipelineConfig};
use crate::detect;
use crate::geometry::{CornerSet, GeometryError};
use crate::hash;
use crate::labeler::{EntityLabeler, LabelError};
use crate::preprocess::{self, PreprocessError};
use crate::recognizer::{OcrBackend, OcrError};
use crate::rectify;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
    #[error("Entity labeling failed: {0}")]
    Label(#[from] LabelError),
}

/// Everything learned from one photograph.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// SHA-256 hex digest of the uploaded bytes.
    pub digest_hex: String,
    /// Where the receipt was found in the photograph.
    pub corners: CornerSet,
    /// Recognized lines joined with `\n`.
    pub ocr_text: String,
    /// Labeler output, in reading order.
    pub entities: LabeledSpans,
    pub receipt: StructuredReceipt,
}

/// Orchestrates: decode → detect → rectify → OCR → label → assemble.
///
/// The recognizer and labeler are loaded by the caller and injected once; the
/// pipeline itself holds no per-call state, so one instance can serve many
/// threads behind an `Arc`.
pub struct ReceiptPipeline<R: OcrBackend, L: EntityLabeler> {
    recognizer: R,
    labeler: L,
    config: PipelineConfig,
}

impl<R: OcrBackend, L: EntityLabeler> ReceiptPipeline<R, L> {
    pub fn new(recognizer: R, labeler: L) -> Self {
        Self { recognizer, labeler, config: PipelineConfig::default() }
    }

    pub fn with_config(recognizer: R, labeler: L, config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { recognizer, labeler, config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Photograph bytes in, structured receipt out.
    pub fn extract(&self, data: &[u8]) -> Result<StructuredReceipt, PipelineError> {
        Ok(self.process_bytes(data)?.receipt)
    }

    /// Process raw bytes (from camera capture or upload).
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub fn process_bytes(&self, data: &[u8]) -> Result<ExtractionResult, PipelineError> {
        let digest_hex = hash::image_digest(data);

        // 1. Decode and find the receipt.
        let image = preprocess::decode(data)?;
        let corners = detect::detect(&image, &self.config)?;

        // 2. Flatten it.
        let rectified = rectify::rectify(&image, &corners)?;

        // 3. Read and label the text.
        let lines = self.recognizer.recognize(&rectified)?;
        let ocr_text = lines.join("\n");
        let entities = self.labeler.label(&ocr_text)?;

        // 4. Group spans into the receipt.
        let receipt = assemble(&entities);

        info!(
            digest = %digest_hex,
            lines = lines.len(),
            spans = entities.len(),
            items = receipt.items.len(),
            "Receipt extracted"
        );

        Ok(ExtractionResult { digest_hex, corners, ocr_text, entities, receipt })
    }

    /// Process an image file on disk.
    pub async fn process_file(&self, path: &Path) -> Result<ExtractionResult, PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        self.process_bytes(&bytes)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
