pub mod config;
pub mod detect;
pub mod geometry;
pub mod hash;
pub mod labeler;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod rectify;

pub use config::{ConfigError, PipelineConfig};
pub use detect::detect;
pub use geometry::{order_points, CornerSet, GeometryError, Point};
pub use hash::image_digest;
pub use labeler::{EntityLabeler, LabelError, MockLabeler};
pub use pipeline::{ExtractionResult, PipelineError, ReceiptPipeline};
pub use preprocess::PreprocessError;
pub use recognizer::{MockRecognizer, OcrBackend, OcrError};
pub use rectify::{rectify, RectifiedImage};

pub use tillslip_core::{
    EntityLabel, LabeledSpan, LabeledSpans, ReceiptItem, StoreInfo, StructuredReceipt,
};
