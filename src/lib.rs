pub mod classifier;
pub mod config;
pub mod detection;
pub mod error;
pub mod features;
pub mod legacy;
pub mod models;
pub mod overlay;
pub mod pipeline;
pub mod semantic;

pub use classifier::{CharacterPatterns, CharacterScore, Classifier};
pub use config::{ExtractorConfig, ModelConfig};
pub use detection::FeatureDetector;
pub use error::{ConfigError, ExtractionError, SegmentationError};
pub use features::{FeatureSet, extract_feature_set};
pub use features::integration::{FEATURE_NAMES, FEATURE_VECTOR_LEN, IntegratedFeatures};
pub use models::{Blob, BoundingBox, Corner, KeyPoint, Line, SegmentationMask};
pub use pipeline::{CharacterPipeline, DebugConfig, ExtractionOutcome, PipelineContext, PipelineOutput};
pub use semantic::{NoSegmentation, Segmentation, SegmentationService, SemanticAdapter, SemanticFeatures, SemanticOutcome};
