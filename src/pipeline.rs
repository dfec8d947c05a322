use anyhow::Result;
use image::{GrayImage, RgbaImage};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::classifier::{CharacterPatterns, CharacterScore, Classifier};
use crate::config::ExtractorConfig;
use crate::detection::FeatureDetector;
use crate::detection::preprocessing::to_grayscale;
use crate::features::extract_feature_set;
use crate::features::integration::{IntegratedFeatures, integrate};
use crate::legacy::{FallbackFeatures, extract_edges_and_keypoints};
use crate::models::KeyPoint;
use crate::overlay::render_overlay;
use crate::semantic::{SemanticAdapter, SegmentationService};

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

/// Context shared by every pipeline run
#[derive(Clone, Debug, Default)]
pub struct PipelineContext {
    pub verbose: bool,
    pub debug: Option<DebugConfig>,
}

/// Which extractor produced the features
#[derive(Debug, Clone)]
pub enum ExtractionOutcome {
    Layered(Box<IntegratedFeatures>),
    Fallback(FallbackFeatures),
}

impl ExtractionOutcome {
    pub fn edges(&self) -> &GrayImage {
        match self {
            ExtractionOutcome::Layered(features) => &features.original.mid_level.edges,
            ExtractionOutcome::Fallback(features) => &features.edges,
        }
    }

    pub fn keypoints(&self) -> &[KeyPoint] {
        match self {
            ExtractionOutcome::Layered(features) => &features.original.mid_level.keypoints,
            ExtractionOutcome::Fallback(features) => &features.keypoints,
        }
    }

    pub fn patterns(&self) -> CharacterPatterns {
        match self {
            ExtractionOutcome::Layered(features) => features.patterns,
            ExtractionOutcome::Fallback(features) => features.patterns(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub features: ExtractionOutcome,
    /// Whether the segmentation service answered in time with a usable mask
    pub semantic_available: bool,
    pub classification: CharacterScore,
}

impl PipelineOutput {
    pub fn edges(&self) -> &GrayImage {
        self.features.edges()
    }

    pub fn keypoints(&self) -> &[KeyPoint] {
        self.features.keypoints()
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.features, ExtractionOutcome::Fallback(_))
    }

    /// Feature vector of the layered extractor; the fallback has none
    pub fn vector(&self) -> Option<&[f64]> {
        match &self.features {
            ExtractionOutcome::Layered(features) => Some(features.vector.as_slice()),
            ExtractionOutcome::Fallback(_) => None,
        }
    }

    pub fn layered(&self) -> Option<&IntegratedFeatures> {
        match &self.features {
            ExtractionOutcome::Layered(features) => Some(&**features),
            ExtractionOutcome::Fallback(_) => None,
        }
    }
}

/// Image in, glyph out: segmentation, feature extraction, integration and
/// classification, with the single-pass extractor as a fallback.
pub struct CharacterPipeline {
    config: ExtractorConfig,
    detector: FeatureDetector,
    classifier: Classifier,
    adapter: SemanticAdapter,
    context: PipelineContext,
}

impl CharacterPipeline {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            detector: FeatureDetector::from_config(&config),
            classifier: Classifier::new(),
            adapter: SemanticAdapter::new(config.segmentation_timeout()),
            context: PipelineContext::default(),
            config,
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_adapter(mut self, adapter: SemanticAdapter) -> Self {
        self.adapter = adapter;
        self
    }

    /// Log per-stage timings at info level
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.context.verbose = verbose;
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

        self.context.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    /// Run one image through the pipeline.
    ///
    /// Segmentation problems never fail the run; extraction faults switch to
    /// the fallback extractor. Only debug output can produce an error.
    ///
    /// The fallback covers the faults extraction reports as `ExtractionError`
    /// (empty image, mask size mismatch, Hough edge budget). Panics are not
    /// caught.
    pub async fn run<S: SegmentationService>(&self, img: &RgbaImage, service: &S) -> Result<PipelineOutput> {
        let (width, height) = img.dimensions();
        let started = Instant::now();

        let outcome = self.adapter.acquire(service, img).await;
        let semantic_available = outcome.is_available();
        let mask = outcome.mask(width, height);
        self.stage_done("segmentation", started);

        let features = match extract_feature_set(img, &mask, outcome.features(), &self.detector) {
            Ok(set) => {
                self.stage_done("extraction", started);
                let integrated = integrate(set);
                self.stage_done("integration", started);
                ExtractionOutcome::Layered(Box::new(integrated))
            }
            Err(e) => {
                warn!("Layered extraction failed, using single-pass extractor: {e}");
                let fallback = extract_edges_and_keypoints(
                    img,
                    &mask,
                    self.config.edge_threshold as f64,
                    self.config.keypoint_grid_size,
                    self.config.keypoint_strength_floor,
                );
                self.stage_done("fallback extraction", started);
                ExtractionOutcome::Fallback(fallback)
            }
        };

        let classification = self.classifier.classify(&features.patterns());
        debug!(
            character = %classification.character,
            score = classification.score,
            keypoints = features.keypoints().len(),
            "Classified"
        );

        let output = PipelineOutput {
            features,
            semantic_available,
            classification,
        };

        if let Some(debug_config) = &self.context.debug {
            self.save_debug_output(&debug_config.output_dir, img, &output)?;
        }

        Ok(output)
    }

    fn stage_done(&self, stage: &str, started: Instant) {
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        if self.context.verbose {
            info!(stage, elapsed_ms, "Stage finished");
        } else {
            debug!(stage, elapsed_ms, "Stage finished");
        }
    }

    fn save_debug_output(&self, dir: &Path, img: &RgbaImage, output: &PipelineOutput) -> Result<()> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            warn!("Skipping debug output for empty image");
            return Ok(());
        }

        let overlay = render_overlay(output.edges(), output.keypoints());
        let gray = to_grayscale(img);

        save_step(dir, "00_input", |path| img.save(path))?;
        save_step(dir, "01_grayscale", |path| gray.save(path))?;
        save_step(dir, "02_edges", |path| output.edges().save(path))?;
        save_step(dir, "03_overlay", |path| overlay.save(path))?;
        Ok(())
    }
}

impl Default for CharacterPipeline {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

fn save_step(
    root: &Path,
    step_dir_name: &str,
    save: impl FnOnce(&Path) -> image::ImageResult<()>,
) -> Result<()> {
    let step_dir = root.join(step_dir_name);
    std::fs::create_dir_all(&step_dir)?;
    let output_path = step_dir.join("01.png");
    save(&output_path).map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;
    debug!("Debug: saved {}/01.png", step_dir_name);
    Ok(())
}
