use clap::Parser;
use image::ImageReader;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use glyphcast::features::integration::FeatureImportance;
use glyphcast::overlay::render_overlay;
use glyphcast::{CharacterPipeline, ExtractorConfig, FEATURE_NAMES, NoSegmentation};

#[derive(Parser)]
#[command(name = "glyphcast")]
#[command(about = "Guess which character an image shows from its visual features")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON file with extractor settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the edge threshold
    #[arg(long, value_name = "N")]
    edge_threshold: Option<u8>,

    /// Override the keypoint grid cell size
    #[arg(long, value_name = "N")]
    grid_size: Option<u32>,

    /// Write the edge and keypoint overlay to this PNG
    #[arg(long, value_name = "PNG")]
    overlay_out: Option<PathBuf>,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Print a JSON report instead of the bare character
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    character: char,
    score: u32,
    fallback: bool,
    semantic_available: bool,
    keypoints: usize,
    feature_names: &'a [&'a str],
    vector: Option<&'a [f64]>,
    importance: Option<FeatureImportance>,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "glyphcast=debug" } else { "glyphcast=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => ExtractorConfig::from_json_file(path)?,
        None => ExtractorConfig::default(),
    };
    if let Some(threshold) = args.edge_threshold {
        config = config.with_edge_threshold(threshold);
    }
    if let Some(grid_size) = args.grid_size {
        config = config.with_keypoint_grid_size(grid_size);
    }

    tracing::info!("Loading image: {:?}", args.image_path);
    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?
        .to_rgba8();
    tracing::info!("Image loaded: {}x{}", img.width(), img.height());

    let mut pipeline = CharacterPipeline::new(config).with_verbose(args.verbose);
    if let Some(debug_dir) = args.debug_out {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    let output = pipeline.run(&img, &NoSegmentation).await?;

    if let Some(path) = &args.overlay_out {
        render_overlay(output.edges(), output.keypoints())
            .save(path)
            .map_err(|e| anyhow::anyhow!("Failed to save overlay: {}", e))?;
    }

    if args.json {
        let report = Report {
            character: output.classification.character,
            score: output.classification.score,
            fallback: output.is_fallback(),
            semantic_available: output.semantic_available,
            keypoints: output.keypoints().len(),
            feature_names: &FEATURE_NAMES,
            vector: output.vector(),
            importance: output.layered().map(|features| features.importance),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", output.classification.character);
    }

    Ok(())
}
