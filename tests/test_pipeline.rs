mod common;

use common::*;
use glyphcast::{CharacterPipeline, ExtractorConfig, NoSegmentation, SegmentationMask, FEATURE_VECTOR_LEN};

#[tokio::test]
async fn test_uniform_image_is_unknown() -> anyhow::Result<()> {
    let pipeline = CharacterPipeline::default();
    let output = pipeline.run(&uniform_gray(80, 80, 128), &NoSegmentation).await?;

    assert!(!output.is_fallback());
    assert!(output.classification.is_unknown());
    assert!(output.keypoints().is_empty());
    assert_eq!(output.vector().map(|v| v.len()), Some(FEATURE_VECTOR_LEN));
    Ok(())
}

#[tokio::test]
async fn test_bar_is_horizontal_glyph() -> anyhow::Result<()> {
    let pipeline = CharacterPipeline::default();
    let output = pipeline.run(&standard_bar(), &NoSegmentation).await?;

    assert!(!output.is_fallback());
    let patterns = output.features.patterns();
    assert!(patterns.horizontal_lines > patterns.vertical_lines);
    assert_eq!(output.classification.character, 'E');
    assert_eq!(output.classification.score, 7);
    Ok(())
}

#[tokio::test]
async fn test_unavailable_segmentation_zero_fills_semantic_slots() -> anyhow::Result<()> {
    let pipeline = CharacterPipeline::default();
    let output = pipeline.run(&standard_bar(), &FailingSegmentation).await?;

    assert!(!output.semantic_available);
    let vector = output.vector().ok_or_else(|| anyhow::anyhow!("expected layered features"))?;
    assert_eq!(vector.len(), FEATURE_VECTOR_LEN);
    assert_eq!(&vector[30..], &[0.0, 0.0, 0.0]);
    Ok(())
}

#[tokio::test]
async fn test_segmentation_mask_is_applied() -> anyhow::Result<()> {
    let pipeline = CharacterPipeline::default();
    let service = StaticSegmentation::new(left_half_mask(100, 60));
    let output = pipeline.run(&standard_bar(), &service).await?;

    assert!(output.semantic_available);
    assert!(output.keypoints().iter().all(|kp| kp.x < 50));
    let vector = output.vector().ok_or_else(|| anyhow::anyhow!("expected layered features"))?;
    assert_eq!(vector[30], 1.0);
    assert_eq!(vector[31], 0.5);
    Ok(())
}

#[tokio::test]
async fn test_empty_person_mask_finds_nothing() -> anyhow::Result<()> {
    let pipeline = CharacterPipeline::default();
    let service = StaticSegmentation::new(SegmentationMask::from_fn(100, 60, |_, _| false));
    let output = pipeline.run(&standard_bar(), &service).await?;

    assert!(output.keypoints().is_empty());
    assert!(output.classification.is_unknown());
    Ok(())
}

#[tokio::test]
async fn test_hough_budget_triggers_fallback() -> anyhow::Result<()> {
    let pipeline = CharacterPipeline::new(ExtractorConfig::default().with_hough_budget(10));
    let output = pipeline.run(&standard_bar(), &NoSegmentation).await?;

    assert!(output.is_fallback());
    assert!(output.vector().is_none());
    assert_eq!(output.keypoints().len(), 5);
    // Horizontal strokes, mirrored left/right, wide: 'A' leads the tied glyphs
    assert_eq!(output.classification.character, 'A');
    Ok(())
}

#[tokio::test]
async fn test_empty_image_falls_back() -> anyhow::Result<()> {
    let pipeline = CharacterPipeline::default();
    let output = pipeline.run(&uniform_gray(0, 0, 0), &NoSegmentation).await?;

    assert!(output.is_fallback());
    assert!(output.classification.is_unknown());
    Ok(())
}

#[tokio::test]
async fn test_debug_output_written() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let debug_dir = dir.path().join("debug");
    let pipeline = CharacterPipeline::default().with_debug(debug_dir.clone())?;

    pipeline.run(&standard_bar(), &NoSegmentation).await?;

    for step in ["00_input", "01_grayscale", "02_edges", "03_overlay"] {
        assert!(debug_dir.join(step).join("01.png").exists(), "missing {step}");
    }
    Ok(())
}

#[tokio::test]
async fn test_debug_dir_must_be_empty() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    std::fs::write(dir.path().join("leftover.txt"), "x")?;

    assert!(CharacterPipeline::default().with_debug(dir.path().to_path_buf()).is_err());
    Ok(())
}

#[tokio::test]
async fn test_grid_size_override() -> anyhow::Result<()> {
    let pipeline = CharacterPipeline::new(ExtractorConfig::default().with_keypoint_grid_size(50));
    let output = pipeline.run(&standard_bar(), &NoSegmentation).await?;

    // Two cells across, one row of cells holds the bar
    assert_eq!(output.keypoints().len(), 2);
    Ok(())
}

#[test]
fn test_overlay_colors() {
    use glyphcast::overlay::render_overlay;
    use glyphcast::KeyPoint;
    use image::{GrayImage, Luma, Rgba};

    let mut edges = GrayImage::new(20, 20);
    edges.put_pixel(2, 2, Luma([255]));
    let overlay = render_overlay(&edges, &[KeyPoint { x: 10, y: 10, strength: 255 }]);

    assert_eq!(overlay.dimensions(), (20, 20));
    assert_eq!(*overlay.get_pixel(2, 2), Rgba([255, 255, 255, 255]));
    assert_eq!(*overlay.get_pixel(10, 10), Rgba([255, 0, 0, 255]));
    assert_eq!(*overlay.get_pixel(13, 10), Rgba([255, 0, 0, 255]));
    assert_eq!(*overlay.get_pixel(18, 18), Rgba([0, 0, 0, 255]));
}
