use glyphcast::{ConfigError, ExtractorConfig, FeatureDetector, ModelConfig};
use std::time::Duration;

#[test]
fn test_defaults() {
    let config = ExtractorConfig::default();

    assert_eq!(config.edge_threshold, 50);
    assert_eq!(config.keypoint_grid_size, 20);
    assert_eq!(config.keypoint_strength_floor, 100);
    assert_eq!(config.blob_min_area, 50);
    assert_eq!(config.max_lines, 20);
    assert_eq!(config.max_hough_edge_pixels, None);
    assert_eq!(config.segmentation_timeout(), Duration::from_secs(5));
}

#[test]
fn test_partial_json_keeps_defaults() -> anyhow::Result<()> {
    let file = tempfile::Builder::new().suffix(".json").tempfile()?;
    std::fs::write(file.path(), r#"{ "edge_threshold": 80, "max_hough_edge_pixels": 5000 }"#)?;

    let config = ExtractorConfig::from_json_file(file.path())?;
    assert_eq!(config.edge_threshold, 80);
    assert_eq!(config.max_hough_edge_pixels, Some(5000));
    assert_eq!(config.keypoint_grid_size, 20);

    let detector = FeatureDetector::from_config(&config);
    assert_eq!(detector.edge_threshold, 80);
    assert_eq!(detector.hough.max_edge_pixels, Some(5000));
    Ok(())
}

#[test]
fn test_config_errors() -> anyhow::Result<()> {
    let file = tempfile::Builder::new().suffix(".json").tempfile()?;
    std::fs::write(file.path(), "{ not json")?;
    assert!(matches!(ExtractorConfig::from_json_file(file.path()), Err(ConfigError::Parse(_))));

    let missing = file.path().with_extension("missing");
    assert!(matches!(ExtractorConfig::from_json_file(missing), Err(ConfigError::Io(_))));
    Ok(())
}

#[test]
fn test_builders() {
    let config = ExtractorConfig::new()
        .with_edge_threshold(30)
        .with_keypoint_grid_size(0)
        .with_hough_budget(100)
        .with_segmentation_timeout(Duration::from_millis(250));

    assert_eq!(config.edge_threshold, 30);
    assert_eq!(config.keypoint_grid_size, 1);
    assert_eq!(config.max_hough_edge_pixels, Some(100));
    assert_eq!(config.segmentation_timeout(), Duration::from_millis(250));
}

#[test]
fn test_model_config() {
    let model = ModelConfig::default();
    assert_eq!(model.architecture, "MobileNetV1");
    assert_eq!(model.output_stride, 16);
    assert_eq!(model.internal_resolution, "medium");
    assert!(!model.flip_horizontal);
}

#[test]
fn test_oversized_timeout_saturates() {
    let config = ExtractorConfig::new().with_segmentation_timeout(Duration::MAX);
    assert_eq!(config.segmentation_timeout_ms, u64::MAX);
}
