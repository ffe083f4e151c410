//! Tests for config module

use dwellmap::{
    BoundingVolume, DwellMapError, GapPolicy, Point3, PointSource, Rgba, ScanStrategy,
    VisualizationMode, VisualizerConfig,
};

#[test]
fn test_defaults() {
    let config = VisualizerConfig::default();
    assert_eq!(config.mode, VisualizationMode::Heatmap);
    assert_eq!(config.max_point_distance, 0.05);
    assert_eq!(config.min_cluster_size, 5);
    assert_eq!(config.point_size, 0.075);
    assert_eq!(config.max_segment_distance, 1.0);
    assert_eq!(config.color_low, Rgba::WHITE);
    assert_eq!(config.color_high, Rgba::RED);
    assert_eq!(config.failed_color, Rgba::GRAY);
    assert_eq!(config.gap_policy, GapPolicy::Compact);
    assert_eq!(config.scan_strategy, ScanStrategy::Pairwise);
    assert!(!config.cull_by_range);
    assert!(!config.cull_by_volume);
    assert!(!config.draw_trail);
    assert_eq!(config.point_source(), PointSource::Gaze);
}

#[test]
fn test_partial_json_keeps_defaults() {
    let json = r#"{
        "mode": "path",
        "maxPointDistance": 0.1,
        "drawTrail": true,
        "closeTrailOnly": true,
        "gapPolicy": "zeroFill",
        "cullByVolume": true,
        "cullVolume": { "min": { "x": 0, "y": 0, "z": 0 }, "max": { "x": 1, "y": 2, "z": 3 } },
        "reader": { "delimiter": ";" }
    }"#;
    let config = VisualizerConfig::from_json_str(json).unwrap();

    assert_eq!(config.mode, VisualizationMode::Path);
    assert_eq!(config.point_source(), PointSource::Position);
    assert_eq!(config.max_point_distance, 0.1);
    assert!(config.draw_trail);
    assert!(config.close_trail_only);
    assert_eq!(config.gap_policy, GapPolicy::ZeroFill);
    assert_eq!(
        config.cull_volume,
        Some(BoundingVolume::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 3.0)
        ))
    );
    assert_eq!(config.reader.delimiter, ';');
    assert_eq!(config.reader.decimal_separator, '.');
    assert_eq!(config.min_cluster_size, 5);
}

#[test]
fn test_negative_values_are_not_errors() {
    let json = r#"{ "cullByRange": true, "cullFrom": -3, "cullTo": -1, "minClusterSize": -2 }"#;
    let config = VisualizerConfig::from_json_str(json).unwrap();

    assert_eq!(config.cull_config().from, -3);
    assert_eq!(config.cluster_analyzer().min_cluster_size, 0);
}

#[test]
fn test_component_builders() {
    let config = VisualizerConfig {
        max_point_distance: 0.2,
        min_cluster_size: 3,
        close_trail_only: true,
        max_segment_distance: 0.5,
        gap_policy: GapPolicy::ZeroFill,
        scan_strategy: ScanStrategy::RTree,
        cull_by_range: true,
        cull_from: 2,
        cull_to: 8,
        ..VisualizerConfig::default()
    };

    let analyzer = config.cluster_analyzer();
    assert_eq!(analyzer.max_point_distance, 0.2);
    assert_eq!(analyzer.min_cluster_size, 3);
    assert_eq!(analyzer.strategy, ScanStrategy::RTree);
    assert_eq!(analyzer.color_high, config.color_high);

    let builder = config.trail_builder();
    assert!(builder.close_only);
    assert_eq!(builder.max_segment_distance, 0.5);
    assert_eq!(builder.gap_policy, GapPolicy::ZeroFill);

    let cull = config.cull_config();
    assert!(cull.by_range);
    assert_eq!((cull.from, cull.to), (2, 8));
    assert!(!cull.by_volume);
}

#[test]
fn test_invalid_json() {
    let result = VisualizerConfig::from_json_str("{ \"maxPointDistance\": \"far\" }");
    assert!(matches!(result, Err(DwellMapError::Config(_))));
}

#[test]
fn test_json_file_round_trip() {
    let path = std::env::temp_dir().join(format!("dwellmap_config_{}.json", std::process::id()));
    let config = VisualizerConfig {
        min_cluster_size: 2,
        trail_color: Rgba::new(0.0, 1.0, 0.0, 0.5),
        ..VisualizerConfig::default()
    };
    std::fs::write(&path, config.to_json_pretty().unwrap()).unwrap();

    let loaded = VisualizerConfig::from_json_file(&path).unwrap();
    assert_eq!(loaded, config);

    let _ = std::fs::remove_file(&path);
}
